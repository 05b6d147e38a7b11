//! Test doubles shared by the unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::error::ApplicationError;
use crate::ports::{TransportPort, TransportRequest};

type Outcome = Result<Value, ApplicationError>;

enum Reply {
    Ready(Outcome),
    Gated(oneshot::Receiver<Outcome>),
}

/// Transport answering from per-path reply queues
///
/// Replies are consumed in order for each path, whatever the method.
/// A path without a queued reply answers 404.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn reply(&self, path: &str, outcome: Outcome) {
        self.replies
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(Reply::Ready(outcome));
    }

    /// Queue a reply that is held back until the returned sender fires
    pub(crate) fn gate(&self, path: &str) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.replies
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(Reply::Gated(rx));
        tx
    }

    pub(crate) fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().clone()
    }

    pub(crate) fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.path == path).count()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.path.clone()).collect()
    }
}

#[async_trait]
impl TransportPort for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value, ApplicationError> {
        let path = request.path.clone();
        self.calls.lock().push(request);
        let reply = {
            let mut replies = self.replies.lock();
            replies.get_mut(&path).and_then(VecDeque::pop_front)
        };
        match reply {
            Some(Reply::Ready(outcome)) => outcome,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApplicationError::Network("gate dropped".into()))),
            None => Err(ApplicationError::HttpStatus {
                status: 404,
                detail: format!("no scripted reply for {path}"),
            }),
        }
    }

    fn base_url(&self) -> String {
        "http://backend.test".to_string()
    }
}

pub(crate) fn principal_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "fullName": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": "user",
    })
}

pub(crate) fn admin_user_json(id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "fullName": format!("User {id}"),
        "email": format!("user{id}@example.com"),
        "role": role,
        "created_at": "2024-05-01T10:00:00",
        "updated_at": "2024-05-01T10:00:00",
    })
}

pub(crate) fn project_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "title": "Fox",
        "story_text": "A fox jumps.",
        "duration_sec": 25,
        "status": status,
        "created_at": "2024-05-01T10:00:00",
        "scenes": [],
    })
}
