//! Project payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::value_objects::ProjectId;

/// Duration the project form pre-fills
pub const DEFAULT_DURATION_SEC: u32 = 25;

/// Start a new project from a short story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Story text is required"))]
    pub story_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 10, max = 30, message = "Between 10 and 30 seconds"))]
    pub duration_sec: Option<u32>,
}

impl CreateProjectRequest {
    pub fn new(title: impl Into<String>, story_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            story_text: story_text.into(),
            duration_sec: Some(DEFAULT_DURATION_SEC),
        }
    }
}

/// Ask the backend to split a project's story into scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSegmentsRequest {
    pub project_id: ProjectId,
}
