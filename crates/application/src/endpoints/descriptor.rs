//! Endpoint descriptors
//!
//! A descriptor declares one REST operation: how its arguments become a
//! request, how its response is unwrapped, which tags it provides or
//! invalidates, and which session update its outcome implies.

use std::fmt;

use domain::{Principal, PrincipalKind};
use serde_json::Value;
use tracing::warn;

use super::tag::{Tag, id_from_args};
use crate::error::ApplicationError;
use crate::ports::{CredentialsMode, HttpMethod, TransportRequest};
use crate::session::SessionUpdate;

/// Whether an endpoint is cached or always sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// Read served through the query cache
    Query,
    /// Write that is always sent and may invalidate tags
    Mutation,
}

impl EndpointKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes tags from `(arguments, successful result)`
pub type TagFn = fn(&Value, Option<&Value>) -> Vec<Tag>;

/// Builds query-string pairs from the arguments
pub type QueryFn = fn(&Value) -> Result<Vec<(String, String)>, ApplicationError>;

/// Tags declared by an endpoint
#[derive(Debug, Clone, Default)]
pub enum TagSpec {
    #[default]
    None,
    /// Fixed tags
    Static(Vec<Tag>),
    /// Tags depending on the arguments and result
    Dynamic(TagFn),
}

impl TagSpec {
    pub fn resolve(&self, args: &Value, result: Option<&Value>) -> Vec<Tag> {
        match self {
            Self::None => Vec::new(),
            Self::Static(tags) => tags.clone(),
            Self::Dynamic(f) => f(args, result),
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Where the request body comes from
#[derive(Debug, Clone, Copy, Default)]
pub enum BodySpec {
    /// No body
    #[default]
    Empty,
    /// The arguments as a whole
    Args,
    /// One field of the arguments (e.g. `data` of `{id, data}`)
    Field(&'static str),
    /// A subset of the argument fields
    Fields(&'static [&'static str]),
}

impl BodySpec {
    fn extract(self, args: &Value) -> Result<Option<Value>, ApplicationError> {
        match self {
            Self::Empty => Ok(None),
            Self::Args => Ok(Some(args.clone())),
            Self::Field(name) => args.get(name).cloned().map(Some).ok_or_else(|| {
                ApplicationError::InvalidArguments(format!("missing body field `{name}`"))
            }),
            Self::Fields(names) => {
                let mut body = serde_json::Map::with_capacity(names.len());
                for name in names {
                    let value = args.get(*name).cloned().ok_or_else(|| {
                        ApplicationError::InvalidArguments(format!("missing body field `{name}`"))
                    })?;
                    body.insert((*name).to_string(), value);
                }
                Ok(Some(Value::Object(body)))
            },
        }
    }
}

/// How a successful response body becomes the endpoint's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseTransform {
    /// Use the body as is
    #[default]
    Identity,
    /// Take the `data` field of a `{data: ...}` envelope
    UnwrapData,
}

impl ResponseTransform {
    pub fn apply(self, body: Value) -> Result<Value, ApplicationError> {
        match self {
            Self::Identity => Ok(body),
            Self::UnwrapData => match body {
                Value::Object(mut map) => map.remove("data").ok_or_else(|| {
                    ApplicationError::Decode("response is missing the `data` envelope".to_string())
                }),
                other => Err(ApplicationError::Decode(format!(
                    "expected a `data` envelope, got {}",
                    json_type(&other)
                ))),
            },
        }
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Session update implied by an endpoint's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionEffect {
    #[default]
    None,
    /// Store the returned principal when the call succeeds
    SetOnSuccess(PrincipalKind),
    /// Clear the session once the call settles, whatever the outcome
    ClearOnSettle(PrincipalKind),
}

impl SessionEffect {
    /// Describe the state updates for an outcome
    ///
    /// A successful result that is not a principal record yields no update.
    pub fn evaluate(self, outcome: Result<&Value, &ApplicationError>) -> Vec<SessionUpdate> {
        match (self, outcome) {
            (Self::SetOnSuccess(kind), Ok(data)) => {
                match serde_json::from_value::<Principal>(data.clone()) {
                    Ok(principal) => vec![SessionUpdate::Set(kind, principal)],
                    Err(e) => {
                        warn!(session = %kind, error = %e, "Response is not a principal record");
                        Vec::new()
                    },
                }
            },
            (Self::ClearOnSettle(kind), _) => vec![SessionUpdate::Clear(kind)],
            _ => Vec::new(),
        }
    }
}

/// Static declaration of one REST operation
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    name: &'static str,
    kind: EndpointKind,
    method: HttpMethod,
    path_template: &'static str,
    query: Option<QueryFn>,
    body: BodySpec,
    credentials: CredentialsMode,
    transform: ResponseTransform,
    provides: TagSpec,
    invalidates: TagSpec,
    session_effect: SessionEffect,
    session_scope: Option<PrincipalKind>,
}

impl EndpointDescriptor {
    fn new(
        name: &'static str,
        kind: EndpointKind,
        method: HttpMethod,
        path_template: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            method,
            path_template,
            query: None,
            body: BodySpec::Empty,
            credentials: CredentialsMode::Include,
            transform: ResponseTransform::Identity,
            provides: TagSpec::None,
            invalidates: TagSpec::None,
            session_effect: SessionEffect::None,
            session_scope: None,
        }
    }

    /// Declare a cached read
    pub fn query(name: &'static str, method: HttpMethod, path_template: &'static str) -> Self {
        Self::new(name, EndpointKind::Query, method, path_template)
    }

    /// Declare a write
    pub fn mutation(name: &'static str, method: HttpMethod, path_template: &'static str) -> Self {
        Self::new(name, EndpointKind::Mutation, method, path_template)
    }

    #[must_use]
    pub fn with_query(mut self, query: QueryFn) -> Self {
        self.query = Some(query);
        self
    }

    #[must_use]
    pub const fn with_body(mut self, body: BodySpec) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub const fn with_credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = credentials;
        self
    }

    /// Unwrap the `{data: ...}` envelope of responses
    #[must_use]
    pub const fn unwrap_data(mut self) -> Self {
        self.transform = ResponseTransform::UnwrapData;
        self
    }

    #[must_use]
    pub fn provides(mut self, tags: TagSpec) -> Self {
        self.provides = tags;
        self
    }

    #[must_use]
    pub fn invalidates(mut self, tags: TagSpec) -> Self {
        self.invalidates = tags;
        self
    }

    #[must_use]
    pub const fn with_session_effect(mut self, effect: SessionEffect) -> Self {
        self.session_effect = effect;
        self
    }

    /// Results depend on who is logged in as `kind`
    ///
    /// The entry additionally provides that session's tag, so logging in or
    /// out as `kind` stales it.
    #[must_use]
    pub const fn scoped_to(mut self, kind: PrincipalKind) -> Self {
        self.session_scope = Some(kind);
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn kind(&self) -> EndpointKind {
        self.kind
    }

    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    pub const fn path_template(&self) -> &'static str {
        self.path_template
    }

    pub const fn transform(&self) -> ResponseTransform {
        self.transform
    }

    pub const fn provided_tags(&self) -> &TagSpec {
        &self.provides
    }

    pub const fn session_scope(&self) -> Option<PrincipalKind> {
        self.session_scope
    }

    /// Tags an entry for `args` provides, including its session tag
    ///
    /// Without a result only the tags derivable from the arguments are
    /// returned; these are known before the response arrives.
    pub fn resolve_provided(&self, args: &Value, result: Option<&Value>) -> Vec<Tag> {
        let mut tags = self.provides.resolve(args, result);
        if let Some(kind) = self.session_scope {
            tags.push(Tag::session(kind));
        }
        tags
    }

    pub const fn invalidated_tags(&self) -> &TagSpec {
        &self.invalidates
    }

    pub const fn session_effect(&self) -> SessionEffect {
        self.session_effect
    }

    /// Resolve the request for a set of arguments
    pub fn build_request(&self, args: &Value) -> Result<TransportRequest, ApplicationError> {
        let path = fill_path(self.path_template, args)?;
        let query = match self.query {
            Some(build) => build(args)?,
            None => Vec::new(),
        };

        let mut request = TransportRequest::new(self.method, path)
            .with_query(query)
            .with_credentials(self.credentials);
        if let Some(body) = self.body.extract(args)? {
            request = request.with_body(body);
        }
        Ok(request)
    }
}

/// Substitute `{name}` placeholders from the arguments
fn fill_path(template: &str, args: &Value) -> Result<String, ApplicationError> {
    let mut path = String::with_capacity(template.len() + 8);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            return Err(ApplicationError::InvalidArguments(format!(
                "unterminated placeholder in `{template}`"
            )));
        };
        let name = &rest[start + 1..start + len];
        let value = id_from_args(args, name).ok_or_else(|| {
            ApplicationError::InvalidArguments(format!("missing path parameter `{name}`"))
        })?;
        path.push_str(&rest[..start]);
        path.push_str(&value);
        rest = &rest[start + len + 1..];
    }
    path.push_str(rest);

    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::endpoints::tag::ADMIN_USERS;

    #[test]
    fn fill_path_from_scalar_args() {
        assert_eq!(fill_path("/projects/{id}", &json!(3)).unwrap(), "/projects/3");
    }

    #[test]
    fn fill_path_from_object_args() {
        let args = json!({"id": 7, "role": "admin"});
        assert_eq!(
            fill_path("/admin/users/{id}/role", &args).unwrap(),
            "/admin/users/7/role"
        );
    }

    #[test]
    fn fill_path_adds_leading_slash() {
        assert_eq!(fill_path("projects/segment", &Value::Null).unwrap(), "/projects/segment");
    }

    #[test]
    fn fill_path_missing_parameter() {
        let err = fill_path("/admin/users/{id}", &json!({"role": "admin"})).unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidArguments(_)));
    }

    #[test]
    fn body_spec_variants() {
        let args = json!({"id": 7, "role": "admin", "data": {"email": "a@b.c"}});
        assert_eq!(BodySpec::Empty.extract(&args).unwrap(), None);
        assert_eq!(BodySpec::Args.extract(&args).unwrap(), Some(args.clone()));
        assert_eq!(
            BodySpec::Field("data").extract(&args).unwrap(),
            Some(json!({"email": "a@b.c"}))
        );
        assert_eq!(
            BodySpec::Fields(&["role"]).extract(&args).unwrap(),
            Some(json!({"role": "admin"}))
        );
        assert!(BodySpec::Field("missing").extract(&args).is_err());
    }

    #[test]
    fn unwrap_data_transform() {
        let body = json!({"data": {"id": 1}, "message": "ok"});
        assert_eq!(
            ResponseTransform::UnwrapData.apply(body).unwrap(),
            json!({"id": 1})
        );
        assert!(ResponseTransform::UnwrapData.apply(json!({"id": 1})).is_err());
        assert!(ResponseTransform::UnwrapData.apply(json!([1, 2])).is_err());
        assert_eq!(
            ResponseTransform::Identity.apply(json!([1, 2])).unwrap(),
            json!([1, 2])
        );
    }

    #[test]
    fn build_request_combines_parts() {
        let descriptor = EndpointDescriptor::mutation(
            "updateUserRole",
            HttpMethod::Patch,
            "/admin/users/{id}/role",
        )
        .with_body(BodySpec::Fields(&["role"]));

        let request = descriptor
            .build_request(&json!({"id": 7, "role": "admin"}))
            .unwrap();
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.path, "/admin/users/7/role");
        assert_eq!(request.body, Some(json!({"role": "admin"})));
        assert_eq!(request.credentials, CredentialsMode::Include);
    }

    #[test]
    fn tag_specs_resolve() {
        fn by_id(args: &Value, _: Option<&Value>) -> Vec<Tag> {
            id_from_args(args, "id")
                .map(|id| vec![Tag::item(ADMIN_USERS, id)])
                .unwrap_or_default()
        }

        assert!(TagSpec::None.resolve(&Value::Null, None).is_empty());
        assert_eq!(
            TagSpec::Static(vec![Tag::list(ADMIN_USERS)]).resolve(&Value::Null, None),
            vec![Tag::list(ADMIN_USERS)]
        );
        assert_eq!(
            TagSpec::Dynamic(by_id).resolve(&json!(4), None),
            vec![Tag::item(ADMIN_USERS, 4)]
        );
    }

    #[test]
    fn scoped_descriptor_adds_session_tag() {
        let descriptor = EndpointDescriptor::query("getUser", HttpMethod::Get, "/admin/users/{id}")
            .scoped_to(PrincipalKind::Admin)
            .provides(TagSpec::Static(vec![Tag::item(ADMIN_USERS, 2)]));
        assert_eq!(
            descriptor.resolve_provided(&json!(2), None),
            vec![Tag::item(ADMIN_USERS, 2), Tag::session(PrincipalKind::Admin)]
        );

        let unscoped = EndpointDescriptor::query("refreshToken", HttpMethod::Get, "/auth/refresh");
        assert_eq!(unscoped.session_scope(), None);
        assert!(unscoped.resolve_provided(&Value::Null, None).is_empty());
    }

    #[test]
    fn set_on_success_parses_principal() {
        let data = json!({"id": 1, "fullName": "Ada", "email": "ada@example.com"});
        let updates = SessionEffect::SetOnSuccess(PrincipalKind::User).evaluate(Ok(&data));
        assert_eq!(updates.len(), 1);
        assert!(matches!(&updates[0], SessionUpdate::Set(PrincipalKind::User, p) if p.full_name == "Ada"));

        let err = ApplicationError::Network("down".into());
        assert!(SessionEffect::SetOnSuccess(PrincipalKind::User).evaluate(Err(&err)).is_empty());
        assert!(
            SessionEffect::SetOnSuccess(PrincipalKind::User)
                .evaluate(Ok(&json!({"unexpected": true})))
                .is_empty()
        );
    }

    #[test]
    fn clear_on_settle_applies_to_failures() {
        let err = ApplicationError::HttpStatus {
            status: 500,
            detail: String::new(),
        };
        assert_eq!(
            SessionEffect::ClearOnSettle(PrincipalKind::Admin).evaluate(Err(&err)),
            vec![SessionUpdate::Clear(PrincipalKind::Admin)]
        );
        assert_eq!(
            SessionEffect::ClearOnSettle(PrincipalKind::Admin).evaluate(Ok(&Value::Null)),
            vec![SessionUpdate::Clear(PrincipalKind::Admin)]
        );
    }
}
