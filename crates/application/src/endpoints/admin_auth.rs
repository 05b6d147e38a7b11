//! Admin authentication endpoints

use domain::PrincipalKind;

use super::descriptor::{BodySpec, EndpointDescriptor, SessionEffect};
use super::names::{LOGGED_IN_ADMIN, LOGOUT_ADMIN, REGISTER_ADMIN};
use crate::ports::HttpMethod;

pub fn slice() -> Vec<EndpointDescriptor> {
    vec![
        EndpointDescriptor::mutation(REGISTER_ADMIN, HttpMethod::Post, "/admin/auth/register")
            .with_body(BodySpec::Args),
        EndpointDescriptor::mutation(LOGGED_IN_ADMIN, HttpMethod::Post, "/admin/auth/login")
            .with_body(BodySpec::Args)
            .unwrap_data()
            .with_session_effect(SessionEffect::SetOnSuccess(PrincipalKind::Admin)),
        EndpointDescriptor::mutation(LOGOUT_ADMIN, HttpMethod::Post, "/admin/auth/logout")
            .with_session_effect(SessionEffect::ClearOnSettle(PrincipalKind::Admin)),
    ]
}
