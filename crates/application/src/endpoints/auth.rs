//! Story author authentication endpoints

use domain::PrincipalKind;

use super::descriptor::{BodySpec, EndpointDescriptor, SessionEffect};
use super::names::{
    FORGOT_PASSWORD, LOAD_USER, LOGGED_IN_USER, LOGOUT_USER, REFRESH_TOKEN, REGISTER_USER,
    RESET_PASSWORD,
};
use crate::ports::HttpMethod;

pub fn slice() -> Vec<EndpointDescriptor> {
    vec![
        EndpointDescriptor::query(REFRESH_TOKEN, HttpMethod::Get, "/auth/refresh"),
        EndpointDescriptor::query(LOAD_USER, HttpMethod::Get, "/auth/me")
            .unwrap_data()
            .scoped_to(PrincipalKind::User)
            .with_session_effect(SessionEffect::SetOnSuccess(PrincipalKind::User)),
        EndpointDescriptor::mutation(REGISTER_USER, HttpMethod::Post, "/auth/register")
            .with_body(BodySpec::Args),
        EndpointDescriptor::mutation(LOGGED_IN_USER, HttpMethod::Post, "/auth/login")
            .with_body(BodySpec::Args)
            .unwrap_data()
            .with_session_effect(SessionEffect::SetOnSuccess(PrincipalKind::User)),
        EndpointDescriptor::mutation(LOGOUT_USER, HttpMethod::Post, "/auth/logout")
            .with_session_effect(SessionEffect::ClearOnSettle(PrincipalKind::User)),
        EndpointDescriptor::mutation(FORGOT_PASSWORD, HttpMethod::Post, "/auth/forgot-password")
            .with_body(BodySpec::Args),
        EndpointDescriptor::mutation(RESET_PASSWORD, HttpMethod::Post, "/auth/reset-password")
            .with_body(BodySpec::Fields(&["token", "newPassword"])),
    ]
}
