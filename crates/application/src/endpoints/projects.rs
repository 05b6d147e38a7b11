//! Project endpoints

use domain::PrincipalKind;
use serde_json::Value;

use super::descriptor::{BodySpec, EndpointDescriptor, TagSpec};
use super::names::{CREATE_PROJECT, GENERATE_SEGMENTS, GET_PROJECT, GET_PROJECTS};
use super::tag::{PROJECTS, Tag, id_from_args};
use crate::ports::HttpMethod;

fn project_tag(args: &Value, _: Option<&Value>) -> Vec<Tag> {
    id_from_args(args, "id")
        .map(|id| vec![Tag::item(PROJECTS, id)])
        .unwrap_or_default()
}

fn segmented_project_tag(args: &Value, _: Option<&Value>) -> Vec<Tag> {
    id_from_args(args, "projectId")
        .map(|id| vec![Tag::item(PROJECTS, id)])
        .unwrap_or_default()
}

pub fn slice() -> Vec<EndpointDescriptor> {
    vec![
        EndpointDescriptor::query(GET_PROJECTS, HttpMethod::Get, "/projects")
            .scoped_to(PrincipalKind::User)
            .provides(TagSpec::Static(vec![Tag::list(PROJECTS)])),
        EndpointDescriptor::query(GET_PROJECT, HttpMethod::Get, "/projects/{id}")
            .scoped_to(PrincipalKind::User)
            .provides(TagSpec::Dynamic(project_tag)),
        EndpointDescriptor::mutation(CREATE_PROJECT, HttpMethod::Post, "/projects")
            .with_body(BodySpec::Args)
            .invalidates(TagSpec::Static(vec![Tag::list(PROJECTS)])),
        EndpointDescriptor::mutation(GENERATE_SEGMENTS, HttpMethod::Post, "/projects/segment")
            .with_body(BodySpec::Args)
            .invalidates(TagSpec::Dynamic(segmented_project_tag)),
    ]
}
