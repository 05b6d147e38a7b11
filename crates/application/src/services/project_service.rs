//! Story projects

use domain::{
    CreateProjectRequest, GenerateSegmentsRequest, Project, ProjectId, StorySegment,
    validate_request,
};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::{from_data, to_args};
use crate::client::ApiClient;
use crate::endpoints::names;
use crate::error::ApplicationError;

/// Project listing, creation and story segmentation
#[derive(Debug, Clone, Copy)]
pub struct ProjectService<'a> {
    client: &'a ApiClient,
}

impl<'a> ProjectService<'a> {
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApplicationError> {
        from_data(self.client.query(names::GET_PROJECTS, Value::Null).await?)
    }

    pub async fn refetch_projects(&self) -> Result<Vec<Project>, ApplicationError> {
        from_data(self.client.refetch(names::GET_PROJECTS, Value::Null).await?)
    }

    #[instrument(skip(self))]
    pub async fn get_project(&self, id: ProjectId) -> Result<Project, ApplicationError> {
        from_data(self.client.query(names::GET_PROJECT, json!(id)).await?)
    }

    pub async fn refetch_project(&self, id: ProjectId) -> Result<Project, ApplicationError> {
        from_data(self.client.refetch(names::GET_PROJECT, json!(id)).await?)
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_project(
        &self,
        request: &CreateProjectRequest,
    ) -> Result<Project, ApplicationError> {
        validate_request(request)?;
        let project: Project = from_data(
            self.client
                .mutate(names::CREATE_PROJECT, to_args(request)?)
                .await?,
        )?;
        info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    /// Split the project's story into scenes
    #[instrument(skip(self))]
    pub async fn generate_segments(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<StorySegment>, ApplicationError> {
        let request = GenerateSegmentsRequest { project_id };
        let segments: Vec<StorySegment> = from_data(
            self.client
                .mutate(names::GENERATE_SEGMENTS, to_args(&request)?)
                .await?,
        )?;
        info!(project_id = %project_id, scenes = segments.len(), "Story segmented");
        Ok(segments)
    }
}
