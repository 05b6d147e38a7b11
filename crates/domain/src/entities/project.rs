//! Story projects and their generated scenes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ProjectId;

/// A story being turned into an animation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub story_text: String,
    pub duration_sec: u32,
    pub status: String,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl Project {
    /// Whether the story has been segmented into scenes yet
    pub fn is_segmented(&self) -> bool {
        !self.scenes.is_empty()
    }

    /// Scenes whose background image has been generated
    pub fn scenes_with_background(&self) -> usize {
        self.scenes.iter().filter(|s| s.has_background()).count()
    }
}

/// One scene of a segmented story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: i64,
    pub description: String,
    #[serde(default)]
    pub background_prompt: String,
    /// Location of the generated background; empty until generated
    #[serde(default)]
    pub background_path: Option<String>,
    #[serde(default)]
    pub character_prompts: Vec<String>,
    /// Generated character images, index-aligned with `character_prompts`
    #[serde(default)]
    pub character_paths: Vec<String>,
}

impl Scene {
    pub fn has_background(&self) -> bool {
        self.background_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }

    /// Number of characters whose image has been generated
    pub fn ready_characters(&self) -> usize {
        self.character_prompts
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                self.character_paths
                    .get(*i)
                    .is_some_and(|p| !p.trim().is_empty())
            })
            .count()
    }
}

/// Scene produced by the segmentation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySegment {
    pub id: i64,
    pub description: String,
    pub background_prompt: String,
}
