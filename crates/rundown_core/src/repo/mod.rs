//! Repository layer: the rundown aggregate and its persistence facade.
//!
//! # Responsibility
//! - Define the use-case oriented contract consumed by the HTTP surface.
//! - Provide an in-memory aggregate and a write-through file facade.
//!
//! # Invariants
//! - Story positions are decided only by the placement engine.
//! - Repository APIs return semantic errors (`*NotFound`) in addition to
//!   storage errors.
//! - A failed write leaves the in-memory dataset as it was before the call.

use crate::model::dataset::{Dataset, Episode, Story, StoryDraft, StoryId};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod file_repo;
pub mod memory_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    EpisodeNotFound(String),
    SegmentNotFound {
        slug: String,
        name: String,
    },
    SegmentIndexOutOfRange {
        slug: String,
        index: usize,
        len: usize,
    },
    StoryNotFound {
        slug: String,
        segment: String,
        id: StoryId,
    },
    Store(StoreError),
}

impl RepoError {
    /// Whether the error means "the addressed thing does not exist".
    pub fn is_not_found(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EpisodeNotFound(slug) => write!(f, "episode not found: `{slug}`"),
            Self::SegmentNotFound { slug, name } => {
                write!(f, "segment `{name}` not found in episode `{slug}`")
            }
            Self::SegmentIndexOutOfRange { slug, index, len } => write!(
                f,
                "segment index {index} out of range for episode `{slug}` with {len} segments"
            ),
            Self::StoryNotFound { slug, segment, id } => {
                write!(f, "story {id} not found in segment `{segment}` of episode `{slug}`")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Repository interface for rundown operations.
///
/// Add-story addresses a segment by name; lookup, edit and delete address it
/// by its position within the episode.
pub trait RundownRepository {
    /// Whole dataset, read-only.
    fn dataset(&self) -> &Dataset;

    /// Episodes in storage order (newest first).
    fn episode_list(&self) -> &[Episode] {
        &self.dataset().episodes
    }

    fn episode_by_slug(&self, slug: &str) -> RepoResult<&Episode> {
        self.dataset()
            .episode_by_slug(slug)
            .ok_or_else(|| RepoError::EpisodeNotFound(slug.to_string()))
    }

    /// Story at `segment_index` / `story_id` within the episode.
    fn story(&self, slug: &str, segment_index: usize, story_id: StoryId) -> RepoResult<&Story> {
        let episode = self.episode_by_slug(slug)?;
        let segment = episode.segments.get(segment_index).ok_or_else(|| {
            RepoError::SegmentIndexOutOfRange {
                slug: slug.to_string(),
                index: segment_index,
                len: episode.segments.len(),
            }
        })?;
        segment
            .story_by_id(story_id)
            .ok_or_else(|| RepoError::StoryNotFound {
                slug: slug.to_string(),
                segment: segment.name.clone(),
                id: story_id,
            })
    }

    fn presenter_names(&self) -> &[String] {
        &self.dataset().presenters
    }

    /// Creates an episode from the default segments and returns it.
    fn add_episode(&mut self, title: &str) -> RepoResult<Episode>;

    /// Places a new story into the named segment and returns it with its id.
    fn add_story(&mut self, slug: &str, segment_name: &str, draft: StoryDraft)
        -> RepoResult<Story>;

    /// Replaces title, notes and presenter in place. Position and id stay.
    fn update_story(
        &mut self,
        slug: &str,
        segment_index: usize,
        story_id: StoryId,
        draft: StoryDraft,
    ) -> RepoResult<Story>;

    /// Removes the first story carrying `story_id` and returns it.
    fn delete_story(&mut self, slug: &str, segment_index: usize, story_id: StoryId)
        -> RepoResult<Story>;
}
