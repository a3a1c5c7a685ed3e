//! Thread-safe rundown service.
//!
//! # Responsibility
//! - Serialize mutations behind one process-wide lock.
//! - Hand out owned snapshots so callers never hold the lock while rendering.
//!
//! # Invariants
//! - Writers hold the exclusive lock across the in-memory change and the
//!   file write.
//! - Readers observe either the state before or after a mutation, never a
//!   partial one.

use crate::model::dataset::{Episode, Story, StoryDraft, StoryId};
use crate::repo::{RepoResult, RundownRepository};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Repository shared behind a read-write lock.
pub struct RundownService<R: RundownRepository> {
    repo: RwLock<R>,
}

impl<R: RundownRepository> RundownService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo: RwLock::new(repo),
        }
    }

    /// Runs `read` against a consistent snapshot under the shared lock.
    pub fn read<T>(&self, read: impl FnOnce(&R) -> T) -> T {
        read(&self.read_guard())
    }

    /// Episodes in storage order (newest first).
    pub fn episode_list(&self) -> Vec<Episode> {
        self.read(|repo| repo.episode_list().to_vec())
    }

    pub fn episode_by_slug(&self, slug: &str) -> RepoResult<Episode> {
        self.read(|repo| repo.episode_by_slug(slug).cloned())
    }

    /// Episode plus presenter names, taken from the same snapshot.
    pub fn episode_with_presenters(&self, slug: &str) -> RepoResult<(Episode, Vec<String>)> {
        self.read(|repo| {
            let episode = repo.episode_by_slug(slug)?.clone();
            Ok((episode, repo.presenter_names().to_vec()))
        })
    }

    pub fn story(&self, slug: &str, segment_index: usize, story_id: StoryId) -> RepoResult<Story> {
        self.read(|repo| repo.story(slug, segment_index, story_id).cloned())
    }

    pub fn presenter_names(&self) -> Vec<String> {
        self.read(|repo| repo.presenter_names().to_vec())
    }

    pub fn add_episode(&self, title: &str) -> RepoResult<Episode> {
        self.write_guard().add_episode(title)
    }

    pub fn add_story(
        &self,
        slug: &str,
        segment_name: &str,
        draft: StoryDraft,
    ) -> RepoResult<Story> {
        self.write_guard().add_story(slug, segment_name, draft)
    }

    pub fn update_story(
        &self,
        slug: &str,
        segment_index: usize,
        story_id: StoryId,
        draft: StoryDraft,
    ) -> RepoResult<Story> {
        self.write_guard()
            .update_story(slug, segment_index, story_id, draft)
    }

    pub fn delete_story(
        &self,
        slug: &str,
        segment_index: usize,
        story_id: StoryId,
    ) -> RepoResult<Story> {
        self.write_guard().delete_story(slug, segment_index, story_id)
    }

    // Poisoning is ignored: repository writes never leave partial state.
    fn read_guard(&self) -> RwLockReadGuard<'_, R> {
        self.repo.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, R> {
        self.repo.write().unwrap_or_else(PoisonError::into_inner)
    }
}
