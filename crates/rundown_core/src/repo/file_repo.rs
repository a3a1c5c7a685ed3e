//! Write-through persistence facade over the in-memory aggregate.
//!
//! # Responsibility
//! - Load (and migrate) the dataset file once at startup.
//! - Forward reads verbatim; save the whole dataset after every mutation.
//!
//! # Invariants
//! - A mutation is visible only if its save succeeded; otherwise the
//!   in-memory dataset is rolled back and the storage error returned.
//! - Failed lookups (`*NotFound`) never trigger a save.

use crate::model::dataset::{Dataset, Episode, Story, StoryDraft, StoryId};
use crate::placement::{RandomSource, RngSource};
use crate::repo::memory_repo::MemoryRepository;
use crate::repo::{RepoResult, RundownRepository};
use crate::store::{load_dataset, save_dataset, StoreResult};
use log::warn;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

/// File-backed rundown repository.
pub struct FileRepository<S: RandomSource = RngSource<StdRng>> {
    inner: MemoryRepository<S>,
    path: PathBuf,
}

impl FileRepository {
    /// Loads and migrates `path` with an entropy-seeded placement source.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open_with_rng(path, RngSource::from_entropy())
    }
}

impl<S: RandomSource> FileRepository<S> {
    /// Loads and migrates `path`, placing stories with `rng`.
    ///
    /// Fails when the file is missing, malformed or from a newer schema.
    pub fn open_with_rng(path: impl Into<PathBuf>, rng: S) -> StoreResult<Self> {
        let path = path.into();
        let dataset = load_dataset(&path)?;
        Ok(Self::with_rng(path, dataset, rng))
    }

    /// Wraps an already loaded dataset. Nothing is read or written.
    pub fn with_rng(path: impl Into<PathBuf>, dataset: Dataset, rng: S) -> Self {
        Self {
            inner: MemoryRepository::with_rng(dataset, rng),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current dataset to the configured file.
    pub fn save(&self) -> StoreResult<()> {
        save_dataset(&self.path, self.inner.dataset())
    }

    fn write_through<T>(
        &mut self,
        operation: &'static str,
        mutate: impl FnOnce(&mut MemoryRepository<S>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let snapshot = self.inner.dataset().clone();
        let value = mutate(&mut self.inner)?;
        if let Err(err) = self.save() {
            self.inner.replace_dataset(snapshot);
            warn!(
                "event=write_rollback module=repo status=error operation={} error={}",
                operation, err
            );
            return Err(err.into());
        }
        Ok(value)
    }
}

impl<S: RandomSource> RundownRepository for FileRepository<S> {
    fn dataset(&self) -> &Dataset {
        self.inner.dataset()
    }

    fn add_episode(&mut self, title: &str) -> RepoResult<Episode> {
        self.write_through("add_episode", |repo| repo.add_episode(title))
    }

    fn add_story(
        &mut self,
        slug: &str,
        segment_name: &str,
        draft: StoryDraft,
    ) -> RepoResult<Story> {
        self.write_through("add_story", |repo| repo.add_story(slug, segment_name, draft))
    }

    fn update_story(
        &mut self,
        slug: &str,
        segment_index: usize,
        story_id: StoryId,
        draft: StoryDraft,
    ) -> RepoResult<Story> {
        self.write_through("update_story", |repo| {
            repo.update_story(slug, segment_index, story_id, draft)
        })
    }

    fn delete_story(
        &mut self,
        slug: &str,
        segment_index: usize,
        story_id: StoryId,
    ) -> RepoResult<Story> {
        self.write_through("delete_story", |repo| {
            repo.delete_story(slug, segment_index, story_id)
        })
    }
}
