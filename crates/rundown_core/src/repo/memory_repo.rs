//! In-memory rundown aggregate.
//!
//! # Responsibility
//! - Own the dataset and the random source used for story placement.
//! - Implement every repository operation without touching storage.
//!
//! # Invariants
//! - A new story's id equals the segment's story count after insertion.
//! - Episodes are prepended, so storage order is newest first.

use crate::model::dataset::{Dataset, Episode, Segment, Story, StoryDraft, StoryId};
use crate::placement::{choose_placement, RandomSource, RngSource};
use crate::repo::{RepoError, RepoResult, RundownRepository};
use log::{debug, info};
use rand::rngs::StdRng;

/// Aggregate over a dataset held in memory.
pub struct MemoryRepository<S: RandomSource = RngSource<StdRng>> {
    dataset: Dataset,
    rng: S,
}

impl<S: RandomSource> MemoryRepository<S> {
    pub fn with_rng(dataset: Dataset, rng: S) -> Self {
        Self { dataset, rng }
    }

    /// Swaps in `dataset`, returning the previous one.
    pub(crate) fn replace_dataset(&mut self, dataset: Dataset) -> Dataset {
        std::mem::replace(&mut self.dataset, dataset)
    }

    fn segment_at_mut(&mut self, slug: &str, segment_index: usize) -> RepoResult<&mut Segment> {
        let episode = self
            .dataset
            .episode_by_slug_mut(slug)
            .ok_or_else(|| RepoError::EpisodeNotFound(slug.to_string()))?;
        let len = episode.segments.len();
        episode
            .segments
            .get_mut(segment_index)
            .ok_or_else(|| RepoError::SegmentIndexOutOfRange {
                slug: slug.to_string(),
                index: segment_index,
                len,
            })
    }
}

impl<S: RandomSource> RundownRepository for MemoryRepository<S> {
    fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn add_episode(&mut self, title: &str) -> RepoResult<Episode> {
        let episode = self.dataset.add_episode(title).clone();
        info!(
            "event=episode_add module=repo status=ok slug={} segments={}",
            episode.slug,
            episode.segments.len()
        );
        Ok(episode)
    }

    fn add_story(
        &mut self,
        slug: &str,
        segment_name: &str,
        draft: StoryDraft,
    ) -> RepoResult<Story> {
        let episode = self
            .dataset
            .episode_by_slug_mut(slug)
            .ok_or_else(|| RepoError::EpisodeNotFound(slug.to_string()))?;
        let segment = episode
            .segment_by_name_mut(segment_name)
            .ok_or_else(|| RepoError::SegmentNotFound {
                slug: slug.to_string(),
                name: segment_name.to_string(),
            })?;

        let story = draft.into_story(segment.next_story_id());
        let placement = choose_placement(&segment.stories, &story.presenter, &mut self.rng);
        segment.stories.insert(placement.index, story.clone());

        info!(
            "event=story_add module=repo status=ok slug={} segment={} story_id={} policy={} index={}",
            slug, segment_name, story.id, placement.policy, placement.index
        );
        debug!(
            "event=story_add module=repo status=ok stories={} alternates={}",
            segment.stories.len(),
            segment.alternates()
        );
        Ok(story)
    }

    fn update_story(
        &mut self,
        slug: &str,
        segment_index: usize,
        story_id: StoryId,
        draft: StoryDraft,
    ) -> RepoResult<Story> {
        let segment = self.segment_at_mut(slug, segment_index)?;
        let segment_name = segment.name.clone();
        let story = segment
            .story_by_id_mut(story_id)
            .ok_or_else(|| RepoError::StoryNotFound {
                slug: slug.to_string(),
                segment: segment_name,
                id: story_id,
            })?;

        story.title = draft.title;
        story.notes = draft.notes;
        story.presenter = draft.presenter;

        info!(
            "event=story_update module=repo status=ok slug={} segment_index={} story_id={}",
            slug, segment_index, story_id
        );
        Ok(story.clone())
    }

    fn delete_story(
        &mut self,
        slug: &str,
        segment_index: usize,
        story_id: StoryId,
    ) -> RepoResult<Story> {
        let segment = self.segment_at_mut(slug, segment_index)?;
        let segment_name = segment.name.clone();
        let removed = segment
            .remove_story(story_id)
            .ok_or_else(|| RepoError::StoryNotFound {
                slug: slug.to_string(),
                segment: segment_name,
                id: story_id,
            })?;

        info!(
            "event=story_delete module=repo status=ok slug={} segment_index={} story_id={}",
            slug, segment_index, story_id
        );
        Ok(removed)
    }
}
