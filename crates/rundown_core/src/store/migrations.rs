//! Dataset migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Bring a freshly decoded dataset up to the latest version.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - After a migration step runs, `Dataset::db_version` equals its version.
//! - A dataset already at the latest version is left untouched.

use crate::model::dataset::{Dataset, StoryId};
use crate::store::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    apply: fn(&mut Dataset),
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    apply: assign_sequential_story_ids,
}];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations.
///
/// Returns `true` when at least one step ran, i.e. the in-memory dataset now
/// differs from what was decoded.
pub fn apply_migrations(dataset: &mut Dataset) -> StoreResult<bool> {
    let current = dataset.db_version;
    let latest = latest_version();

    if current > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            file_version: current,
            latest_supported: latest,
        });
    }

    if current == latest {
        return Ok(false);
    }

    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }
        (migration.apply)(dataset);
        dataset.db_version = migration.version;
    }

    Ok(true)
}

/// v0 -> v1: stories had no ids; number them by position, starting at 1.
fn assign_sequential_story_ids(dataset: &mut Dataset) {
    for episode in &mut dataset.episodes {
        for segment in &mut episode.segments {
            for (position, story) in segment.stories.iter_mut().enumerate() {
                story.id = StoryId::try_from(position + 1).unwrap_or(StoryId::MAX);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version};
    use crate::model::dataset::{Dataset, StoryDraft};
    use crate::store::StoreError;

    fn legacy() -> Dataset {
        let mut data = Dataset::new(vec!["News".to_string()], vec![]);
        data.add_episode("Ep");
        data.db_version = 0;
        let stories = &mut data.episodes[0].segments[0].stories;
        stories.push(StoryDraft::new("a", "", "A").into_story(0));
        stories.push(StoryDraft::new("b", "", "B").into_story(0));
        data
    }

    #[test]
    fn v0_gets_sequential_ids() {
        let mut data = legacy();
        assert!(apply_migrations(&mut data).expect("migration should succeed"));
        assert_eq!(data.db_version, latest_version());
        let ids: Vec<u32> = data.episodes[0].segments[0].stories.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn latest_version_is_noop() {
        let mut data = legacy();
        data.db_version = latest_version();
        let before = data.clone();
        assert!(!apply_migrations(&mut data).expect("noop should succeed"));
        assert_eq!(data, before);
    }

    #[test]
    fn newer_version_is_rejected() {
        let mut data = legacy();
        data.db_version = 99;
        match apply_migrations(&mut data) {
            Err(StoreError::UnsupportedSchemaVersion {
                file_version,
                latest_supported,
            }) => {
                assert_eq!(file_version, 99);
                assert_eq!(latest_supported, latest_version());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
