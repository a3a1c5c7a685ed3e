//! Core domain logic for rundown, the episode rundown back-office.
//! This crate is the single source of truth for placement and storage
//! invariants.

pub mod logging;
pub mod model;
pub mod placement;
pub mod render;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::dataset::{Dataset, Episode, Segment, Story, StoryDraft, StoryId};
pub use model::slug::slugify;
pub use placement::{choose_placement, Placement, Policy, RandomSource, RngSource};
pub use render::escape_html;
pub use render::export::render_markdown;
pub use render::notes::notes_html;
pub use repo::file_repo::FileRepository;
pub use repo::memory_repo::MemoryRepository;
pub use repo::{RepoError, RepoResult, RundownRepository};
pub use service::rundown_service::RundownService;
pub use store::{load_dataset, read_dataset, save_dataset, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
