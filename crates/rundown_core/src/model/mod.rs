//! Rundown domain model.
//!
//! # Responsibility
//! - Define the dataset/episode/segment/story containment tree.
//! - Keep the on-disk field naming next to the types that carry it.
//!
//! # Invariants
//! - Containment is strict: every story belongs to exactly one segment,
//!   every segment to exactly one episode.
//! - An episode's segments mirror the dataset's default segments at creation.

pub mod dataset;
pub mod slug;
