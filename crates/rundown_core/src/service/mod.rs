//! Core use-case services.
//!
//! # Responsibility
//! - Share one repository between concurrent request handlers.
//! - Keep HTTP/CLI layers decoupled from locking and storage details.

pub mod rundown_service;
