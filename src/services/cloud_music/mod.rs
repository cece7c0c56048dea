//! Cloud music provider seam.
//!
//! The provider decides what a proxy plays: it resolves play requests,
//! moves through the play queue and answers media browsing. [`LocalQueue`]
//! is an in-process provider backed by per-player queues.

/// Music provider error types
pub mod error;
/// In-process queue provider
pub mod local;
/// Provider trait
pub mod provider;
/// Track, queue and browse types
pub mod types;

pub use error::MusicError;
pub use local::LocalQueue;
pub use provider::MusicProvider;
pub use types::{BrowseMedia, MusicInfo, PlayDirective, PlayQueue};
