//! Proxy media player entity.
//!
//! A [`CloudMusicPlayer`] mirrors one target media player of the host,
//! forwards commands to it, and overlays track metadata and auto-advance
//! driven by a [`MusicProvider`](crate::services::cloud_music::MusicProvider).

/// Auto-advance decision policy
pub mod auto_advance;
/// Command forwarding
mod control;
/// Host-facing capability interface and display snapshot
pub mod entity;
/// Proxy error types
pub mod error;
/// Supported feature flags
pub mod features;
/// Target state monitoring
mod monitoring;
/// The proxy player model
mod player;
/// Property forwarding
mod properties;
/// Player setup from configuration
mod setup;
/// Identifiers, modes and commands
pub mod types;

pub use auto_advance::AutoAdvance;
pub use entity::{MediaPlayerEntity, PlayerSnapshot};
pub use error::MediaError;
pub use features::SupportedFeatures;
pub use player::CloudMusicPlayer;
pub use setup::setup_players;
pub use types::{DeviceInfo, MediaType, PlayerCommand, PlayerId, RepeatMode};
