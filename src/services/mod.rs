/// Cloud music provider seam and the local play queue
pub mod cloud_music;
/// Shared building blocks for services
pub mod common;
/// Home automation host seam
pub mod host;
/// Proxy media player entity
pub mod media_player;

pub use cloud_music::{LocalQueue, MusicProvider};
pub use host::{HomeHost, InMemoryHost};
pub use media_player::{CloudMusicPlayer, MediaPlayerEntity, setup_players};
