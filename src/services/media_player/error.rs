use super::PlayerId;
use crate::services::cloud_music::MusicError;
use crate::services::host::HostError;

/// Errors returned by proxy player commands
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    /// The host failed to run a forwarded command
    #[error("host command failed: {0}")]
    Host(#[from] HostError),

    /// The music provider failed to resolve or advance playback
    #[error("music provider failed: {0}")]
    Music(#[from] MusicError),

    /// A play request resolved to the current track, but there is none
    #[error("player {0} has no current track")]
    NoCurrentTrack(PlayerId),
}
