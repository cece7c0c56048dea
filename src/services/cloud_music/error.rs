use crate::services::media_player::{MediaError, PlayerId};

/// Errors reported by a music provider
#[derive(thiserror::Error, Debug)]
pub enum MusicError {
    /// The player has no queue, or its queue holds no tracks
    #[error("play queue of {0} is empty")]
    EmptyQueue(PlayerId),

    /// The media id doesn't name anything the provider can play or browse
    #[error("unknown media id '{0}'")]
    UnknownMedia(String),

    /// The provider's backing service failed
    #[error("music service unavailable: {0}")]
    Unavailable(String),

    /// Playing the resolved track on the proxy failed
    #[error("playback on proxy failed: {0}")]
    Playback(#[source] Box<MediaError>),
}
