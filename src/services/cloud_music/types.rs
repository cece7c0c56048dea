use serde::{Deserialize, Serialize};

/// A resolved track from the music service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MusicInfo {
    /// Track id at the music service
    pub id: String,
    /// Track title
    pub title: String,
    /// Track artist(s)
    pub artist: String,
    /// Album name
    pub album: String,
    /// Cover art URL
    pub thumbnail: Option<String>,
    /// Playable stream URL
    pub url: String,
    /// Track length in seconds
    pub duration: Option<f64>,
}

/// Ordered tracks of one player plus the current position
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayQueue {
    /// Tracks in play order
    pub tracks: Vec<MusicInfo>,
    /// Position of the current track
    pub index: usize,
}

impl PlayQueue {
    /// Create a queue positioned at `index`, clamped to the last track.
    pub fn new(tracks: Vec<MusicInfo>, index: usize) -> Self {
        let index = index.min(tracks.len().saturating_sub(1));
        Self { tracks, index }
    }

    /// Track at the current position
    pub fn current(&self) -> Option<&MusicInfo> {
        self.tracks.get(self.index)
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// What the proxy should play after the provider handled a play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayDirective {
    /// Play the queue's current track
    CurrentIndex,
    /// Play this URL directly
    Url(String),
    /// Tracks were added to the queue; play its current track
    QueueAppended,
}

impl PlayDirective {
    /// Interpret a provider's textual answer.
    ///
    /// `index` selects the current track, anything starting with `http`
    /// is played as is, anything else means the queue was extended.
    pub fn parse(answer: &str) -> Self {
        if answer == "index" {
            Self::CurrentIndex
        } else if answer.starts_with("http") {
            Self::Url(answer.to_string())
        } else {
            Self::QueueAppended
        }
    }
}

/// A node of the provider's media browse tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseMedia {
    /// Display title
    pub title: String,
    /// Kind of node, e.g. `playlist` or `track`
    pub media_class: String,
    /// Id to pass back when playing or expanding this node
    pub media_content_id: String,
    /// Content type to pass back with the id
    pub media_content_type: String,
    /// Whether the node can be played
    pub can_play: bool,
    /// Whether the node has children
    pub can_expand: bool,
    /// Artwork URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Child nodes, empty for leaves
    #[serde(default)]
    pub children: Vec<BrowseMedia>,
}
