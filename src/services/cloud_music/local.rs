use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, instrument};

use super::{BrowseMedia, MusicError, MusicInfo, MusicProvider, PlayDirective, PlayQueue};
use crate::services::media_player::{CloudMusicPlayer, MediaType, PlayerId};

/// Content id of the queue root in the browse tree.
const QUEUE_CONTENT_ID: &str = "queue";

/// Music provider holding one play queue per proxy player.
///
/// Media ids understood by [`MusicProvider::play_media`]:
/// - ids starting with `http` are played directly,
/// - `index` replays the current queue position,
/// - a decimal number selects that queue position.
#[derive(Default)]
pub struct LocalQueue {
    queues: RwLock<HashMap<PlayerId, PlayQueue>>,
}

impl LocalQueue {
    /// Create a provider without any queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a player's queue, positioned at `index`.
    pub fn load(&self, player: &PlayerId, tracks: Vec<MusicInfo>, index: usize) {
        debug!(player = %player, tracks = tracks.len(), index, "Loading play queue");
        self.queues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(player.clone(), PlayQueue::new(tracks, index));
    }

    /// Add tracks to the end of a player's queue, creating it if needed.
    ///
    /// Returns the new queue length.
    pub fn append(&self, player: &PlayerId, tracks: Vec<MusicInfo>) -> usize {
        let mut queues = self.queues.write().unwrap_or_else(PoisonError::into_inner);
        let queue = queues.entry(player.clone()).or_default();
        queue.tracks.extend(tracks);
        queue.len()
    }

    /// Drop a player's queue.
    pub fn clear(&self, player: &PlayerId) {
        self.queues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(player);
    }

    /// Move a player's queue position with `step`, which maps
    /// `(current index, queue length)` to the new index.
    fn step(
        &self,
        player: &PlayerId,
        step: impl FnOnce(usize, usize) -> usize,
    ) -> Result<usize, MusicError> {
        let mut queues = self.queues.write().unwrap_or_else(PoisonError::into_inner);
        let queue = queues
            .get_mut(player)
            .filter(|queue| !queue.is_empty())
            .ok_or_else(|| MusicError::EmptyQueue(player.clone()))?;

        queue.index = step(queue.index, queue.len()) % queue.len();
        Ok(queue.index)
    }

    async fn play_position(&self, player: &CloudMusicPlayer, index: usize) -> Result<(), MusicError> {
        player
            .play_media(MediaType::Music, &index.to_string())
            .await
            .map_err(|e| MusicError::Playback(Box::new(e)))
    }
}

/// Random position other than `current`, when there is one.
fn shuffled(current: usize, len: usize) -> usize {
    if len < 2 {
        return current;
    }
    current + rand::rng().random_range(1..len)
}

fn track_node(index: usize, track: &MusicInfo) -> BrowseMedia {
    BrowseMedia {
        title: track.title.clone(),
        media_class: "track".to_string(),
        media_content_id: index.to_string(),
        media_content_type: MediaType::Music.as_str().to_string(),
        can_play: true,
        can_expand: false,
        thumbnail: track.thumbnail.clone(),
        children: Vec::new(),
    }
}

#[async_trait]
impl MusicProvider for LocalQueue {
    #[instrument(skip(self, player), fields(player = %player.id()))]
    async fn play_media(
        &self,
        player: &CloudMusicPlayer,
        media_id: &str,
    ) -> Result<Option<PlayDirective>, MusicError> {
        let directive = PlayDirective::parse(media_id);
        if let PlayDirective::Url(_) = directive {
            return Ok(Some(directive));
        }

        let mut queues = self.queues.write().unwrap_or_else(PoisonError::into_inner);
        let queue = queues
            .get_mut(player.id())
            .ok_or_else(|| MusicError::EmptyQueue(player.id().clone()))?;

        if directive == PlayDirective::CurrentIndex {
            return Ok(Some(directive));
        }

        let index: usize = media_id
            .parse()
            .map_err(|_| MusicError::UnknownMedia(media_id.to_string()))?;
        if index >= queue.len() {
            return Err(MusicError::UnknownMedia(media_id.to_string()));
        }

        queue.index = index;
        Ok(Some(PlayDirective::CurrentIndex))
    }

    #[instrument(skip(self, player), fields(player = %player.id()))]
    async fn next_track(&self, player: &CloudMusicPlayer, shuffle: bool) -> Result<(), MusicError> {
        let index = self.step(player.id(), |current, len| {
            if shuffle {
                shuffled(current, len)
            } else {
                current + 1
            }
        })?;

        self.play_position(player, index).await
    }

    #[instrument(skip(self, player), fields(player = %player.id()))]
    async fn previous_track(
        &self,
        player: &CloudMusicPlayer,
        shuffle: bool,
    ) -> Result<(), MusicError> {
        let index = self.step(player.id(), |current, len| {
            if shuffle {
                shuffled(current, len)
            } else {
                current + len - 1
            }
        })?;

        self.play_position(player, index).await
    }

    async fn browse_media(
        &self,
        player: &CloudMusicPlayer,
        _content_type: Option<&str>,
        content_id: Option<&str>,
    ) -> Result<BrowseMedia, MusicError> {
        let queue = self.queue(player.id()).unwrap_or_default();

        match content_id {
            None | Some(QUEUE_CONTENT_ID) => Ok(BrowseMedia {
                title: player.name().to_string(),
                media_class: "playlist".to_string(),
                media_content_id: QUEUE_CONTENT_ID.to_string(),
                media_content_type: "playlist".to_string(),
                can_play: false,
                can_expand: true,
                thumbnail: queue.current().and_then(|track| track.thumbnail.clone()),
                children: queue
                    .tracks
                    .iter()
                    .enumerate()
                    .map(|(index, track)| track_node(index, track))
                    .collect(),
            }),
            Some(id) => id
                .parse::<usize>()
                .ok()
                .and_then(|index| queue.tracks.get(index).map(|track| track_node(index, track)))
                .ok_or_else(|| MusicError::UnknownMedia(id.to_string())),
        }
    }

    fn queue(&self, player: &PlayerId) -> Option<PlayQueue> {
        self.queues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(player)
            .cloned()
    }
}
