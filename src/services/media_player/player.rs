use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use futures::stream::{self, select_all};
use futures::{Stream, StreamExt, future};
use tracing::{debug, info, instrument, warn};

use super::monitoring::TargetMonitor;
use super::{AutoAdvance, PlayerId, PlayerSnapshot, RepeatMode};
use crate::config::CloudMusicConfig;
use crate::services::cloud_music::{MusicInfo, MusicProvider};
use crate::services::common::{Clock, Property, SystemClock};
use crate::services::host::{EntityId, HomeHost, StateChangedEvent, TargetState};

/// Media player that proxies a host-managed target player.
///
/// Playback state is always read through from the target's latest
/// snapshot; the proxy only owns its shuffle/repeat modes, the playing
/// flag used for auto-advance, and the cached track metadata. Cloning is
/// cheap and every clone drives the same player.
#[derive(Clone)]
pub struct CloudMusicPlayer {
    pub(super) inner: Arc<PlayerInner>,
}

pub(super) struct PlayerInner {
    pub(super) id: PlayerId,
    pub(super) name: String,
    pub(super) target: EntityId,

    pub(super) host: Arc<dyn HomeHost>,
    pub(super) music: Arc<dyn MusicProvider>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) auto_advance: AutoAdvance,

    /// Last snapshot of the target, `None` until the host knows it
    pub(super) target_state: Property<Option<Arc<TargetState>>>,
    /// Current track of the provider's queue
    pub(super) music_info: Property<Option<MusicInfo>>,
    /// Set by play, cleared by pause/stop/turn off
    pub(super) playing: Property<bool>,
    pub(super) shuffle: Property<bool>,
    pub(super) repeat: Property<RepeatMode>,
    /// Last play or track change
    pub(super) track_last_at: Property<DateTime<Utc>>,
    /// Content id last sent with play_media
    pub(super) media_content_id: Property<Option<String>>,

    monitor: Mutex<Option<TargetMonitor>>,
}

impl CloudMusicPlayer {
    /// Create a proxy for `target` using the system clock.
    ///
    /// The proxy starts without a target snapshot; call [`update`](Self::update)
    /// and [`start_monitoring`](Self::start_monitoring) to bring it live.
    pub fn new(
        target: EntityId,
        host: Arc<dyn HomeHost>,
        music: Arc<dyn MusicProvider>,
        config: &CloudMusicConfig,
    ) -> Self {
        Self::with_clock(target, host, music, config, Arc::new(SystemClock))
    }

    /// Create a proxy for `target` reading time from `clock`.
    pub fn with_clock(
        target: EntityId,
        host: Arc<dyn HomeHost>,
        music: Arc<dyn MusicProvider>,
        config: &CloudMusicConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let now = clock.now();

        Self {
            inner: Arc::new(PlayerInner {
                id: PlayerId::for_target(&target),
                name: format!("{} {}", config.name, target.object_id()),
                target,
                host,
                music,
                clock,
                auto_advance: AutoAdvance::new(&config.auto_advance),
                target_state: Property::new(None),
                music_info: Property::new(None),
                playing: Property::new(false),
                shuffle: Property::new(config.shuffle),
                repeat: Property::new(config.repeat),
                track_last_at: Property::new(now),
                media_content_id: Property::new(None),
                monitor: Mutex::new(None),
            }),
        }
    }

    /// Re-read the target snapshot and the provider's current track.
    ///
    /// The snapshot is replaced as a whole, never merged.
    pub fn update(&self) {
        let snapshot = self.inner.host.state(&self.inner.target).map(Arc::new);
        debug!(
            player = %self.inner.id,
            state = ?snapshot.as_ref().map(|s| s.state),
            "Refreshing target snapshot"
        );
        self.inner.target_state.set(snapshot);
        self.refresh_music_info();
    }

    pub(super) fn refresh_music_info(&self) {
        let info = self
            .inner
            .music
            .queue(&self.inner.id)
            .and_then(|queue| queue.current().cloned());
        self.inner.music_info.set(info);
    }

    /// Subscribe to the target's state changes.
    ///
    /// Every change refreshes the proxy and may trigger auto-advance.
    /// Starting again replaces the previous subscription.
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub fn start_monitoring(&self) {
        let monitor = TargetMonitor::start(self);
        let previous = self
            .inner
            .monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(monitor);

        if previous.is_some() {
            debug!("Replaced existing target subscription");
        }
    }

    /// Release the target subscription.
    ///
    /// Commands already in flight are not cancelled.
    #[instrument(skip(self), fields(player = %self.inner.id))]
    pub fn stop_monitoring(&self) {
        let monitor = self
            .inner
            .monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if monitor.is_some() {
            info!("Stopped monitoring target");
        }
    }

    /// Whether a target subscription is active
    pub fn is_monitoring(&self) -> bool {
        self.inner
            .monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Handle a state change of the target.
    pub(super) fn on_target_changed(&self, event: &StateChangedEvent) {
        self.update();

        let since_last_action = self.inner.clock.now() - self.inner.track_last_at.get();
        let advance = self.inner.auto_advance.should_advance(
            self.inner.playing.get(),
            self.inner.repeat.get(),
            event,
            since_last_action,
        );

        if !advance {
            return;
        }

        info!(
            player = %self.inner.id,
            target = %event.entity_id,
            "Target went idle after playing, advancing to next track"
        );

        let player = self.clone();
        tokio::spawn(async move {
            if let Err(e) = player.media_next_track().await {
                warn!(player = %player.inner.id, error = %e, "Auto-advance failed");
            }
        });
    }

    /// Stream of display snapshots.
    ///
    /// Yields the current snapshot once, then again whenever the target
    /// snapshot, the current track or any local mode changes.
    pub fn watch(&self) -> impl Stream<Item = PlayerSnapshot> + Send + use<> {
        let changes = vec![
            self.inner.target_state.watch_changes().map(|_| ()).boxed(),
            self.inner.music_info.watch_changes().map(|_| ()).boxed(),
            self.inner.playing.watch_changes().map(|_| ()).boxed(),
            self.inner.shuffle.watch_changes().map(|_| ()).boxed(),
            self.inner.repeat.watch_changes().map(|_| ()).boxed(),
            self.inner.media_content_id.watch_changes().map(|_| ()).boxed(),
        ];

        let player = self.clone();
        stream::once(future::ready(()))
            .chain(select_all(changes))
            .map(move |()| player.snapshot())
    }
}

impl fmt::Debug for CloudMusicPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudMusicPlayer")
            .field("id", &self.inner.id)
            .field("target", &self.inner.target)
            .field("state", &self.state())
            .field("playing", &self.inner.playing.get())
            .finish()
    }
}
