//! Integration tests for the proxy media player.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use futures::StreamExt;
use serde_json::{Map, Value, json};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use cloud_music_proxy::config::CloudMusicConfig;
use cloud_music_proxy::services::cloud_music::{
    BrowseMedia, LocalQueue, MusicError, MusicInfo, MusicProvider, PlayDirective, PlayQueue,
};
use cloud_music_proxy::services::common::{Clock, ManualClock};
use cloud_music_proxy::services::host::{
    EntityId, HostError, InMemoryHost, PlayerState, Service,
};
use cloud_music_proxy::services::media_player::{
    CloudMusicPlayer, MediaError, MediaType, PlayerId, RepeatMode, SupportedFeatures,
    setup_players,
};

#[derive(Debug, Clone, PartialEq)]
enum ProviderCall {
    PlayMedia(String),
    Next { shuffle: bool },
    Previous { shuffle: bool },
}

/// Provider that records every request and answers from fixed values.
struct RecordingProvider {
    calls: mpsc::UnboundedSender<ProviderCall>,
    directive: Mutex<Option<PlayDirective>>,
    queue: Mutex<Option<PlayQueue>>,
}

impl RecordingProvider {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ProviderCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        let provider = Arc::new(Self {
            calls,
            directive: Mutex::new(None),
            queue: Mutex::new(None),
        });
        (provider, rx)
    }

    fn answer(&self, directive: Option<PlayDirective>) {
        *self.directive.lock().unwrap() = directive;
    }

    fn set_queue(&self, queue: Option<PlayQueue>) {
        *self.queue.lock().unwrap() = queue;
    }
}

#[async_trait]
impl MusicProvider for RecordingProvider {
    async fn play_media(
        &self,
        _player: &CloudMusicPlayer,
        media_id: &str,
    ) -> Result<Option<PlayDirective>, MusicError> {
        self.calls
            .send(ProviderCall::PlayMedia(media_id.to_string()))
            .unwrap();
        Ok(self.directive.lock().unwrap().clone())
    }

    async fn next_track(&self, _player: &CloudMusicPlayer, shuffle: bool) -> Result<(), MusicError> {
        self.calls.send(ProviderCall::Next { shuffle }).unwrap();
        Ok(())
    }

    async fn previous_track(
        &self,
        _player: &CloudMusicPlayer,
        shuffle: bool,
    ) -> Result<(), MusicError> {
        self.calls.send(ProviderCall::Previous { shuffle }).unwrap();
        Ok(())
    }

    async fn browse_media(
        &self,
        _player: &CloudMusicPlayer,
        _content_type: Option<&str>,
        content_id: Option<&str>,
    ) -> Result<BrowseMedia, MusicError> {
        Err(MusicError::UnknownMedia(
            content_id.unwrap_or_default().to_string(),
        ))
    }

    fn queue(&self, _player: &PlayerId) -> Option<PlayQueue> {
        self.queue.lock().unwrap().clone()
    }
}

fn tv1() -> EntityId {
    EntityId::parse("media_player.tv1").unwrap()
}

fn attrs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn track(id: &str) -> MusicInfo {
    MusicInfo {
        id: id.to_string(),
        title: format!("Song {id}"),
        artist: format!("Singer {id}"),
        album: format!("Album {id}"),
        thumbnail: Some(format!("https://img.example/{id}.jpg")),
        url: format!("https://cdn.example/{id}.mp3"),
        duration: Some(180.0),
    }
}

struct Fixture {
    host: Arc<InMemoryHost>,
    provider: Arc<RecordingProvider>,
    calls: mpsc::UnboundedReceiver<ProviderCall>,
    clock: Arc<ManualClock>,
    player: CloudMusicPlayer,
}

fn fixture() -> Fixture {
    let host = Arc::new(InMemoryHost::new());
    let (provider, calls) = RecordingProvider::new();
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let player = CloudMusicPlayer::with_clock(
        tv1(),
        host.clone(),
        provider.clone(),
        &CloudMusicConfig::default(),
        clock.clone(),
    );

    Fixture {
        host,
        provider,
        calls,
        clock,
        player,
    }
}

async fn eventually(check: impl Fn() -> bool) {
    timeout(Duration::from_secs(2), async {
        while !check() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

mod property_forwarding {
    use super::*;

    #[test]
    fn getters_are_empty_without_snapshot() {
        let f = fixture();

        assert_eq!(f.player.state(), PlayerState::Unknown);
        assert_eq!(f.player.volume_level(), None);
        assert!(!f.player.is_volume_muted());
        assert_eq!(f.player.media_title(), None);
        assert_eq!(f.player.source_list(), None);
        assert_eq!(f.player.media_position(), None);
        assert_eq!(f.player.supported_features(), SupportedFeatures::PROXY);
    }

    #[test]
    fn identity_follows_target() {
        let f = fixture();

        assert_eq!(f.player.id().as_str(), "cloud_musicmedia_player.tv1");
        assert_eq!(f.player.name(), "Cloud Music tv1");
        assert_eq!(f.player.repeat(), RepeatMode::All);
        assert!(!f.player.shuffle());
        assert!(!f.player.is_playing());
        assert_eq!(f.player.device_info().manufacturer, "NetEase");
    }

    #[test]
    fn volume_is_coerced_from_strings() {
        let f = fixture();

        f.host.set_state(&tv1(), PlayerState::Playing, attrs(json!({ "volume_level": "0.5" })));
        f.player.update();
        assert_eq!(f.player.volume_level(), Some(0.5));

        f.host.set_state(&tv1(), PlayerState::Playing, attrs(json!({ "volume_level": "loud" })));
        f.player.update();
        assert_eq!(f.player.volume_level(), None);

        f.host.set_state(&tv1(), PlayerState::Playing, attrs(json!({ "volume_level": 0.8 })));
        f.player.update();
        assert_eq!(f.player.volume_level(), Some(0.8));
    }

    #[test]
    fn mute_accepts_on_string() {
        let f = fixture();

        f.host.set_state(&tv1(), PlayerState::Idle, attrs(json!({ "is_volume_muted": "on" })));
        f.player.update();
        assert!(f.player.is_volume_muted());

        f.host.set_state(&tv1(), PlayerState::Idle, attrs(json!({ "is_volume_muted": "off" })));
        f.player.update();
        assert!(!f.player.is_volume_muted());

        f.host.set_state(&tv1(), PlayerState::Idle, attrs(json!({ "is_volume_muted": true })));
        f.player.update();
        assert!(f.player.is_volume_muted());
    }

    #[test]
    fn target_attributes_are_forwarded() {
        let f = fixture();

        f.host.set_state(
            &tv1(),
            PlayerState::Paused,
            attrs(json!({
                "media_duration": 215.5,
                "media_position": 12,
                "source": "Spotify",
                "source_list": ["Spotify", "HDMI 1"],
                "sound_mode": "music",
                "media_track": 4,
                "app_id": "spotify",
            })),
        );
        f.player.update();

        assert_eq!(f.player.state(), PlayerState::Paused);
        assert_eq!(f.player.media_duration(), Some(215.5));
        assert_eq!(f.player.media_position(), Some(12.0));
        assert_eq!(f.player.source().as_deref(), Some("Spotify"));
        assert_eq!(f.player.source_list().unwrap().len(), 2);
        assert_eq!(f.player.sound_mode().as_deref(), Some("music"));
        assert_eq!(f.player.media_track(), Some(4));
        assert_eq!(f.player.app_id().as_deref(), Some("spotify"));
    }

    #[test]
    fn track_metadata_comes_from_the_queue() {
        let f = fixture();
        f.provider.set_queue(Some(PlayQueue::new(vec![track("a"), track("b")], 1)));

        f.player.update();

        assert_eq!(f.player.media_title().as_deref(), Some("Song b"));
        assert_eq!(f.player.media_artist().as_deref(), Some("Singer b"));
        assert_eq!(f.player.app_name().as_deref(), Some("Singer b"));
        assert_eq!(f.player.media_album_name().as_deref(), Some("Album b"));
        assert_eq!(
            f.player.entity_picture().as_deref(),
            Some("https://img.example/b.jpg")
        );
    }

    #[test]
    fn proxy_features_are_always_added() {
        let f = fixture();
        let target = SupportedFeatures::PAUSE | SupportedFeatures::VOLUME_SET;

        f.host.set_state(
            &tv1(),
            PlayerState::On,
            attrs(json!({ "supported_features": target.bits() })),
        );
        f.player.update();

        let features = f.player.supported_features();
        assert!(features.contains(target));
        assert!(features.contains(SupportedFeatures::PROXY));
        assert!(!features.contains(SupportedFeatures::SEEK));
    }

    #[test]
    fn unnamed_target_feature_bits_pass_through() {
        let f = fixture();

        f.host.set_state(
            &tv1(),
            PlayerState::On,
            attrs(json!({ "supported_features": 0x40_0001 })),
        );
        f.player.update();

        assert_eq!(f.player.supported_features().bits(), 0x46_8231);
    }

    #[tokio::test]
    async fn watch_yields_once_then_per_change() {
        let f = fixture();
        let mut snapshots = Box::pin(f.player.watch());
        let quiet = Duration::from_millis(50);

        let initial = timeout(Duration::from_secs(1), snapshots.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(initial.state, PlayerState::Unknown);
        assert!(!initial.shuffle);
        assert!(timeout(quiet, snapshots.next()).await.is_err());

        f.player.set_shuffle(true);
        let shuffled = timeout(Duration::from_secs(1), snapshots.next())
            .await
            .unwrap()
            .unwrap();
        assert!(shuffled.shuffle);
        assert!(timeout(quiet, snapshots.next()).await.is_err());

        f.host.set_state(&tv1(), PlayerState::Paused, Map::new());
        f.player.update();
        let paused = timeout(Duration::from_secs(1), snapshots.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(paused.state, PlayerState::Paused);
        assert!(timeout(quiet, snapshots.next()).await.is_err());
    }
}

mod command_forwarding {
    use super::*;

    #[tokio::test]
    async fn play_pause_stop_and_off_track_the_playing_flag() {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Paused, Map::new());
        f.player.update();

        f.player.media_play().await.unwrap();
        assert!(f.player.is_playing());

        f.player.media_pause().await.unwrap();
        assert!(!f.player.is_playing());

        f.player.media_play().await.unwrap();
        f.player.media_stop().await.unwrap();
        assert!(!f.player.is_playing());

        f.player.media_play().await.unwrap();
        f.player.turn_off().await.unwrap();
        assert!(!f.player.is_playing());

        let services: Vec<Service> = f.host.service_calls().iter().map(|c| c.service).collect();
        assert_eq!(
            services,
            vec![
                Service::MediaPlay,
                Service::MediaPause,
                Service::MediaPlay,
                Service::MediaStop,
                Service::MediaPlay,
                Service::TurnOff,
            ]
        );
    }

    #[tokio::test]
    async fn play_stamps_last_action_time() {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Idle, Map::new());
        f.player.update();

        f.clock.advance(TimeDelta::seconds(30));
        f.player.media_play().await.unwrap();

        assert_eq!(f.player.last_action_at(), f.clock.now());
    }

    #[tokio::test]
    async fn commands_carry_their_payload() {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Playing, Map::new());
        f.player.update();

        f.player.set_volume_level(0.3).await.unwrap();
        f.player.mute_volume(true).await.unwrap();
        f.player.media_seek(42.0).await.unwrap();
        f.player.select_source("HDMI 2").await.unwrap();

        let calls = f.host.service_calls();
        assert_eq!(calls[0].service, Service::VolumeSet);
        assert_eq!(calls[0].data["volume_level"], json!(0.3));
        assert_eq!(calls[0].data["entity_id"], json!("media_player.tv1"));
        assert_eq!(calls[1].data["is_volume_muted"], json!(true));
        assert_eq!(calls[2].data["seek_position"], json!(42.0));
        assert_eq!(calls[3].data["source"], json!("HDMI 2"));
    }

    #[tokio::test]
    async fn commands_without_snapshot_are_dropped() {
        let f = fixture();

        f.player.media_play().await.unwrap();
        f.player.set_volume_level(0.5).await.unwrap();
        f.player.turn_on().await.unwrap();

        assert!(f.host.service_calls().is_empty());
        assert!(f.player.is_playing());
    }

    #[tokio::test]
    async fn host_failures_are_returned() {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Playing, Map::new());
        f.player.update();
        f.host.fail_service(Service::MediaPause, "device offline");

        let err = f.player.media_pause().await.unwrap_err();

        match err {
            MediaError::Host(HostError::ServiceFailed { service, reason, .. }) => {
                assert_eq!(service, Service::MediaPause);
                assert_eq!(reason, "device offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!f.player.is_playing());
    }

    #[tokio::test]
    async fn shuffle_and_repeat_stay_local() {
        let mut f = fixture();
        f.host.set_state(&tv1(), PlayerState::Playing, Map::new());
        f.player.update();

        f.player.set_shuffle(true);
        f.player.set_repeat(RepeatMode::Off);
        f.player.media_next_track().await.unwrap();
        f.player.media_previous_track().await.unwrap();

        assert!(f.host.service_calls().is_empty());
        assert_eq!(f.calls.recv().await, Some(ProviderCall::Next { shuffle: true }));
        assert_eq!(
            f.calls.recv().await,
            Some(ProviderCall::Previous { shuffle: true })
        );
        assert_eq!(f.player.repeat(), RepeatMode::Off);
    }
}

mod play_media {
    use super::*;

    fn play_media_call(host: &InMemoryHost) -> Map<String, Value> {
        host.service_calls()
            .into_iter()
            .find(|call| call.service == Service::PlayMedia)
            .map(|call| call.data)
            .unwrap()
    }

    #[tokio::test]
    async fn unhandled_id_is_sent_unchanged() {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Idle, Map::new());
        f.player.update();
        f.provider.answer(None);

        f.player
            .play_media(MediaType::Playlist, "spotify:playlist:1")
            .await
            .unwrap();

        let data = play_media_call(&f.host);
        assert_eq!(data["media_content_id"], json!("spotify:playlist:1"));
        assert_eq!(data["media_content_type"], json!("music"));
        assert_eq!(
            f.player.media_content_id().as_deref(),
            Some("spotify:playlist:1")
        );
    }

    #[tokio::test]
    async fn url_directive_is_played() {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Idle, Map::new());
        f.player.update();
        f.provider
            .answer(Some(PlayDirective::Url("https://cdn.example/x.mp3".to_string())));

        f.player.play_media(MediaType::Music, "x").await.unwrap();

        let data = play_media_call(&f.host);
        assert_eq!(data["media_content_id"], json!("https://cdn.example/x.mp3"));
    }

    #[tokio::test]
    async fn index_directive_plays_current_track() {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Idle, Map::new());
        f.player.update();
        f.provider.set_queue(Some(PlayQueue::new(vec![track("a"), track("b")], 1)));
        f.provider.answer(Some(PlayDirective::CurrentIndex));

        f.player.play_media(MediaType::Music, "1").await.unwrap();

        let data = play_media_call(&f.host);
        assert_eq!(data["media_content_id"], json!("https://cdn.example/b.mp3"));
        assert_eq!(f.player.media_title().as_deref(), Some("Song b"));
    }

    #[tokio::test]
    async fn appended_queue_plays_current_track() {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Idle, Map::new());
        f.player.update();
        f.provider.set_queue(Some(PlayQueue::new(vec![track("c")], 0)));
        f.provider.answer(Some(PlayDirective::QueueAppended));

        f.player.play_media(MediaType::Playlist, "album:9").await.unwrap();

        let data = play_media_call(&f.host);
        assert_eq!(data["media_content_id"], json!("https://cdn.example/c.mp3"));
    }

    #[tokio::test]
    async fn index_directive_without_track_fails() {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Idle, Map::new());
        f.player.update();
        f.provider.answer(Some(PlayDirective::CurrentIndex));

        let err = f.player.play_media(MediaType::Music, "0").await.unwrap_err();

        assert!(matches!(err, MediaError::NoCurrentTrack(_)));
        assert!(f.host.service_calls().is_empty());
    }
}

mod auto_advance {
    use super::*;

    async fn playing_fixture() -> Fixture {
        let f = fixture();
        f.host.set_state(&tv1(), PlayerState::Playing, Map::new());
        f.player.update();
        f.player.start_monitoring();
        f
    }

    async fn go_idle(f: &Fixture) {
        f.host.set_state(&tv1(), PlayerState::Idle, Map::new());
        eventually(|| f.player.state() == PlayerState::Idle).await;
        sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn advances_once_after_debounce() {
        let mut f = playing_fixture().await;
        f.player.media_play().await.unwrap();

        f.clock.advance(TimeDelta::seconds(5));
        go_idle(&f).await;

        let call = timeout(Duration::from_secs(2), f.calls.recv()).await.unwrap();
        assert_eq!(call, Some(ProviderCall::Next { shuffle: false }));
        assert!(f.calls.try_recv().is_err());
    }

    #[tokio::test]
    async fn ignores_idle_inside_debounce_window() {
        let mut f = playing_fixture().await;
        f.player.media_play().await.unwrap();

        f.clock.advance(TimeDelta::seconds(4));
        go_idle(&f).await;

        assert!(f.calls.try_recv().is_err());
    }

    #[tokio::test]
    async fn ignores_idle_when_not_playing() {
        let mut f = playing_fixture().await;

        f.clock.advance(TimeDelta::seconds(60));
        go_idle(&f).await;

        assert!(f.calls.try_recv().is_err());
    }

    #[tokio::test]
    async fn ignores_idle_with_repeat_off() {
        let mut f = playing_fixture().await;
        f.player.media_play().await.unwrap();
        f.player.set_repeat(RepeatMode::Off);

        f.clock.advance(TimeDelta::seconds(60));
        go_idle(&f).await;

        assert!(f.calls.try_recv().is_err());
    }

    #[tokio::test]
    async fn stop_monitoring_releases_subscription() {
        let mut f = playing_fixture().await;
        f.player.media_play().await.unwrap();
        assert!(f.player.is_monitoring());

        f.player.stop_monitoring();
        assert!(!f.player.is_monitoring());

        f.clock.advance(TimeDelta::seconds(60));
        f.host.set_state(&tv1(), PlayerState::Idle, Map::new());
        sleep(Duration::from_millis(50)).await;

        assert_eq!(f.player.state(), PlayerState::Playing);
        assert!(f.calls.try_recv().is_err());
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn setup_mirrors_and_advances_target() {
        let host = Arc::new(InMemoryHost::new());
        host.set_state(
            &tv1(),
            PlayerState::Playing,
            attrs(json!({ "volume_level": "0.5" })),
        );

        let music = Arc::new(LocalQueue::new());
        let config = CloudMusicConfig {
            media_players: vec!["media_player.tv1".to_string()],
            auto_advance: cloud_music_proxy::config::AutoAdvanceConfig {
                debounce_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        let players = setup_players(host.clone(), music.clone(), &config).unwrap();
        let player = &players[0];

        assert_eq!(player.id().as_str(), "cloud_musicmedia_player.tv1");
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.volume_level(), Some(0.5));
        assert!(player.is_monitoring());

        music.load(player.id(), vec![track("a"), track("b")], 0);
        player.play_media(MediaType::Music, "0").await.unwrap();
        player.media_play().await.unwrap();
        host.clear_service_calls();

        host.set_state(&tv1(), PlayerState::Idle, Map::new());

        eventually(|| player.media_title().as_deref() == Some("Song b")).await;
        let calls = host.service_calls();
        assert_eq!(calls[0].service, Service::PlayMedia);
        assert_eq!(calls[0].data["media_content_id"], json!("https://cdn.example/b.mp3"));
    }

    #[tokio::test]
    async fn setup_rejects_malformed_target() {
        let host = Arc::new(InMemoryHost::new());
        let config = CloudMusicConfig {
            media_players: vec!["not an entity".to_string()],
            ..Default::default()
        };

        let err = setup_players(host, Arc::new(LocalQueue::new()), &config).unwrap_err();

        assert!(matches!(err, MediaError::Host(HostError::InvalidEntityId(_))));
    }
}
