use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::{CloudMusicPlayer, MediaError};
use crate::config::CloudMusicConfig;
use crate::services::cloud_music::MusicProvider;
use crate::services::host::{EntityId, HomeHost, MEDIA_PLAYER_DOMAIN};

/// Create one live proxy per configured target.
///
/// Each player reads its initial snapshot and subscribes to its target
/// before it is returned. Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns `MediaError::Host` if a configured target is not a valid entity id
#[instrument(skip_all, fields(targets = config.media_players.len()))]
pub fn setup_players(
    host: Arc<dyn HomeHost>,
    music: Arc<dyn MusicProvider>,
    config: &CloudMusicConfig,
) -> Result<Vec<CloudMusicPlayer>, MediaError> {
    let targets = config
        .media_players
        .iter()
        .map(|raw| EntityId::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let players = targets
        .into_iter()
        .map(|target| {
            if target.domain() != MEDIA_PLAYER_DOMAIN {
                warn!(%target, "Target is not a media player entity");
            }

            let player = CloudMusicPlayer::new(target, host.clone(), music.clone(), config);
            player.update();
            player.start_monitoring();
            player
        })
        .collect::<Vec<_>>();

    info!(count = players.len(), "Cloud music players ready");
    Ok(players)
}
