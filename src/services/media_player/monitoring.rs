use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use super::CloudMusicPlayer;

/// Forwards target state changes to a proxy player.
///
/// Holds only a weak reference to the player, so a dropped player ends
/// the subscription. Dropping the monitor aborts it.
pub(crate) struct TargetMonitor {
    handle: JoinHandle<()>,
}

impl TargetMonitor {
    /// Subscribe to the player's target and start forwarding changes.
    ///
    /// The subscription is taken before this returns, so no change written
    /// after the call is missed.
    #[instrument(skip(player), fields(player = %player.inner.id, target = %player.inner.target))]
    pub(crate) fn start(player: &CloudMusicPlayer) -> Self {
        debug!("Starting target state monitoring");

        let mut changes = player
            .inner
            .host
            .subscribe_state_changes(&player.inner.target);
        let player_ref = Arc::downgrade(&player.inner);
        let target = player.inner.target.clone();

        let handle = tokio::spawn(async move {
            while let Some(event) = changes.next().await {
                let Some(inner) = player_ref.upgrade() else {
                    break;
                };
                CloudMusicPlayer { inner }.on_target_changed(&event);
            }

            debug!("Target state monitoring ended for {}", target);
        });

        Self { handle }
    }
}

impl Drop for TargetMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
