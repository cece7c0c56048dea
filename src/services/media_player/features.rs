//! Media player feature flags.

use bitflags::bitflags;

bitflags! {
    /// Features a media player entity supports, using the host's bit values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SupportedFeatures: u32 {
        /// Pause playback.
        const PAUSE = 1;
        /// Seek within the current media.
        const SEEK = 2;
        /// Set an absolute volume.
        const VOLUME_SET = 4;
        /// Mute the volume.
        const VOLUME_MUTE = 8;
        /// Go to the previous track.
        const PREVIOUS_TRACK = 16;
        /// Go to the next track.
        const NEXT_TRACK = 32;
        /// Power on.
        const TURN_ON = 128;
        /// Power off.
        const TURN_OFF = 256;
        /// Play a media item by id.
        const PLAY_MEDIA = 512;
        /// Step the volume up or down.
        const VOLUME_STEP = 1024;
        /// Select an input source.
        const SELECT_SOURCE = 2048;
        /// Stop playback.
        const STOP = 4096;
        /// Clear the playlist.
        const CLEAR_PLAYLIST = 8192;
        /// Start playback.
        const PLAY = 16384;
        /// Toggle shuffle.
        const SHUFFLE_SET = 32768;
        /// Select a sound mode.
        const SELECT_SOUND_MODE = 65536;
        /// Browse media.
        const BROWSE_MEDIA = 131_072;
        /// Set the repeat mode.
        const REPEAT_SET = 262_144;
        /// Group with other players.
        const GROUPING = 524_288;
        /// Play announcements.
        const MEDIA_ANNOUNCE = 1_048_576;
        /// Enqueue media.
        const MEDIA_ENQUEUE = 2_097_152;
    }
}

impl SupportedFeatures {
    /// Features the proxy provides itself, whatever its target supports.
    pub const PROXY: Self = Self::BROWSE_MEDIA
        .union(Self::PREVIOUS_TRACK)
        .union(Self::NEXT_TRACK)
        .union(Self::PLAY_MEDIA)
        .union(Self::SHUFFLE_SET)
        .union(Self::REPEAT_SET);

    /// Target features plus the proxy's own.
    ///
    /// Target bits without a named flag are kept, so newer host features
    /// pass through untouched.
    pub fn with_proxy(target_bits: Option<u32>) -> Self {
        Self::from_bits_retain(target_bits.unwrap_or(0)) | Self::PROXY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_features_are_always_present() {
        for target in [None, Some(0), Some(1 | 4 | 8), Some(u32::MAX)] {
            assert!(SupportedFeatures::with_proxy(target).contains(SupportedFeatures::PROXY));
        }
    }

    #[test]
    fn target_features_are_kept() {
        let features = SupportedFeatures::with_proxy(Some(
            (SupportedFeatures::PAUSE | SupportedFeatures::VOLUME_SET).bits(),
        ));

        assert!(features.contains(SupportedFeatures::PAUSE));
        assert!(features.contains(SupportedFeatures::VOLUME_SET));
        assert!(!features.contains(SupportedFeatures::SEEK));
        assert_eq!(
            features.bits(),
            1 | 4 | 16 | 32 | 512 | 32768 | 131_072 | 262_144
        );
    }

    #[test]
    fn unknown_target_bits_are_kept() {
        let search_media = 1 << 22;
        let features = SupportedFeatures::with_proxy(Some(search_media | 1));

        assert_eq!(features.bits(), search_media | 1 | SupportedFeatures::PROXY.bits());
        assert_eq!(features.bits(), 0x46_8231);
    }
}
