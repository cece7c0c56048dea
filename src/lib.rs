//! Cloud music proxy - a media player entity layered over a host-managed player.
//!
//! The proxy mirrors the state of a target media player owned by a home
//! automation host, forwards every control command to it, and overlays
//! track metadata and auto-advance behavior supplied by a cloud music
//! provider. The main pieces are:
//!
//! - [`services::host`]: the host seam (state store, service calls, state events)
//! - [`services::cloud_music`]: the music provider seam and a local play queue
//! - [`services::media_player`]: the proxy entity itself and its setup
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cloud_music_proxy::config::{Config, ConfigPaths};
//! use cloud_music_proxy::services::cloud_music::LocalQueue;
//! use cloud_music_proxy::services::host::InMemoryHost;
//! use cloud_music_proxy::services::media_player::setup_players;
//! use cloud_music_proxy::tracing_config;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_default()?;
//! let _guard = tracing_config::init_with_file(&config.general.log_level, &ConfigPaths::log_dir()?)?;
//!
//! let host = Arc::new(InMemoryHost::new());
//! let music = Arc::new(LocalQueue::new());
//! let players = setup_players(host, music, &config.cloud_music)?;
//! println!("{}: {}", players[0].name(), players[0].state());
//! # Ok(())
//! # }
//! ```

/// Configuration schema definitions and loading.
pub mod config;

/// Host, music provider and media player services.
pub mod services;

/// Structured logging setup.
pub mod tracing_config;

pub use config::{ConfigError, Result};
