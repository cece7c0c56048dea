//! Seam between the proxy and the home automation host.
//!
//! The host owns the state store, the service-call dispatcher and the
//! state-change event bus. The proxy only ever talks to it through
//! [`HomeHost`].

/// Typed target state snapshots and attribute keys
pub mod attributes;
/// Host error types
pub mod error;
/// In-process host implementation
pub mod memory;
/// Host trait, service calls and state events
pub mod service;
/// Entity identifiers and media player states
pub mod types;

pub use attributes::{TargetAttributes, TargetState};
pub use error::HostError;
pub use memory::InMemoryHost;
pub use service::{HomeHost, Service, ServiceCall, StateChangeStream, StateChangedEvent};
pub use types::{EntityId, MEDIA_PLAYER_DOMAIN, PlayerState};
