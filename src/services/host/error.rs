use super::{EntityId, Service};

/// Errors reported by the host runtime
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// No entity with this id is known to the host
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// The text is not a valid `domain.object_id` entity id
    #[error("invalid entity id '{0}'")]
    InvalidEntityId(String),

    /// The host executed the service call and it failed
    #[error("service {service} on {target} failed: {reason}")]
    ServiceFailed {
        /// Service that was called
        service: Service,
        /// Entity the call was addressed to
        target: EntityId,
        /// Failure reported by the host
        reason: String,
    },
}
