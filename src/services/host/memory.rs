use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use async_stream::stream;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use super::{
    EntityId, HomeHost, HostError, PlayerState, Service, ServiceCall, StateChangeStream,
    StateChangedEvent, TargetState,
};

const EVENT_CAPACITY: usize = 256;

/// Host runtime living entirely in process memory.
///
/// Keeps a state store, broadcasts a [`StateChangedEvent`] for every write
/// and records each service call it receives. Calls to a service can be
/// made to fail with [`InMemoryHost::fail_service`].
pub struct InMemoryHost {
    states: RwLock<HashMap<EntityId, TargetState>>,
    events_tx: broadcast::Sender<StateChangedEvent>,
    calls: Mutex<Vec<ServiceCall>>,
    failures: Mutex<HashMap<Service, String>>,
}

impl InMemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            states: RwLock::new(HashMap::new()),
            events_tx,
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Write an entity's state and notify subscribers.
    ///
    /// Returns the stored snapshot.
    pub fn set_state(
        &self,
        entity_id: &EntityId,
        state: PlayerState,
        attributes: Map<String, Value>,
    ) -> TargetState {
        let new_state =
            TargetState::from_raw(entity_id.clone(), state.as_str(), attributes, Utc::now());

        let old_state = self
            .states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entity_id.clone(), new_state.clone());

        debug!(entity = %entity_id, state = %state, "State written");

        let _ = self.events_tx.send(StateChangedEvent {
            entity_id: entity_id.clone(),
            old_state,
            new_state: Some(new_state.clone()),
        });

        new_state
    }

    /// Remove an entity and notify subscribers.
    pub fn remove_state(&self, entity_id: &EntityId) {
        let old_state = self
            .states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(entity_id);

        if old_state.is_some() {
            let _ = self.events_tx.send(StateChangedEvent {
                entity_id: entity_id.clone(),
                old_state,
                new_state: None,
            });
        }
    }

    /// Make every following call to `service` fail with `reason`.
    pub fn fail_service(&self, service: Service, reason: impl Into<String>) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(service, reason.into());
    }

    /// Let `service` succeed again.
    pub fn restore_service(&self, service: Service) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&service);
    }

    /// Every service call received so far, oldest first.
    pub fn service_calls(&self) -> Vec<ServiceCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget recorded service calls.
    pub fn clear_service_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HomeHost for InMemoryHost {
    fn state(&self, entity_id: &EntityId) -> Option<TargetState> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(entity_id)
            .cloned()
    }

    async fn call_service(&self, call: ServiceCall) -> Result<(), HostError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.clone());

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&call.service)
            .cloned();

        if let Some(reason) = failure {
            return Err(HostError::ServiceFailed {
                service: call.service,
                target: call.target,
                reason,
            });
        }

        if self.state(&call.target).is_none() {
            return Err(HostError::EntityNotFound(call.target));
        }

        Ok(())
    }

    fn subscribe_state_changes(&self, entity_id: &EntityId) -> StateChangeStream {
        let mut rx = self.events_tx.subscribe();
        let entity_id = entity_id.clone();

        Box::pin(stream! {
            loop {
                match rx.recv().await {
                    Ok(event) if event.entity_id == entity_id => yield event,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(entity = %entity_id, skipped, "State change subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
