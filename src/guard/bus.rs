//! Publish/subscribe delivery of authorization models.
//!
//! Listeners are held weakly so that a detached index does not keep its guard alive.
//! Delivery happens on the publisher's thread while the bus is locked, which keeps
//! every listener's sequence of models in publish order. Listeners must not call back
//! into the bus from `on_config_model_changed`.

use std::sync::{Arc, RwLock, Weak};

use log::{debug, info};

use crate::error::{GuardError, Result};
use crate::guard::roles::AuthorizationModel;

/// Receives every authorization model published after (and the latest one before)
/// subscription.
pub trait ConfigModelListener: Send + Sync {
    fn on_config_model_changed(&self, model: Arc<AuthorizationModel>);
}

#[derive(Default)]
struct BusState {
    latest: Option<Arc<AuthorizationModel>>,
    listeners: Vec<Weak<dyn ConfigModelListener>>,
}

/// Fan-out point between the configuration owner and attached guards.
#[derive(Default)]
pub struct ConfigModelBus {
    state: RwLock<BusState>,
}

impl ConfigModelBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. If a model was already published it is delivered immediately.
    pub fn subscribe<L>(&self, listener: &Arc<L>) -> Result<()>
    where
        L: ConfigModelListener + 'static,
    {
        let mut state = self
            .state
            .write()
            .map_err(|_| GuardError::Lock("config model bus poisoned".to_string()))?;
        state.listeners.retain(|listener| listener.strong_count() > 0);
        let weak = Arc::downgrade(listener);
        let weak: Weak<dyn ConfigModelListener> = weak;
        state.listeners.push(weak);
        if let Some(latest) = state.latest.clone() {
            listener.on_config_model_changed(latest);
        }
        debug!("config model listener registered ({} total)", state.listeners.len());
        Ok(())
    }

    /// Publish a new model to every live listener; returns how many were notified.
    pub fn publish(&self, model: AuthorizationModel) -> Result<usize> {
        let model = Arc::new(model);
        let mut state = self
            .state
            .write()
            .map_err(|_| GuardError::Lock("config model bus poisoned".to_string()))?;
        state.latest = Some(Arc::clone(&model));

        let live: Vec<Arc<dyn ConfigModelListener>> =
            state.listeners.iter().filter_map(Weak::upgrade).collect();
        state.listeners.retain(|listener| listener.strong_count() > 0);

        for listener in &live {
            listener.on_config_model_changed(Arc::clone(&model));
        }
        info!(
            "published authorization model version {} to {} listener(s)",
            model.version(),
            live.len()
        );
        Ok(live.len())
    }

    /// Most recently published model, if any.
    pub fn latest(&self) -> Result<Option<Arc<AuthorizationModel>>> {
        let state = self
            .state
            .read()
            .map_err(|_| GuardError::Lock("config model bus poisoned".to_string()))?;
        Ok(state.latest.clone())
    }

    /// Number of listeners that are still alive.
    pub fn listener_count(&self) -> Result<usize> {
        let state = self
            .state
            .read()
            .map_err(|_| GuardError::Lock("config model bus poisoned".to_string()))?;
        Ok(state
            .listeners
            .iter()
            .filter(|listener| listener.strong_count() > 0)
            .count())
    }
}
