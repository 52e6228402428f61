use std::sync::Arc;

use db::DBProvider;
use executors::orchestrator::ItemLauncher;

use crate::events::EventBus;

pub mod error;
pub mod events;
pub mod notifications;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    db: DBProvider,
    events: EventBus,
    launcher: Arc<ItemLauncher>,
}

impl AppState {
    pub fn new(db: DBProvider, events: EventBus, launcher: Arc<ItemLauncher>) -> Self {
        Self {
            db,
            events,
            launcher,
        }
    }

    pub fn db(&self) -> &DBProvider {
        &self.db
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn launcher(&self) -> &ItemLauncher {
        &self.launcher
    }
}
