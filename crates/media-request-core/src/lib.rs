pub mod actions;
pub mod dispatch;
pub mod search;
pub mod sensors;
pub mod webhook;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{ActionError, ActionName, ActionRegistry};
pub use dispatch::{DispatchOutcome, RequestDispatcher, SkipReason};
pub use search::{merge_by_popularity, SearchAggregator};
pub use sensors::{EntityUpdater, RefreshReport, RequestSensors, SensorRefreshTrigger, REFRESHED_SENSORS};
pub use webhook::{WebhookHandler, WebhookOutcome};
