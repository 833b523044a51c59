//! Application layer: port traits, activation state, events, and the
//! orchestrating [`service::AppService`].

pub mod activation;
pub mod events;
pub mod ports;
pub mod service;

pub use activation::ActivationState;
pub use events::{AppEvent, TelemetryData};
pub use service::{AppService, StartupDecision};
