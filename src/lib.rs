//! INFINITREE firmware — animated LED ornament.
//!
//! Hexagonal architecture: a pure domain core (animations, scenes,
//! scheduler, activation state machine) behind port traits, with thin
//! adapters for the LEDC PWM bank, battery ADC, VBUS sense, NVS token
//! storage, and the serial log.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LogEventSink   StateStoreAdapter           │
//! │  (Led+Telemetry)    (EventSink)    (StatePort / NVS)           │
//! │  VbusPowerSense     MonotonicClock                             │
//! │  (PowerSensePort)   (ClockPort)                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Scenes · Scheduler · Activation                       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything above the adapter ring builds and tests on the host; the
//! `espidf` feature pulls in the ESP-IDF bindings for device builds.
#![deny(unused_must_use)]

pub mod animation;
pub mod config;
pub mod error;
pub mod pins;
pub mod rng;
pub mod scene;
pub mod scheduler;

pub mod adapters;
pub mod app;
pub mod drivers;
