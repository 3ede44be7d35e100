//! polydraw core - polygon drawing widget, map models, ports, and configuration
//!
//! This crate contains the headless widget state machine and the port
//! definitions that browser bindings, the CLI, and tests plug adapters into.

pub mod config;
pub mod error;
pub mod layer;
pub mod memory;
pub mod models;
pub mod ports;
pub mod toolbar;
pub mod validation;
pub mod widget;

pub use error::{PolydrawError, Result, SubmitError};
pub use widget::{ConfirmOutcome, PolygonWidget, WidgetConfig, WidgetState, NO_POLYGON_ALERT};
