//! Core types and service wiring for the Ecoleta collection point registration client.

/// Bundle of backend ports used by the service.
pub mod backends;
/// Background driver running loader requests on the tokio runtime.
pub mod driver;
/// Registration form state and validation.
pub mod form;
/// Dependent-selection state machine for items, provinces, and cities.
pub mod loader;
/// Domain models and identifiers shared by all providers.
pub mod model;
/// Traits describing the backend interfaces.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use backends::*;
pub use driver::*;
pub use form::*;
pub use loader::*;
pub use model::*;
pub use ports::*;
pub use service::*;
