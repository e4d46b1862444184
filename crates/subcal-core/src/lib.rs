//! subcal-core
//!
//! Recurrence projection and cost aggregation for subscriptions.
//! Depends on subcal-domain. Every service here is a pure function of its
//! inputs; the store traits describe the collaborators a session wires in.

pub mod error;
pub mod memory;
pub mod projection_service;
pub mod rates;
pub mod store;
pub mod totals_service;

pub use error::CoreError;
pub use memory::*;
pub use projection_service::*;
pub use rates::*;
pub use store::*;
pub use totals_service::*;
