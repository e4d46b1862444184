//! subcal-domain
//!
//! Pure domain models for the subscription calendar (Money, RecurrenceRule,
//! SubscriptionRecord, DateRange). No I/O, no storage. Only data types and
//! the date arithmetic they carry.

pub mod currency;
pub mod error;
pub mod money;
pub mod range;
pub mod recurrence;
pub mod subscription;

pub use currency::*;
pub use error::DomainError;
pub use money::Money;
pub use range::DateRange;
pub use recurrence::*;
pub use subscription::*;
