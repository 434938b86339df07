//! Repository layer — entity-scoped database operations.
//!
//! All public functions are re-exported here; screen-level modules call
//! these with a `&Connection` and never build SQL themselves.

mod account;
mod medication;
mod notification;

pub use account::*;
pub use medication::*;
pub use notification::*;
