//! Status model: site records, timeline classification and aggregation.
//!
//! Everything here is pure; the store calls into it on each dataset update.

mod classify;
mod format;
mod models;
mod overview;
mod summary;

pub use classify::*;
pub use models::*;
pub use overview::*;
pub use summary::*;

#[cfg(test)]
pub(crate) use models::fixtures;
