//! Task state and its derived views.
//!
//! [`TaskStore`] owns the collection; [`validate`] decides what may enter
//! it; [`view`] and [`stats`] derive read-only projections on every read.

pub mod stats;
pub mod store;
pub mod validate;
pub mod view;

pub use stats::{TaskStats, compute_stats};
pub use store::{TaskStore, TaskStoreHandle};
pub use validate::{
    ValidationLimits, parse_create, parse_update, validate_for_create, validate_for_update,
};
pub use view::{filter_tasks, sort_tasks, visible_tasks};
