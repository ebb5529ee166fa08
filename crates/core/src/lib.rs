#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Rooftop rainwater-harvesting feasibility engine and the request/response
//! shapes shared by the Varun daemon and CLI.

pub mod api;
pub mod feasibility;
pub mod model;
pub mod recommend;
pub mod validation;

mod util;

pub use feasibility::calculate_feasibility;
pub use model::*;
pub use util::{new_ulid, now_ms};
