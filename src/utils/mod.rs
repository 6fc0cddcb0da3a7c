//! Shared helpers.

pub mod logging;
pub mod validation;
