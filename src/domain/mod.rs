// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the configuration tree (`Value`, `Mapping`), the dot-notation
//! accessor over it (`arr`), the `Config` wrapper, declarations, and the crate's
//! error type. It is independent of any host concerns.

pub mod arr;
pub mod config;
pub mod declaration;
pub mod errors;
pub mod value;

// Re-export commonly used types
pub use config::Config;
pub use declaration::Declaration;
pub use errors::{FulcrumError, Result};
pub use value::{Mapping, Value};
