//! The `utils` module provides shared definitions used across the `dexroom`
//! server: the error taxonomy and tracing setup.

pub mod error;
pub mod logging;
