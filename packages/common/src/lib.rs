//! Common infrastructure shared by the keysmith crates
//!
//! Currently this is the logging bootstrap and the helpers used to record
//! security-relevant key events without leaking secret identifiers.

pub mod logging;

pub use logging::{LoggingTransformer, log_security_event};
