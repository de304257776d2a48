//! CLI library components for Codepad.

pub mod logging;
pub mod shell;
