//! Value types shared by every Codepad crate.
//!
//! - [`Language`] - the closed set of editor languages and their templates
//! - [`Theme`] - the global colour preference
//! - [`Document`] - the text buffer for one language
//! - [`ExecutionResult`] / [`RunState`] - run lifecycle values

pub mod document;
pub mod error;
pub mod language;
pub mod run;
pub mod theme;

pub use document::{Document, is_blank};
pub use error::{ModelError, Result};
pub use language::{Language, template_for_tag};
pub use run::{ExecutionResult, RunState};
pub use theme::Theme;
