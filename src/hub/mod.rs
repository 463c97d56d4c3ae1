//! Utility hub: module discovery, parameter forms and background execution

pub mod builtin;
pub mod console;
pub mod form;
pub mod function;
pub mod manifest;
pub mod registry;
pub mod runner;
pub mod selection;

pub use console::{Console, ConsoleEvent};
pub use form::{Field, FieldInput, ParamForm, Widget};
pub use registry::Registry;
pub use runner::Runner;
pub use selection::Selection;
