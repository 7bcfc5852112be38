//! Stylesheets as bundler modules.
//!
//! [`SassModulesPlugin`] compiles SCSS/SASS modules for a bundle host,
//! re-emitting each `@import` as a JS-level import so the host's graph
//! mirrors the stylesheet graph, and either exports, injects or aggregates
//! the compiled CSS.

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod utils;

pub use crate::core::{SassModulesOptions, SassModulesPlugin};
