// Core domain layer
pub mod codegen;
pub mod context;
pub mod filter;
pub mod imports;
pub mod interfaces;
pub mod models;
pub mod plugin;
pub mod sass_modules;

pub use context::*;
pub use filter::*;
pub use interfaces::*;
pub use models::*;
pub use plugin::*;
pub use sass_modules::*;
