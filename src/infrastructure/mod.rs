// Infrastructure layer
pub mod file_system;
pub mod grass_compiler;
pub mod host;
pub mod importer;
pub mod lightning;
pub mod node_resolver;

pub use file_system::*;
pub use grass_compiler::*;
pub use host::*;
pub use importer::*;
pub use lightning::*;
pub use node_resolver::*;
