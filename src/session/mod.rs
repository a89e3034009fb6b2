pub mod memory;
pub mod model;
pub mod repo;

pub use memory::MemorySessionStore;
pub use model::*;
pub use repo::*;
