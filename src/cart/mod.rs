pub mod handlers;
pub mod model;
pub mod service;

pub use handlers::*;
pub use model::*;
pub use service::*;
