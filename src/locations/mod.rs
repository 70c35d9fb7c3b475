pub mod error;
pub mod handlers;
pub mod models;

pub use error::*;
pub use handlers::*;
pub use models::*;
