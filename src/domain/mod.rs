// Domain module: business logic and models

pub mod models;
pub mod progress;
pub mod solver_service;
pub mod value_objects;

pub use models::*;
pub use progress::*;
pub use solver_service::*;
pub use value_objects::*;
