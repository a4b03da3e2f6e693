pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{connect, health_check, migrate, DatabaseError};
pub use models::CensusTract;
pub use repository::TractRepository;
