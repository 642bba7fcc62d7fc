pub mod health;
pub mod server;

pub use health::{HealthSnapshot, HealthState};
pub use server::ApiServer;
