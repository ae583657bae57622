pub mod models;
pub mod pii;

pub use models::events::RailwayEvent;
pub use pii::Masked;
