pub mod datasets;
pub mod health;
pub mod upload;
