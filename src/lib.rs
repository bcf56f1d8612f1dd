pub mod checksum;
pub mod client;
pub mod database;
pub mod pagination;
pub mod server;
pub mod services;
pub mod storage;
pub mod summary;
pub mod tabular;
