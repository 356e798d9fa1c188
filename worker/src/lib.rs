pub mod config;
pub mod connection;
pub mod error;
pub mod metrics;
pub mod service;

pub use config::WorkerConfig;
pub use connection::{ConnState, serve_connection};
pub use error::{Result, WorkerErr};
pub use service::WorkerService;
