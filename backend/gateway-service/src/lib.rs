pub mod client;
pub mod configs;
pub mod error;
pub mod logger;

pub use client::GatewayClient;
pub use configs::{Config, GatewayConfig};
