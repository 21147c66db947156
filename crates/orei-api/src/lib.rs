// orei-api: Async Rust client for the OREI HDMI matrix control endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{API_PATH, DEFAULT_PORT, MatrixClient};
pub use error::Error;
pub use models::{CommandReply, DeviceStatus, InputStatus, OutputStatus, VideoStatus};
pub use transport::TransportConfig;
