// Service exports
pub mod gateway;
pub mod http;

pub use gateway::{GatewayError, MatchGateway};
pub use http::HttpGateway;
