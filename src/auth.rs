//! Bearer token model and the single-flight token manager that gates every API call.

pub mod manager;
pub mod metrics;
pub mod secret;
pub mod token;

pub use manager::TokenManager;
pub use metrics::TokenMetrics;
pub use secret::TokenSecret;
pub use token::{BearerToken, TokenStatus};
