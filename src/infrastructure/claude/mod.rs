pub mod client;
pub mod errors;
pub mod rate_limiter;
pub mod retry;
pub mod types;

pub use client::{redact_api_key, ClaudeClient, ClaudeClientConfig};
pub use errors::ClaudeApiError;
pub use rate_limiter::TokenBucketRateLimiter;
pub use retry::RetryPolicy;
pub use types::{ContentBlock, Message, MessageRequest, MessageResponse, Usage};
