//! API client with retry logic and error normalization.

mod client;
mod error;
mod request;
mod retry;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult, GENERIC_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE};
pub use request::{ApiRequest, QueryParams, encode_path_segment};
pub use retry::{
    MAX_RETRIES, RETRY_DELAY_MS, RetryDecision, RetryPolicy, Sleeper, TokioSleeper,
    classify_status,
};
