mod requests;

pub use requests::{HealthResponse, TokenExchangeRequest};
