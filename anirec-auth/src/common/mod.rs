mod models;

pub use models::{StoredToken, TokenPair};
