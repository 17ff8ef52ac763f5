mod error;
pub mod subscriptions;

pub use error::{invalid_body, invalid_id, invalid_query, RestError, RestResult};
