mod month;
mod user_id;
pub mod validation;

pub use month::Month;
pub use user_id::UserId;
pub use validation::{validate_date, validate_uuid, ValidationError};
