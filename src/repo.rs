mod memory;
mod subscriptions;

pub use memory::InMemorySubscriptionStore;
pub use subscriptions::{PgSubscriptionStore, SubscriptionStore};
