mod subscriptions;

pub use subscriptions::{CostFilter, ListFilter, NewSubscription, Subscription};
