mod errors;
mod helpers;
mod subscriptions;
mod types;

pub use errors::{SubscribeError, subscribe_json_error_handler};
pub use subscriptions::subscribe;
pub use types::{DeliveryReport, NotificationResults, SubscribeResponse};
