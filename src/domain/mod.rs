mod location;
mod new_subscription;
mod subscriber_email;
mod subscription_method;
mod subscription_record;
mod weather;

pub use location::{Address, Coordinates, Place};
pub use new_subscription::{NewSubscription, SubscriptionRequest};
pub use subscriber_email::SubscriberEmail;
pub use subscription_method::SubscriptionMethod;
pub use subscription_record::SubscriptionRecord;
pub use weather::WeatherSnapshot;
