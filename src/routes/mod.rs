mod geocode;
mod health_check;
mod helpers;
mod home;
mod subscriptions;
mod types;
mod weather;

pub use geocode::*;
pub use health_check::*;
pub use helpers::*;
pub use home::*;
pub use subscriptions::*;
pub use types::*;
pub use weather::*;
