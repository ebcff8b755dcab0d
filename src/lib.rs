pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod provider;
pub mod routes;
pub mod sms_client;
pub mod startup;
pub mod subscriber_store;
pub mod telemetry;
pub mod weather_client;
