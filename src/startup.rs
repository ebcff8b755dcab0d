use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tera::Tera;
use tracing_actix_web::TracingLogger;

use crate::configuration::{Environment, Settings, current_environment};
use crate::email_client::EmailClient;
use crate::provider::Provider;
use crate::routes::{
    geocode, health_check, home, json_error_handler, reverse_geocode, subscribe,
    subscribe_json_error_handler, weather_by_coords,
};
use crate::sms_client::SmsClient;
use crate::subscriber_store::SubscriberStore;
use crate::weather_client::WeatherClient;

pub struct Application {
    port: u16,
    server: Server,
}

/// Address shown on the landing page.
pub struct ContactEmail(pub String);

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        if config.application.uses_placeholder_secret()
            && matches!(current_environment()?, Environment::Production)
        {
            tracing::warn!("SECRET_KEY is still the development placeholder.");
        }

        let weather_client = config.weather.client()?;
        let email_client = config.email_client.client()?;
        let sms_client = config.sms_client.client()?;
        let store = SubscriberStore::new(config.subscribers.path);
        let templates =
            Tera::new("templates/**/*").context("Failed to load the page templates.")?;

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {address}."))?;
        let port = listener.local_addr()?.port();

        let server = run(
            listener,
            Providers {
                weather: weather_client,
                email: email_client,
                sms: sms_client,
            },
            store,
            templates,
            ContactEmail(config.application.contact_email),
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub struct Providers {
    pub weather: Provider<WeatherClient>,
    pub email: Provider<EmailClient>,
    pub sms: Provider<SmsClient>,
}

pub fn run(
    listener: TcpListener,
    providers: Providers,
    store: SubscriberStore,
    templates: Tera,
    contact_email: ContactEmail,
) -> Result<Server, anyhow::Error> {
    tracing::info!(
        weather = providers.weather.is_configured(),
        email = providers.email.is_configured(),
        sms = providers.sms.is_configured(),
        "Providers resolved"
    );

    let weather_client = web::Data::new(providers.weather);
    let email_client = web::Data::new(providers.email);
    let sms_client = web::Data::new(providers.sms);
    let store = web::Data::new(store);
    let templates = web::Data::new(templates);
    let contact_email = web::Data::new(contact_email);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(
                web::JsonConfig::default()
                    .content_type_required(false)
                    .error_handler(json_error_handler),
            )
            .route("/", web::get().to(home))
            .route("/health", web::get().to(health_check))
            .route("/weather_by_coords", web::post().to(weather_by_coords))
            .route("/geocode", web::post().to(geocode))
            .route("/reverse_geocode", web::post().to(reverse_geocode))
            .service(
                web::resource("/subscribe")
                    .app_data(
                        web::JsonConfig::default()
                            .content_type_required(false)
                            .error_handler(subscribe_json_error_handler),
                    )
                    .route(web::post().to(subscribe)),
            )
            .app_data(weather_client.clone())
            .app_data(email_client.clone())
            .app_data(sms_client.clone())
            .app_data(store.clone())
            .app_data(templates.clone())
            .app_data(contact_email.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
