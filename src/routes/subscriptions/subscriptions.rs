use actix_web::{HttpResponse, web};
use tera::Tera;

use crate::{
    domain::{NewSubscription, SubscriptionRecord, SubscriptionRequest},
    email_client::EmailClient,
    provider::Provider,
    sms_client::SmsClient,
    subscriber_store::SubscriberStore,
};

use super::{
    errors::SubscribeError,
    helpers::{
        ALSO_ENABLED_SUBJECT, CONFIRMED_SUBJECT, get_confirmation_html, get_confirmation_text,
    },
    types::{DeliveryReport, NotificationResults, SubscribeResponse},
};

#[tracing::instrument(
    name = "Adding a new subscriber.",
    skip(body, store, templates, email_client, sms_client),
    fields(
        subscriber_email = tracing::field::Empty,
        subscription_method = tracing::field::Empty
    )
)]
pub async fn subscribe(
    body: web::Json<SubscriptionRequest>,
    store: web::Data<SubscriberStore>,
    templates: web::Data<Tera>,
    email_client: web::Data<Provider<EmailClient>>,
    sms_client: web::Data<Provider<SmsClient>>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscription: NewSubscription =
        body.0.try_into().map_err(SubscribeError::ValidationError)?;

    let span = tracing::Span::current();
    span.record(
        "subscriber_email",
        tracing::field::display(new_subscription.email.as_ref()),
    );
    span.record(
        "subscription_method",
        tracing::field::display(new_subscription.method),
    );

    let record = store
        .append(new_subscription)
        .await
        .inspect_err(|e| tracing::error!(error.cause_chain = ?e, "Failed to save subscriber"))?;

    let results = send_confirmations(&record, &templates, &email_client, &sms_client).await;

    Ok(HttpResponse::Ok().json(SubscribeResponse {
        ok: true,
        message: "Subscription successful",
        results,
    }))
}

/// Legs run one after another and never abort each other.
#[tracing::instrument(name = "Sending subscription confirmations", skip_all)]
async fn send_confirmations(
    record: &SubscriptionRecord,
    templates: &Tera,
    email_client: &Provider<EmailClient>,
    sms_client: &Provider<SmsClient>,
) -> NotificationResults {
    let message = get_confirmation_text(record);
    let mut results = NotificationResults::default();

    if let Some(phone) = record.phone.as_deref().filter(|_| record.method.includes_sms()) {
        results.sms = Some(send_sms(sms_client, phone, &message).await.into());
    }

    // `also_email` alone triggers the primary email too, even for SMS-only subscribers.
    if record.method.includes_email() || record.also_email {
        let outcome = send_email(
            email_client,
            templates,
            record.email.as_ref(),
            CONFIRMED_SUBJECT,
            &message,
        )
        .await;
        results.email = Some(outcome.into());
    }

    if let Some(alt_email) = record.alt_email.as_deref().filter(|_| record.also_email) {
        let outcome = send_email(
            email_client,
            templates,
            alt_email,
            ALSO_ENABLED_SUBJECT,
            &message,
        )
        .await;
        results.also_email = Some(outcome.into());
    }

    log_failures(&results);
    results
}

#[tracing::instrument(name = "Sending a confirmation SMS", skip(sms_client, message))]
async fn send_sms(
    sms_client: &Provider<SmsClient>,
    phone: &str,
    message: &str,
) -> Result<(), anyhow::Error> {
    sms_client.client()?.send_sms(phone, message).await?;
    Ok(())
}

#[tracing::instrument(
    name = "Sending a confirmation email",
    skip(email_client, templates, message)
)]
async fn send_email(
    email_client: &Provider<EmailClient>,
    templates: &Tera,
    recipient: &str,
    subject: &str,
    message: &str,
) -> Result<(), anyhow::Error> {
    let client = email_client.client()?;
    let html = get_confirmation_html(templates, message)?;
    client.send_email(recipient, subject, &html).await?;
    Ok(())
}

fn log_failures(results: &NotificationResults) {
    let legs = [
        ("sms", &results.sms),
        ("email", &results.email),
        ("also_email", &results.also_email),
    ];

    for (leg, report) in legs {
        if let Some(DeliveryReport {
            ok: false,
            error: Some(error),
        }) = report
        {
            tracing::error!(leg, error = %error, "Confirmation leg failed");
        }
    }
}
