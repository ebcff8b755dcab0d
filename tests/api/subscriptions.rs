use weather_notifier::domain::SubscriptionMethod;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{any, body_string_contains, method, path},
};

use crate::helpers::{TestApp, spawn_app, spawn_app_with, spawn_unconfigured_app};

async fn mock_email_delivery(app: &TestApp, times: u64) {
    Mock::given(path("/v3/smtp/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(times)
        .mount(&app.email_server)
        .await;
}

async fn mock_sms_delivery(app: &TestApp, times: u64) {
    Mock::given(path("/2010-04-01/Accounts/ACtest/Messages.json"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(times)
        .mount(&app.sms_server)
        .await;
}

#[tokio::test]
async fn subscribe_returns_200_for_a_valid_email_subscription() {
    let app = spawn_app().await;
    mock_email_delivery(&app, 1).await;

    let body = serde_json::json!({
        "method": "email",
        "email": "a@x.com",
        "city": "Paris",
        "lat": 48.85,
        "lon": 2.35
    });
    let response = app.post_subscription(&body).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "ok": true,
            "message": "Subscription successful",
            "results": {"email": {"ok": true}}
        })
    );
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    let app = spawn_app().await;
    mock_email_delivery(&app, 1).await;

    let body = serde_json::json!({
        "method": "EMAIL",
        "email": "a@x.com",
        "city": "Paris",
        "country": "FR",
        "lat": 48.85,
        "lon": 2.35
    });
    app.post_subscription(&body).await;

    let saved = app.stored_subscribers().await;
    assert_eq!(saved.len(), 1);
    let saved = &saved[0];
    assert_eq!(saved.method, SubscriptionMethod::Email);
    assert_eq!(saved.email.as_ref(), "a@x.com");
    assert_eq!(saved.city.as_deref(), Some("Paris"));
    assert_eq!(saved.country.as_deref(), Some("FR"));
    assert_eq!(saved.lat, Some(48.85));
    assert_eq!(saved.lon, Some(2.35));
    assert!(!saved.also_email);
}

#[tokio::test]
async fn subscribe_appends_without_touching_previous_records() {
    let app = spawn_app().await;
    mock_email_delivery(&app, 4).await;

    for i in 0..3 {
        let body = serde_json::json!({"email": format!("user{i}@x.com")});
        app.post_subscription(&body).await;
    }
    let before = app.stored_subscribers().await;

    app.post_subscription(&serde_json::json!({"email": "user0@x.com"}))
        .await;

    let after = app.stored_subscribers().await;
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after[..before.len()], &before[..]);
    let newest = after.last().unwrap();
    assert!(before.iter().all(|r| r.ts <= newest.ts));
    assert_eq!(newest.email, after[0].email, "duplicates are stored as-is");
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_missing() {
    let app = spawn_app().await;
    mock_email_delivery(&app, 0).await;

    let test_cases = vec![
        (serde_json::json!({"method": "email"}), "missing the email"),
        (serde_json::json!({"method": "sms", "phone": "+33600000000"}), "sms without email"),
        (serde_json::json!({"email": ""}), "empty email"),
        (serde_json::json!({}), "empty body"),
    ];

    for (body, description) in test_cases {
        let response = app.post_subscription(&body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Email is required.");
    }

    assert!(app.stored_subscribers().await.is_empty());
}

#[tokio::test]
async fn subscribe_returns_400_for_sms_without_phone() {
    let app = spawn_app().await;
    mock_sms_delivery(&app, 0).await;

    let test_cases = vec![
        serde_json::json!({"method": "sms", "email": "a@x.com"}),
        serde_json::json!({"method": "sms", "email": "a@x.com", "phone": ""}),
        serde_json::json!({"method": "sms", "email": "a@x.com", "phone": null}),
    ];

    for body in test_cases {
        let response = app.post_subscription(&body).await;

        assert_eq!(400, response.status().as_u16());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            body,
            serde_json::json!({"ok": false, "error": "Phone number required for SMS."})
        );
    }

    assert!(app.stored_subscribers().await.is_empty());
}

#[tokio::test]
async fn both_method_reports_each_leg_independently() {
    let app = spawn_app().await;
    mock_sms_delivery(&app, 1).await;
    Mock::given(path("/v3/smtp/email"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"code": "invalid_parameter", "message": "email is not valid"})),
        )
        .expect(1)
        .mount(&app.email_server)
        .await;

    let body = serde_json::json!({
        "method": "both",
        "email": "a@x.com",
        "phone": "+33600000000"
    });
    let response = app.post_subscription(&body).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["results"]["sms"], serde_json::json!({"ok": true}));
    assert_eq!(
        body["results"]["email"],
        serde_json::json!({"ok": false, "error": "email is not valid"})
    );
}

#[tokio::test]
async fn both_method_without_phone_skips_the_sms_leg() {
    let app = spawn_app().await;
    mock_sms_delivery(&app, 0).await;
    mock_email_delivery(&app, 1).await;

    let body = serde_json::json!({"method": "both", "email": "a@x.com"});
    let response = app.post_subscription(&body).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["results"], serde_json::json!({"email": {"ok": true}}));
}

#[tokio::test]
async fn sms_subscription_sends_the_confirmation_text() {
    let app = spawn_app().await;
    Mock::given(path("/2010-04-01/Accounts/ACtest/Messages.json"))
        .and(body_string_contains("To=%2B33600000000"))
        .and(body_string_contains("via+SMS"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.sms_server)
        .await;
    mock_email_delivery(&app, 0).await;

    let body = serde_json::json!({
        "method": "sms",
        "email": "a@x.com",
        "phone": "+33600000000",
        "city": "Lyon"
    });
    let response = app.post_subscription(&body).await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["results"], serde_json::json!({"sms": {"ok": true}}));
}

#[tokio::test]
async fn also_email_adds_a_primary_and_a_secondary_email_for_sms_subscribers() {
    let app = spawn_app().await;
    mock_sms_delivery(&app, 1).await;
    mock_email_delivery(&app, 2).await;

    let body = serde_json::json!({
        "method": "sms",
        "email": "a@x.com",
        "phone": "+33600000000",
        "also_email": "a@x.com",
        "alt_email": "b@x.com"
    });
    let response = app.post_subscription(&body).await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["results"],
        serde_json::json!({
            "sms": {"ok": true},
            "email": {"ok": true},
            "also_email": {"ok": true}
        })
    );

    let requests = app.email_server.received_requests().await.unwrap();
    let bodies: Vec<serde_json::Value> = requests
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(bodies[0]["to"][0]["email"], "a@x.com");
    assert_eq!(bodies[0]["subject"], "Weather Alerts Confirmed");
    assert_eq!(bodies[1]["to"][0]["email"], "b@x.com");
    assert_eq!(bodies[1]["subject"], "Weather Alerts Also Enabled");

    let saved = app.stored_subscribers().await;
    assert!(saved[0].also_email);
}

#[tokio::test]
async fn also_email_leg_is_reported_for_email_subscribers_too() {
    let app = spawn_app().await;
    mock_email_delivery(&app, 2).await;

    let body = serde_json::json!({
        "method": "email",
        "email": "a@x.com",
        "also_email": true,
        "alt_email": "b@x.com"
    });
    let response = app.post_subscription(&body).await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["results"]["also_email"], serde_json::json!({"ok": true}));
}

#[tokio::test]
async fn confirmation_email_escapes_user_supplied_text() {
    let app = spawn_app().await;
    mock_email_delivery(&app, 1).await;

    let body = serde_json::json!({"email": "a@x.com", "city": "<script>alert(1)</script>"});
    app.post_subscription(&body).await;

    let request = &app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    let html = body["htmlContent"].as_str().unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn unconfigured_providers_fail_their_legs_but_not_the_request() {
    let app = spawn_unconfigured_app().await;

    let body = serde_json::json!({
        "method": "both",
        "email": "a@x.com",
        "phone": "+33600000000"
    });
    let response = app.post_subscription(&body).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "ok": true,
            "message": "Subscription successful",
            "results": {
                "sms": {"ok": false, "error": "Twilio not configured"},
                "email": {"ok": false, "error": "Brevo not configured"}
            }
        })
    );
    assert_eq!(app.stored_subscribers().await.len(), 1);
    assert!(app.email_server.received_requests().await.unwrap().is_empty());
    assert!(app.sms_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn store_failure_returns_500_and_sends_nothing() {
    let unwritable = std::env::temp_dir();
    let app = spawn_app_with(|config| config.subscribers.path = unwritable).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let body = serde_json::json!({"method": "email", "email": "a@x.com"});
    let response = app.post_subscription(&body).await;

    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Failed to access"));
}

#[tokio::test]
async fn subscribe_accepts_json_without_a_content_type() {
    let app = spawn_app().await;
    mock_email_delivery(&app, 1).await;

    let response = app
        .api_client
        .post(format!("{}/subscribe", &app.address))
        .body(r#"{"email": "a@x.com"}"#)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn subscribe_rejects_an_unparsable_body_in_the_subscribe_error_shape() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/subscribe", &app.address))
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());
    assert!(app.stored_subscribers().await.is_empty());
}

#[tokio::test]
async fn subscribe_keeps_non_numeric_coordinates_out_of_the_record() {
    let app = spawn_app().await;
    mock_email_delivery(&app, 1).await;

    let body = serde_json::json!({"email": "a@x.com", "city": "Paris", "lat": "abc", "lon": "2.35"});
    let response = app.post_subscription(&body).await;

    assert_eq!(200, response.status().as_u16());
    let saved = app.stored_subscribers().await;
    assert_eq!(saved[0].lat, None);
    assert_eq!(saved[0].lon, Some(2.35));
}
