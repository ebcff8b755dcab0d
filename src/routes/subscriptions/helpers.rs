use tera::Tera;

use crate::domain::SubscriptionRecord;

pub const CONFIRMED_SUBJECT: &str = "Weather Alerts Confirmed";
pub const ALSO_ENABLED_SUBJECT: &str = "Weather Alerts Also Enabled";

pub fn get_confirmation_text(record: &SubscriptionRecord) -> String {
    let city = record
        .city
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or("your location");

    format!(
        "Weather alerts enabled for {city} (lat={}, lon={}). You will receive updates via {}.",
        display_coordinate(record.lat),
        display_coordinate(record.lon),
        record.method.as_str().to_uppercase(),
    )
}

pub fn get_confirmation_html(templates: &Tera, message: &str) -> Result<String, tera::Error> {
    let mut ctx = tera::Context::new();
    ctx.insert("message", message);
    templates.render("confirmation_email.html", &ctx)
}

fn display_coordinate(value: Option<f64>) -> String {
    value.map_or_else(|| "unknown".into(), |v| v.to_string())
}
