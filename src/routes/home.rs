use actix_web::{HttpResponse, http::header::ContentType, web};
use tera::Tera;

use super::e500;
use crate::startup::ContactEmail;

pub async fn home(
    templates: web::Data<Tera>,
    contact_email: web::Data<ContactEmail>,
) -> Result<HttpResponse, actix_web::Error> {
    let mut ctx = tera::Context::new();
    ctx.insert("contact_email", &contact_email.0);

    let page = templates.render("index.html", &ctx).map_err(e500)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}
