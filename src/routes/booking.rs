use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::startup::BookingUrl;

const FALLBACK_LOCATION: &str = "/contact";

/// Calls to action point here. Sends visitors to the external booking page, or to the contact
/// form when no booking page is configured.
#[tracing::instrument(name = "Redirecting to the consultation booking", skip(booking_url))]
pub async fn handle_booking(booking_url: web::Data<BookingUrl>) -> HttpResponse {
    let location = booking_url.0.as_deref().unwrap_or(FALLBACK_LOCATION);

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
