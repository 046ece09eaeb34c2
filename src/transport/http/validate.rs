//! Shape/range checks applied at the HTTP boundary, before anything reaches
//! the domain services. Failures collect every message, matching the
//! original's validators.

use chrono::{NaiveDate, Utc};
use serde_json::Value as JsonValue;

use crate::domain::booking::NewBooking;
use crate::domain::error::Error;
use crate::transport::http::types::{
    BookingRequest, ContactRequest, CreateBookRequest, RegisterRequest,
};

pub fn validate_register(req: &RegisterRequest) -> Result<(), Error> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }
    if !is_valid_email(&req.email) {
        errors.push("Please provide a valid email".to_string());
    }
    if req.password.len() < 6 {
        errors.push("Password must be at least 6 characters".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

/// The category arrives as a typed enum, so its "is required" case is
/// already a deserialization failure by the time this runs.
pub fn validate_new_book(req: &CreateBookRequest) -> Result<(), Error> {
    let mut errors = Vec::new();
    if req.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    }
    if req.author.trim().is_empty() {
        errors.push("Author is required".to_string());
    }
    if req.isbn.trim().is_empty() {
        errors.push("ISBN is required".to_string());
    }
    if req.description.trim().is_empty() {
        errors.push("Description is required".to_string());
    }
    if req.quantity < 0 {
        errors.push("Quantity must be a positive number".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

pub fn validate_booking(req: &BookingRequest) -> Result<NewBooking, Error> {
    let mut errors = Vec::new();

    let name = req.name.clone().unwrap_or_default();
    if name.trim().len() < 2 {
        errors.push("Name must be at least 2 characters long".to_string());
    }

    let email = req.email.clone().unwrap_or_default();
    if !is_valid_email(&email) {
        errors.push("Valid email is required".to_string());
    }

    let phone = req.phone.clone().unwrap_or_default();
    if !is_valid_phone(&phone) {
        errors.push("Valid phone number is required".to_string());
    }

    let tour_id = req.tour_id.as_ref().and_then(coerce_i64);
    if tour_id.is_none() {
        errors.push("Valid tour ID is required".to_string());
    }

    let date = req.date.clone().unwrap_or_default();
    if !is_future_date(&date) {
        errors.push("Valid future date is required".to_string());
    }

    let travelers = req.travelers.unwrap_or(0);
    if !(1..=50).contains(&travelers) {
        errors.push("Number of travelers must be between 1 and 50".to_string());
    }

    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    Ok(NewBooking {
        name,
        email,
        phone,
        tour_id: tour_id.unwrap_or_default(),
        date,
        travelers,
        special_requests: req.special_requests.clone().unwrap_or_default(),
    })
}

pub fn validate_contact(req: &ContactRequest) -> Result<(), Error> {
    let mut errors = Vec::new();
    if req.name.as_deref().unwrap_or("").trim().len() < 2 {
        errors.push("Name must be at least 2 characters long".to_string());
    }
    if !is_valid_email(req.email.as_deref().unwrap_or("")) {
        errors.push("Valid email is required".to_string());
    }
    if req.subject.as_deref().unwrap_or("").trim().len() < 3 {
        errors.push("Subject must be at least 3 characters long".to_string());
    }
    if req.message.as_deref().unwrap_or("").trim().len() < 10 {
        errors.push("Message must be at least 10 characters long".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

/// `local@domain.tld` with no whitespace, same level of strictness as the
/// original's regex.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Optional leading `+`, then digits/spaces/dashes/parens.
fn is_valid_phone(phone: &str) -> bool {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
}

fn is_future_date(date: &str) -> bool {
    let today = Utc::now().date_naive();
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return d >= today;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        return dt.with_timezone(&Utc) >= Utc::now();
    }
    false
}

pub fn coerce_i64(v: &JsonValue) -> Option<i64> {
    match v {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
