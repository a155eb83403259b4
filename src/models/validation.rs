use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::{
    error::NotificationError,
    models::{
        notification::{LocalizedValue, Notification},
        request::NotificationRequest,
    },
};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").unwrap());

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{8,15}$").unwrap());

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_phone(number: &str) -> bool {
    PHONE_RE.is_match(number)
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

/// Normalizes a raw request into a canonical notification record.
///
/// Mandatory-field violations are collected in full rather than reported
/// one at a time. The contact rule (at least one valid email or phone)
/// binds interactive requests; batch requests tolerate missing contacts so
/// the dispatcher can report both channels skipped.
pub fn validate_request(
    raw: &NotificationRequest,
    default_language: &str,
) -> Result<Notification, NotificationError> {
    let mut missing: Vec<String> = Vec::new();

    let pre_registration_id = present(&raw.pre_registration_id);
    if pre_registration_id.is_none() {
        missing.push("preRegistrationId".to_string());
    }
    let appointment_date = present(&raw.appointment_date);
    if appointment_date.is_none() {
        missing.push("appointmentDate".to_string());
    }
    let appointment_time = present(&raw.appointment_time);
    if appointment_time.is_none() {
        missing.push("appointmentTime".to_string());
    }
    let name = present(&raw.name);
    if name.is_none() && !raw.is_batch {
        missing.push("name".to_string());
    }

    let email = present(&raw.email_id);
    let phone = present(&raw.mob_num);
    let email_valid = email.is_some_and(validate_email);
    let phone_valid = phone.is_some_and(validate_phone);

    // Contact rule for interactive requests: at least one usable value.
    // Exactly one field present and malformed is an invalid-field failure;
    // none present, or both present and malformed, fails mandatory-contact.
    let mut invalid_contact: Option<&str> = None;
    if !raw.is_batch && !email_valid && !phone_valid {
        match (email, phone) {
            (Some(_), None) => invalid_contact = Some("emailID"),
            (None, Some(_)) => invalid_contact = Some("mobNum"),
            _ => missing.push("contact information".to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(NotificationError::MandatoryField { fields: missing });
    }
    if let Some(field) = invalid_contact {
        return Err(NotificationError::InvalidField {
            field: field.to_string(),
        });
    }

    if let Some(value) = email
        && !email_valid
    {
        warn!(email = %value, "Dropping malformed email address");
    }
    if let Some(value) = phone
        && !phone_valid
    {
        warn!(number = %value, "Dropping malformed phone number");
    }

    let language_code = present(&raw.language_code)
        .unwrap_or(default_language)
        .to_string();

    Ok(Notification {
        pre_registration_id: pre_registration_id.unwrap_or_default().to_string(),
        appointment_date: appointment_date.unwrap_or_default().to_string(),
        appointment_time: appointment_time.unwrap_or_default().to_string(),
        name: name.map(str::to_string),
        email_id: email.filter(|_| email_valid).map(str::to_string),
        mob_num: phone.filter(|_| phone_valid).map(str::to_string),
        language_code,
        is_batch: raw.is_batch,
        additional_recipient: raw.additional_recipient,
        full_name: raw.full_name.clone(),
        center_name: raw.registration_center_name.clone(),
        address: raw.address.clone(),
    })
}

/// Strict-mode check: the request's name must match at least one recorded
/// name entry, case-insensitively and ignoring surrounding whitespace.
pub fn verify_name_match(
    candidate: &str,
    recorded: &[LocalizedValue],
) -> Result<(), NotificationError> {
    let wanted = candidate.trim().to_lowercase();
    let matched = recorded
        .iter()
        .any(|entry| entry.value.trim().to_lowercase() == wanted);

    if matched {
        Ok(())
    } else {
        Err(NotificationError::NameMismatch)
    }
}
