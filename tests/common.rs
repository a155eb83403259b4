use prereg_notify::config::Config;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Configuration with every outbound dependency rooted at one mock
/// server, and retries tuned down so failure tests stay fast.
pub fn test_config(mock_uri: &str) -> Config {
    Config {
        demographic_service_url: format!("{mock_uri}/demographic"),
        center_detail_url: format!("{mock_uri}/centers"),
        template_service_url: format!("{mock_uri}/masterdata"),
        sms_gateway_url: format!("{mock_uri}/sms"),
        email_gateway_url: format!("{mock_uri}/email"),
        application_service_url: format!("{mock_uri}/applications"),
        service_id: "prereg.notification.notify".to_string(),
        service_version: "1.0".to_string(),
        default_language: "eng".to_string(),
        name_field_keys: "fullName,name".to_string(),
        identity_field: "identity".to_string(),
        email_field: "email".to_string(),
        phone_field: "phone".to_string(),
        otp_sms_template: "otp-sms-template".to_string(),
        otp_subject_template: "otp-email-subject-template".to_string(),
        otp_content_template: "otp-email-content-template".to_string(),
        reminder_sms_template: "reminder-sms-template".to_string(),
        reminder_subject_template: "reminder-email-subject-template".to_string(),
        reminder_content_template: "reminder-email-content-template".to_string(),
        booking_ack_sms_template: "booking-ack-sms-template".to_string(),
        booking_ack_subject_template: "booking-ack-email-subject-template".to_string(),
        booking_ack_content_template: "booking-ack-email-content-template".to_string(),
        reminder_days_ahead: 1,
        reminder_trigger_time: "07:00".to_string(),
        worker_concurrency: 4,
        request_timeout_seconds: 5,
        max_retry_attempts: 1,
        initial_retry_delay_ms: 1,
        max_retry_delay_ms: 10,
        retry_backoff_multiplier: 2,
        server_port: 0,
    }
}

pub fn request_envelope(request: Value) -> String {
    json!({
        "id": "prereg.notification.notify",
        "version": "1.0",
        "requesttime": "2024-05-01T09:00:00.000Z",
        "request": request,
    })
    .to_string()
}

/// Mounts an active template body for one (language, type code) pair.
pub async fn mount_template(server: &MockServer, language: &str, code: &str, text: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/masterdata/templates/{language}/{code}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "templates": [{
                    "langCode": language,
                    "templateTypeCode": code,
                    "fileText": text,
                    "isActive": true,
                }]
            }
        })))
        .mount(server)
        .await;
}

/// Mounts plain, render-safe templates for all three channel outputs of
/// one notification kind, e.g. kind_prefix "booking-ack".
pub async fn mount_kind_templates(server: &MockServer, language: &str, kind_prefix: &str) {
    mount_template(
        server,
        language,
        &format!("{kind_prefix}-sms-template"),
        "Dear {{userName}}, your appointment is on {{appointmentDate}} at {{appointmentTime}}.",
    )
    .await;
    mount_template(
        server,
        language,
        &format!("{kind_prefix}-email-subject-template"),
        "Appointment {{appointmentDate}}",
    )
    .await;
    mount_template(
        server,
        language,
        &format!("{kind_prefix}-email-content-template"),
        "Dear {{userName}}, please visit {{registrationCenterName}}, {{address}}.",
    )
    .await;
}

pub async fn mount_sms_gateway(server: &MockServer, status: &str) {
    Mock::given(method("POST"))
        .and(path("/sms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "status": status }
        })))
        .mount(server)
        .await;
}

pub async fn mount_email_gateway(server: &MockServer, status: &str) {
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "status": status }
        })))
        .mount(server)
        .await;
}

/// Mounts a demographic record whose identity document carries localized
/// name entries plus optional contact fields.
pub async fn mount_demographic(
    server: &MockServer,
    pre_registration_id: &str,
    names: &[(&str, &str)],
    email: Option<&str>,
    phone: Option<&str>,
) {
    let name_entries: Vec<Value> = names
        .iter()
        .map(|(language, value)| json!({ "language": language, "value": value }))
        .collect();

    let mut identity = json!({ "fullName": name_entries });
    if let Some(email) = email {
        identity["email"] = json!(email);
    }
    if let Some(phone) = phone {
        identity["phone"] = json!(phone);
    }

    Mock::given(method("GET"))
        .and(path(format!("/demographic/{pre_registration_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "preRegistrationId": pre_registration_id,
                "langCode": names.first().map(|(language, _)| *language),
                "demographicDetails": { "identity": identity },
            }
        })))
        .mount(server)
        .await;
}

pub async fn mount_booking(
    server: &MockServer,
    pre_registration_id: &str,
    appointment_date: &str,
    slot_from_time: &str,
    center_id: &str,
) {
    Mock::given(method("GET"))
        .and(path(format!("/applications/appointments/{pre_registration_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "applicationId": pre_registration_id,
                "appointmentDate": appointment_date,
                "slotFromTime": slot_from_time,
                "registrationCenterId": center_id,
            }
        })))
        .mount(server)
        .await;
}

pub async fn mount_center(
    server: &MockServer,
    center_id: &str,
    language: &str,
    name: &str,
    address_line1: &str,
) {
    Mock::given(method("GET"))
        .and(path(format!("/centers/{center_id}/{language}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "id": center_id,
                "name": name,
                "addressLine1": address_line1,
                "langCode": language,
            }
        })))
        .mount(server)
        .await;
}
