use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::{
    notification::{NotificationKind, TemplateSet},
    retry::RetryConfig,
};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub demographic_service_url: String,
    pub center_detail_url: String,
    pub template_service_url: String,
    pub sms_gateway_url: String,
    pub email_gateway_url: String,
    pub application_service_url: String,

    #[serde(default = "default_service_id")]
    pub service_id: String,

    #[serde(default = "default_service_version")]
    pub service_version: String,

    #[serde(default = "default_language")]
    pub default_language: String,

    /// Ordered, comma-separated list of identity field keys tried when
    /// extracting the applicant's name entries.
    #[serde(default = "default_name_field_keys")]
    pub name_field_keys: String,

    #[serde(default = "default_identity_field")]
    pub identity_field: String,

    #[serde(default = "default_email_field")]
    pub email_field: String,

    #[serde(default = "default_phone_field")]
    pub phone_field: String,

    #[serde(default = "default_otp_sms_template")]
    pub otp_sms_template: String,

    #[serde(default = "default_otp_subject_template")]
    pub otp_subject_template: String,

    #[serde(default = "default_otp_content_template")]
    pub otp_content_template: String,

    #[serde(default = "default_reminder_sms_template")]
    pub reminder_sms_template: String,

    #[serde(default = "default_reminder_subject_template")]
    pub reminder_subject_template: String,

    #[serde(default = "default_reminder_content_template")]
    pub reminder_content_template: String,

    #[serde(default = "default_booking_ack_sms_template")]
    pub booking_ack_sms_template: String,

    #[serde(default = "default_booking_ack_subject_template")]
    pub booking_ack_subject_template: String,

    #[serde(default = "default_booking_ack_content_template")]
    pub booking_ack_content_template: String,

    /// How many days before the appointment the reminder sweep fires.
    #[serde(default = "default_reminder_days_ahead")]
    pub reminder_days_ahead: u64,

    /// Daily trigger time for the sweep, "HH:MM" in UTC.
    #[serde(default = "default_reminder_trigger_time")]
    pub reminder_trigger_time: String,

    #[serde(default = "default_worker_concurrency")]
    pub worker_concurrency: usize,

    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,

    #[serde(default = "default_initial_retry_delay_ms")]
    pub initial_retry_delay_ms: u64,

    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,

    #[serde(default = "default_retry_backoff_multiplier")]
    pub retry_backoff_multiplier: u64,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid or missing environment variable: {e}"))?;
        Ok(config)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_retry_attempts,
            initial_delay_ms: self.initial_retry_delay_ms,
            max_delay_ms: self.max_retry_delay_ms,
            backoff_multiplier: self.retry_backoff_multiplier,
        }
    }

    pub fn name_fields(&self) -> Vec<&str> {
        self.name_field_keys
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .collect()
    }

    /// Template type codes for one notification kind.
    pub fn templates_for(&self, kind: NotificationKind) -> TemplateSet {
        match kind {
            NotificationKind::Otp => TemplateSet {
                sms: self.otp_sms_template.clone(),
                email_subject: self.otp_subject_template.clone(),
                email_content: self.otp_content_template.clone(),
            },
            NotificationKind::Reminder => TemplateSet {
                sms: self.reminder_sms_template.clone(),
                email_subject: self.reminder_subject_template.clone(),
                email_content: self.reminder_content_template.clone(),
            },
            NotificationKind::BookingAck => TemplateSet {
                sms: self.booking_ack_sms_template.clone(),
                email_subject: self.booking_ack_subject_template.clone(),
                email_content: self.booking_ack_content_template.clone(),
            },
        }
    }

    /// Ordered language candidates for a lookup: the requested language,
    /// the process-wide default, then the catch-all tag. Duplicates are
    /// removed while preserving order.
    pub fn fallback_chain(&self, primary: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::with_capacity(3);
        for candidate in [primary, self.default_language.as_str(), "all"] {
            if !candidate.is_empty() && !chain.iter().any(|seen| seen == candidate) {
                chain.push(candidate.to_string());
            }
        }
        chain
    }
}

fn default_service_id() -> String {
    "prereg.notification.notify".to_string()
}

fn default_service_version() -> String {
    "1.0".to_string()
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_name_field_keys() -> String {
    "fullName,name".to_string()
}

fn default_identity_field() -> String {
    "identity".to_string()
}

fn default_email_field() -> String {
    "email".to_string()
}

fn default_phone_field() -> String {
    "phone".to_string()
}

fn default_otp_sms_template() -> String {
    "otp-sms-template".to_string()
}

fn default_otp_subject_template() -> String {
    "otp-email-subject-template".to_string()
}

fn default_otp_content_template() -> String {
    "otp-email-content-template".to_string()
}

fn default_reminder_sms_template() -> String {
    "reminder-sms-template".to_string()
}

fn default_reminder_subject_template() -> String {
    "reminder-email-subject-template".to_string()
}

fn default_reminder_content_template() -> String {
    "reminder-email-content-template".to_string()
}

fn default_booking_ack_sms_template() -> String {
    "booking-ack-sms-template".to_string()
}

fn default_booking_ack_subject_template() -> String {
    "booking-ack-email-subject-template".to_string()
}

fn default_booking_ack_content_template() -> String {
    "booking-ack-email-content-template".to_string()
}

fn default_reminder_days_ahead() -> u64 {
    1
}

fn default_reminder_trigger_time() -> String {
    "07:00".to_string()
}

fn default_worker_concurrency() -> usize {
    8
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_max_retry_attempts() -> u32 {
    3
}

fn default_initial_retry_delay_ms() -> u64 {
    200
}

fn default_max_retry_delay_ms() -> u64 {
    2_000
}

fn default_retry_backoff_multiplier() -> u64 {
    2
}

fn default_server_port() -> u16 {
    9099
}
