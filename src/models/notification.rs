use serde::{Deserialize, Serialize};

/// One (language tag, text) pair. Name entries, center names and addresses
/// all travel as ordered lists of these, unique per language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedValue {
    #[serde(alias = "key")]
    pub language: String,
    pub value: String,
}

impl LocalizedValue {
    pub fn new(language: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            value: value.into(),
        }
    }
}

/// Appends a pair unless the language tag is already present, preserving
/// the order of the driving source.
pub fn push_unique(set: &mut Vec<LocalizedValue>, pair: LocalizedValue) {
    if !set.iter().any(|entry| entry.language == pair.language) {
        set.push(pair);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Otp,
    Reminder,
    BookingAck,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Otp => "otp",
            NotificationKind::Reminder => "reminder",
            NotificationKind::BookingAck => "booking-ack",
        }
    }
}

/// Template type codes for one notification kind, one per channel output.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub sms: String,
    pub email_subject: String,
    pub email_content: String,
}

/// The canonical notification record produced by validation and enriched by
/// the lookups. Immutable once dispatch starts.
#[derive(Debug, Clone)]
pub struct Notification {
    pub pre_registration_id: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub name: Option<String>,
    pub email_id: Option<String>,
    pub mob_num: Option<String>,
    pub language_code: String,
    pub is_batch: bool,
    pub additional_recipient: bool,
    pub full_name: Vec<LocalizedValue>,
    pub center_name: Vec<LocalizedValue>,
    pub address: Vec<LocalizedValue>,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        if self.additional_recipient {
            NotificationKind::Otp
        } else if self.is_batch {
            NotificationKind::Reminder
        } else {
            NotificationKind::BookingAck
        }
    }
}
