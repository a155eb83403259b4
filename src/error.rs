use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Sms,
    Email,
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Sms => write!(f, "sms"),
            Channel::Email => write!(f, "email"),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("missing mandatory fields: {}", fields.join(", "))]
    MandatoryField { fields: Vec<String> },

    #[error("invalid value for field {field}")]
    InvalidField { field: String },

    #[error("name does not match any recorded name entry")]
    NameMismatch,

    #[error("demographic details not found for {pre_registration_id}")]
    DemographicDetailsNotFound { pre_registration_id: String },

    #[error("booking details not found for {pre_registration_id}")]
    BookingDetailsNotFound { pre_registration_id: String },

    #[error("no active template {template} found in any language")]
    TemplateResolution { template: String },

    #[error("{channel} dispatch failed: {detail}")]
    ChannelDispatch { channel: Channel, detail: String },

    #[error("all notification channels failed: {detail}")]
    AllChannelsFailed { detail: String },

    #[error("malformed request payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("upstream call failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl NotificationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            NotificationError::MandatoryField { .. } => "NTF_001",
            NotificationError::InvalidField { .. } => "NTF_002",
            NotificationError::NameMismatch => "NTF_003",
            NotificationError::DemographicDetailsNotFound { .. } => "NTF_004",
            NotificationError::BookingDetailsNotFound { .. } => "NTF_005",
            NotificationError::TemplateResolution { .. } => "NTF_006",
            NotificationError::ChannelDispatch { .. } => "NTF_007",
            NotificationError::AllChannelsFailed { .. } => "NTF_008",
            NotificationError::Payload(_) => "NTF_009",
            NotificationError::Upstream(_) => "NTF_010",
        }
    }
}
