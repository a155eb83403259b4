use serde::{Deserialize, Serialize};

use crate::models::notification::LocalizedValue;

/// Inbound envelope: `id` and `version` are echoed back unchanged when
/// parsing succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub requesttime: Option<String>,

    pub request: NotificationRequest,
}

/// Raw notification request as received. Everything is optional here;
/// the validator decides what is mandatory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationRequest {
    #[serde(rename = "preRegistrationId", default)]
    pub pre_registration_id: Option<String>,

    #[serde(rename = "appointmentDate", default)]
    pub appointment_date: Option<String>,

    #[serde(rename = "appointmentTime", default)]
    pub appointment_time: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "emailID", default)]
    pub email_id: Option<String>,

    #[serde(rename = "mobNum", default)]
    pub mob_num: Option<String>,

    #[serde(rename = "languageCode", default)]
    pub language_code: Option<String>,

    #[serde(rename = "isBatch", default)]
    pub is_batch: bool,

    #[serde(rename = "additionalRecipient", default)]
    pub additional_recipient: bool,

    #[serde(rename = "fullName", default)]
    pub full_name: Vec<LocalizedValue>,

    #[serde(rename = "registrationCenterName", default)]
    pub registration_center_name: Vec<LocalizedValue>,

    #[serde(default)]
    pub address: Vec<LocalizedValue>,
}
