use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One stored application with a booked appointment slot, as returned by
/// the application store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(rename = "applicationId")]
    pub application_id: String,

    #[serde(rename = "appointmentDate")]
    pub appointment_date: NaiveDate,

    #[serde(rename = "slotFromTime")]
    pub slot_from_time: NaiveTime,

    #[serde(rename = "registrationCenterId")]
    pub registration_center_id: String,

    #[serde(rename = "langCode", default)]
    pub lang_code: Option<String>,
}

impl ApplicationRecord {
    /// Slot start in the 12-hour form notifications carry, e.g. "10:30 AM".
    pub fn formatted_slot_time(&self) -> String {
        self.slot_from_time.format("%I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationList {
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
}
