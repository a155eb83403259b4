use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::NotificationError,
    models::{
        application::{ApplicationList, ApplicationRecord},
        response::ServiceEnvelope,
    },
};

/// Client for the application store: booked appointments by date for the
/// reminder sweep, and single booking records for interactive
/// cross-validation.
#[derive(Clone)]
pub struct ApplicationServiceClient {
    http_client: Client,
    base_url: String,
}

impl ApplicationServiceClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %config.application_service_url, "Application store client initialized");

        Ok(Self {
            http_client,
            base_url: config.application_service_url.clone(),
        })
    }

    /// All applications whose appointment falls on exactly `date`.
    pub async fn appointments_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ApplicationRecord>, NotificationError> {
        let url = format!("{}/appointments?date={}", self.base_url, date);

        debug!(%date, "Querying applications by appointment date");

        let response = self.http_client.get(&url).send().await?;
        let envelope: ServiceEnvelope<ApplicationList> =
            response.error_for_status()?.json().await.map_err(NotificationError::Upstream)?;

        Ok(envelope.response.unwrap_or_default().applications)
    }

    /// The live booking record for one pre-registration id.
    pub async fn booking_details(
        &self,
        pre_registration_id: &str,
    ) -> Result<ApplicationRecord, NotificationError> {
        let url = format!("{}/appointments/{}", self.base_url, pre_registration_id);

        debug!(pre_registration_id, "Fetching booking details");

        let not_found = || NotificationError::BookingDetailsNotFound {
            pre_registration_id: pre_registration_id.to_string(),
        };

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            warn!(pre_registration_id, error = %e, "Application store unreachable");
            not_found()
        })?;

        if !response.status().is_success() {
            warn!(
                pre_registration_id,
                status = %response.status(),
                "Application store returned error status"
            );
            return Err(not_found());
        }

        let envelope: ServiceEnvelope<ApplicationRecord> = response.json().await.map_err(|e| {
            warn!(pre_registration_id, error = %e, "Malformed booking reply");
            not_found()
        })?;

        envelope.response.ok_or_else(not_found)
    }
}
