use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::NotificationError,
    models::{
        demographic::DemographicRecord,
        notification::LocalizedValue,
        response::ServiceEnvelope,
        validation::{validate_email, validate_phone},
    },
};

/// Client for the identity service holding applicant demographics.
#[derive(Clone)]
pub struct DemographicClient {
    http_client: Client,
    base_url: String,
    identity_field: String,
    email_field: String,
    phone_field: String,
    name_fields: Vec<String>,
}

impl DemographicClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %config.demographic_service_url, "Demographic client initialized");

        Ok(Self {
            http_client,
            base_url: config.demographic_service_url.clone(),
            identity_field: config.identity_field.clone(),
            email_field: config.email_field.clone(),
            phone_field: config.phone_field.clone(),
            name_fields: config.name_fields().iter().map(|s| s.to_string()).collect(),
        })
    }

    pub async fn get_demographic(
        &self,
        pre_registration_id: &str,
    ) -> Result<DemographicRecord, NotificationError> {
        let url = format!("{}/{}", self.base_url, pre_registration_id);

        debug!(pre_registration_id, "Fetching demographic details");

        let not_found = || NotificationError::DemographicDetailsNotFound {
            pre_registration_id: pre_registration_id.to_string(),
        };

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            warn!(pre_registration_id, error = %e, "Demographic service unreachable");
            not_found()
        })?;

        if !response.status().is_success() {
            warn!(
                pre_registration_id,
                status = %response.status(),
                "Demographic service returned error status"
            );
            return Err(not_found());
        }

        let envelope: ServiceEnvelope<Value> = response.json().await.map_err(|e| {
            warn!(pre_registration_id, error = %e, "Malformed demographic reply");
            not_found()
        })?;

        let Some(body) = envelope.response else {
            if let Some(errors) = envelope.errors {
                warn!(pre_registration_id, ?errors, "Demographic lookup reported errors");
            }
            return Err(not_found());
        };

        let lang_code = body
            .get("langCode")
            .and_then(Value::as_str)
            .map(str::to_string);

        let details = body.get("demographicDetails").unwrap_or(&body);
        let Some(identity) = details.get(&self.identity_field) else {
            warn!(
                pre_registration_id,
                identity_field = %self.identity_field,
                "Identity root object missing from demographic data"
            );
            return Err(not_found());
        };

        let name_entries = self.extract_name_entries(identity, pre_registration_id);
        let email = self.extract_contact(identity, &self.email_field, validate_email);
        let phone = self.extract_contact(identity, &self.phone_field, validate_phone);

        Ok(DemographicRecord {
            pre_registration_id: pre_registration_id.to_string(),
            lang_code,
            name_entries,
            email,
            phone,
        })
    }

    /// Tries each configured name field key in order and keeps the first
    /// array of well-formed (language, value) entries.
    fn extract_name_entries(&self, identity: &Value, pre_registration_id: &str) -> Vec<LocalizedValue> {
        for key in &self.name_fields {
            let Some(entries) = identity.get(key).and_then(Value::as_array) else {
                continue;
            };

            let mut pairs: Vec<LocalizedValue> = Vec::with_capacity(entries.len());
            for entry in entries {
                let language = entry.get("language").and_then(Value::as_str);
                let value = entry.get("value").and_then(Value::as_str);
                if let (Some(language), Some(value)) = (language, value) {
                    pairs.push(LocalizedValue::new(language, value));
                }
            }

            if !pairs.is_empty() {
                return pairs;
            }
        }

        warn!(
            pre_registration_id,
            keys = %self.name_fields.join(","),
            "No usable name entries under any configured key"
        );
        Vec::new()
    }

    /// Contact values are kept only when individually format-valid;
    /// malformed values are dropped, not propagated as errors.
    fn extract_contact(
        &self,
        identity: &Value,
        field: &str,
        is_valid: fn(&str) -> bool,
    ) -> Option<String> {
        let value = identity.get(field).and_then(Value::as_str)?.trim();
        if value.is_empty() {
            return None;
        }
        if is_valid(value) {
            Some(value.to_string())
        } else {
            warn!(field, value, "Dropping malformed contact value from demographic data");
            None
        }
    }
}
