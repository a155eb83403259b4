use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    models::{
        center::RegistrationCenterRecord,
        notification::{push_unique, LocalizedValue},
        response::ServiceEnvelope,
    },
    utils::try_in_order,
};

/// Client for the registration-center detail endpoint. The one lookup in
/// the pipeline that is guaranteed to produce a usable record: when the
/// whole fallback chain misses, a synthesized default takes its place.
#[derive(Clone)]
pub struct RegistrationCenterClient {
    http_client: Client,
    base_url: String,
    default_language: String,
}

impl RegistrationCenterClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %config.center_detail_url, "Registration center client initialized");

        Ok(Self {
            http_client,
            base_url: config.center_detail_url.clone(),
            default_language: config.default_language.clone(),
        })
    }

    /// Single-language lookup. Transport errors and empty bodies are both
    /// "not usable" and feed the fallback chain.
    pub async fn fetch_center(
        &self,
        center_id: &str,
        language: &str,
    ) -> Option<RegistrationCenterRecord> {
        let url = format!("{}/{}/{}", self.base_url, center_id, language);

        debug!(center_id, language, "Fetching registration center details");

        let response = match self.http_client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(center_id, language, error = %e, "Center detail fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                center_id,
                language,
                status = %response.status(),
                "Center detail endpoint returned error status"
            );
            return None;
        }

        match response.json::<ServiceEnvelope<RegistrationCenterRecord>>().await {
            Ok(envelope) => envelope.response,
            Err(e) => {
                warn!(center_id, language, error = %e, "Malformed center detail reply");
                None
            }
        }
    }

    /// Resolves a center through the language fallback chain. Never fails:
    /// an exhausted chain yields the synthesized default record.
    pub async fn get_center(&self, center_id: &str, chain: &[String]) -> RegistrationCenterRecord {
        match try_in_order(chain, |language| async move {
            self.fetch_center(center_id, &language).await
        })
        .await
        {
            Some(record) => record,
            None => {
                warn!(center_id, "No registration center found in any language, using default");
                RegistrationCenterRecord::default_record(&self.default_language)
            }
        }
    }

    /// Builds the per-language center name and address sets. One entry per
    /// distinct language in the applicant's name entries, in their order;
    /// a language whose direct lookup misses reuses the chain-resolved
    /// record.
    pub async fn localized_center_sets(
        &self,
        center_id: &str,
        primary_language: &str,
        name_entries: &[LocalizedValue],
        chain: &[String],
    ) -> (Vec<LocalizedValue>, Vec<LocalizedValue>) {
        let base = self.get_center(center_id, chain).await;

        let mut languages: Vec<&str> = name_entries
            .iter()
            .map(|entry| entry.language.as_str())
            .collect();
        if languages.is_empty() {
            languages.push(primary_language);
        }

        let mut center_names: Vec<LocalizedValue> = Vec::new();
        let mut addresses: Vec<LocalizedValue> = Vec::new();

        for language in languages {
            let record = if language == base.lang_code || base.is_default() {
                base.clone()
            } else {
                self.fetch_center(center_id, language)
                    .await
                    .unwrap_or_else(|| base.clone())
            };

            push_unique(
                &mut center_names,
                LocalizedValue::new(language, record.name.clone()),
            );
            push_unique(
                &mut addresses,
                LocalizedValue::new(language, record.full_address()),
            );
        }

        (center_names, addresses)
    }
}
