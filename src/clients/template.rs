use std::{collections::HashMap, time::Duration};

use anyhow::{Error, Result, anyhow};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::NotificationError,
    models::{response::ServiceEnvelope, template::TemplateList},
    utils::try_in_order,
};

/// Read-only client for the master-data template store.
#[derive(Clone)]
pub struct TemplateServiceClient {
    http_client: Client,
    base_url: String,
}

impl TemplateServiceClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %config.template_service_url, "Template service client initialized");

        Ok(Self {
            http_client,
            base_url: config.template_service_url.clone(),
        })
    }

    /// Fetches the active template body for one (type code, language)
    /// pair. Transport problems, error replies and inactive or empty
    /// entries all come back as `None` so the caller's fallback chain can
    /// move on.
    pub async fn fetch_template(&self, template_code: &str, language: &str) -> Option<String> {
        let url = format!("{}/templates/{}/{}", self.base_url, language, template_code);

        debug!(template_code, language, "Fetching template from master data");

        let response = match self.http_client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(template_code, language, error = %e, "Template fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                template_code,
                language,
                status = %response.status(),
                "Template store returned error status"
            );
            return None;
        }

        let envelope: ServiceEnvelope<TemplateList> = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(template_code, language, error = %e, "Malformed template store reply");
                return None;
            }
        };

        envelope
            .response
            .unwrap_or_default()
            .templates
            .into_iter()
            .filter(|entry| {
                entry.is_active
                    && entry.lang_code == language
                    && entry.template_type_code == template_code
                    && !entry.file_text.trim().is_empty()
            })
            .next_back()
            .map(|entry| entry.file_text)
    }

    /// Resolves a template through the language fallback chain; exhausting
    /// the chain is a hard resolution failure.
    pub async fn resolve_template(
        &self,
        template_code: &str,
        chain: &[String],
    ) -> Result<String, NotificationError> {
        try_in_order(chain, |language| async move {
            self.fetch_template(template_code, &language).await
        })
        .await
        .ok_or_else(|| NotificationError::TemplateResolution {
            template: template_code.to_string(),
        })
    }

    /// Merges variables into a fetched template body. A placeholder left
    /// unreplaced means the variable map was incomplete, which fails the
    /// render.
    pub fn render(&self, template: &str, variables: &HashMap<String, String>) -> Result<String, Error> {
        debug!(variable_count = variables.len(), "Rendering template");

        let mut result = template.to_string();

        for (key, value) in variables {
            let placeholder = format!("{{{{{}}}}}", key);
            result = result.replace(&placeholder, value);
        }

        if let Some(start) = result.find("{{")
            && let Some(end) = result[start..].find("}}")
        {
            let missing_var = &result[start..start + end + 2];

            warn!(
                missing_variable = %missing_var,
                "Template contains unreplaced variable"
            );

            return Err(anyhow!("Missing variable in template: {}", missing_var));
        }

        Ok(result)
    }
}
