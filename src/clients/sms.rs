use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::{Channel, NotificationError},
    models::{
        response::{response_time_now, GatewayStatus, ServiceEnvelope},
        retry::RetryConfig,
    },
    utils::retry_with_backoff,
};

const SUCCESS_STATUS: &str = "success";

/// Client for the SMS gateway.
#[derive(Clone)]
pub struct SmsGatewayClient {
    http_client: Client,
    base_url: String,
    service_id: String,
    service_version: String,
    retry_config: RetryConfig,
}

impl SmsGatewayClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %config.sms_gateway_url, "SMS gateway client initialized");

        Ok(Self {
            http_client,
            base_url: config.sms_gateway_url.clone(),
            service_id: config.service_id.clone(),
            service_version: config.service_version.clone(),
            retry_config: config.retry_config(),
        })
    }

    /// Posts one message. Transport-level failures are retried with
    /// backoff; a reply without a `success` status is final.
    pub async fn send(&self, message: &str, number: &str) -> Result<(), NotificationError> {
        debug!(number, "Posting SMS to gateway");

        let payload = json!({
            "id": self.service_id,
            "version": self.service_version,
            "requesttime": response_time_now(),
            "request": {
                "message": message,
                "number": number,
            }
        });

        let envelope = retry_with_backoff(&self.retry_config, || {
            let client = self.http_client.clone();
            let url = self.base_url.clone();
            let payload = payload.clone();

            async move {
                let response = client
                    .post(&url)
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;

                let status = response.status();
                if !status.is_success() {
                    return Err(format!("SMS gateway returned status {status}"));
                }

                response
                    .json::<ServiceEnvelope<GatewayStatus>>()
                    .await
                    .map_err(|e| format!("Malformed SMS gateway reply: {e}"))
            }
        })
        .await
        .map_err(|detail| NotificationError::ChannelDispatch {
            channel: Channel::Sms,
            detail,
        })?;

        match envelope.response {
            Some(reply) if reply.status.eq_ignore_ascii_case(SUCCESS_STATUS) => {
                info!(number, "SMS accepted by gateway");
                Ok(())
            }
            Some(reply) => Err(NotificationError::ChannelDispatch {
                channel: Channel::Sms,
                detail: format!("gateway status {}", reply.status),
            }),
            None => Err(NotificationError::ChannelDispatch {
                channel: Channel::Sms,
                detail: "gateway reply had no status".to_string(),
            }),
        }
    }
}
