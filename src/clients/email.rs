use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use reqwest::{multipart::Form, Client};
use tracing::{debug, info};

use crate::{
    config::Config,
    error::{Channel, NotificationError},
    models::{
        response::{GatewayStatus, ServiceEnvelope},
        retry::RetryConfig,
    },
    utils::retry_with_backoff,
};

const SUCCESS_STATUS: &str = "success";

/// Client for the mail gateway, which takes a multipart form.
#[derive(Clone)]
pub struct EmailGatewayClient {
    http_client: Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl EmailGatewayClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %config.email_gateway_url, "Email gateway client initialized");

        Ok(Self {
            http_client,
            base_url: config.email_gateway_url.clone(),
            retry_config: config.retry_config(),
        })
    }

    pub async fn send(
        &self,
        subject: &str,
        content: &str,
        mail_to: &str,
    ) -> Result<(), NotificationError> {
        debug!(mail_to, "Posting email to gateway");

        let subject = subject.to_string();
        let content = content.to_string();
        let mail_to = mail_to.to_string();

        let envelope = retry_with_backoff(&self.retry_config, || {
            let client = self.http_client.clone();
            let url = self.base_url.clone();
            let form = Form::new()
                .text("mailSubject", subject.clone())
                .text("mailContent", content.clone())
                .text("mailTo", mail_to.clone());

            async move {
                let response = client
                    .post(&url)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;

                let status = response.status();
                if !status.is_success() {
                    return Err(format!("Mail gateway returned status {status}"));
                }

                response
                    .json::<ServiceEnvelope<GatewayStatus>>()
                    .await
                    .map_err(|e| format!("Malformed mail gateway reply: {e}"))
            }
        })
        .await
        .map_err(|detail| NotificationError::ChannelDispatch {
            channel: Channel::Email,
            detail,
        })?;

        match envelope.response {
            Some(reply) if reply.status.eq_ignore_ascii_case(SUCCESS_STATUS) => {
                info!(mail_to = %mail_to, "Email accepted by gateway");
                Ok(())
            }
            Some(reply) => Err(NotificationError::ChannelDispatch {
                channel: Channel::Email,
                detail: format!("gateway status {}", reply.status),
            }),
            None => Err(NotificationError::ChannelDispatch {
                channel: Channel::Email,
                detail: "gateway reply had no status".to_string(),
            }),
        }
    }
}
