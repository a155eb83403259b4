use std::{collections::HashMap, time::Duration, time::Instant};

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    config::Config,
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
};

/// Reachability checks for every upstream this service depends on.
pub struct HealthChecker {
    http_client: Client,
    config: Config,
}

impl HealthChecker {
    pub fn new(config: Config) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            config,
        }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        let targets = [
            ("demographic_service", self.config.demographic_service_url.as_str()),
            ("center_service", self.config.center_detail_url.as_str()),
            ("template_service", self.config.template_service_url.as_str()),
            ("sms_gateway", self.config.sms_gateway_url.as_str()),
            ("email_gateway", self.config.email_gateway_url.as_str()),
            ("application_store", self.config.application_service_url.as_str()),
        ];

        for (name, url) in targets {
            checks.insert(name.to_string(), self.check_reachable(name, url).await);
        }

        let overall_status = Self::determine_overall_status(&checks);

        HealthCheckResponse {
            status: overall_status,
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            checks,
        }
    }

    /// Any HTTP answer counts as reachable; only transport-level failures
    /// mark a dependency down.
    async fn check_reachable(&self, name: &str, url: &str) -> ServiceHealth {
        let start = Instant::now();

        match self.http_client.get(url).send().await {
            Ok(_) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(service = name, response_time_ms = elapsed, "Upstream reachable");
                ServiceHealth::healthy(elapsed)
            }
            Err(e) => {
                warn!(service = name, error = %e, "Upstream unreachable");
                ServiceHealth::unhealthy(format!("Connection failed: {e}"))
            }
        }
    }

    fn determine_overall_status(checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
        let down = checks
            .values()
            .filter(|health| health.status == HealthStatus::Unhealthy)
            .count();

        if down == checks.len() && !checks.is_empty() {
            HealthStatus::Unhealthy
        } else if down > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}
