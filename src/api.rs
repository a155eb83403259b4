use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    clients::{
        application::ApplicationServiceClient, center::RegistrationCenterClient,
        demographic::DemographicClient, email::EmailGatewayClient, health::HealthChecker,
        sms::SmsGatewayClient, template::TemplateServiceClient,
    },
    config::Config,
    models::health::HealthStatus,
    utils::process_notification,
};

pub struct AppState {
    health_checker: HealthChecker,
    demographic_client: DemographicClient,
    application_client: ApplicationServiceClient,
    center_client: RegistrationCenterClient,
    template_client: TemplateServiceClient,
    sms_client: SmsGatewayClient,
    email_client: EmailGatewayClient,
    config: Config,
}

pub async fn run_api_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        health_checker: HealthChecker::new(config.clone()),
        demographic_client: DemographicClient::new(&config)?,
        application_client: ApplicationServiceClient::new(&config)?,
        center_client: RegistrationCenterClient::new(&config)?,
        template_client: TemplateServiceClient::new(&config)?,
        sms_client: SmsGatewayClient::new(&config)?,
        email_client: EmailGatewayClient::new(&config)?,
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/notification", post(send_notification))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Notification server started");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check_all().await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Interactive notification call. The transport answer is always 200;
/// failures ride in the envelope's error list.
async fn send_notification(State(state): State<Arc<AppState>>, body: String) -> impl IntoResponse {
    let envelope = process_notification(
        &body,
        &state.demographic_client,
        &state.application_client,
        &state.center_client,
        &state.template_client,
        &state.sms_client,
        &state.email_client,
        &state.config,
    )
    .await;

    (StatusCode::OK, Json(envelope))
}
