use std::collections::HashMap;
use std::future::Future;

use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use crate::{
    clients::{
        application::ApplicationServiceClient, center::RegistrationCenterClient,
        demographic::DemographicClient, email::EmailGatewayClient, sms::SmsGatewayClient,
        template::TemplateServiceClient,
    },
    config::Config,
    error::NotificationError,
    models::{
        notification::{LocalizedValue, Notification},
        request::{NotificationRequest, RequestEnvelope},
        response::{NotificationResult, ResponseEnvelope},
        retry::RetryConfig,
        status::{ChannelOutcome, DispatchSummary, FailureKind},
        validation::{validate_request, verify_name_match},
    },
};

pub const SENT_MESSAGE: &str = "Notification sent successfully";
pub const NO_CONTACT_MESSAGE: &str = "No contact information available, nothing dispatched";

/// Tries each candidate in order, skipping duplicates of already-tried
/// entries, and stops at the first lookup that produces a value. An
/// exhausted list is `None`; the caller decides whether that warrants a
/// synthesized default.
pub async fn try_in_order<T, F, Fut>(candidates: &[String], mut lookup: F) -> Option<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let mut tried: Vec<&str> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if tried.iter().any(|seen| *seen == candidate.as_str()) {
            continue;
        }
        tried.push(candidate);

        if let Some(found) = lookup(candidate.clone()).await {
            return Some(found);
        }
    }

    None
}

/// Picks the text for a language tag from a localized set: exact match,
/// else the first entry, else empty.
pub fn value_for_language(set: &[LocalizedValue], language: &str) -> String {
    set.iter()
        .find(|entry| entry.language == language)
        .or_else(|| set.first())
        .map(|entry| entry.value.clone())
        .unwrap_or_default()
}

pub async fn retry_with_backoff<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        attempt,
                        max_attempts = config.max_attempts,
                        "Retry succeeded"
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                if attempt >= config.max_attempts {
                    warn!(
                        max_attempts = config.max_attempts,
                        error = %e,
                        "Retry failed after exhausting all attempts"
                    );
                    return Err(e);
                }

                debug!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms,
                    "Retry attempt failed, backing off"
                );

                let jitter = rand::random_range(-0.1..=0.1);
                let jittered_delay = (delay_ms as f64 * (1.0 + jitter)) as u64;

                sleep(Duration::from_millis(jittered_delay)).await;

                delay_ms = std::cmp::min(delay_ms * config.backoff_multiplier, config.max_delay_ms);
            }
        }
    }
}

/// Interactive entry point: envelope JSON in, envelope out. The `id` and
/// `version` of the request are echoed back; every failure is converted
/// into the envelope's error list, never thrown past this boundary.
#[allow(clippy::too_many_arguments)]
pub async fn process_notification(
    payload: &str,
    demographic_client: &DemographicClient,
    application_client: &ApplicationServiceClient,
    center_client: &RegistrationCenterClient,
    template_client: &TemplateServiceClient,
    sms_client: &SmsGatewayClient,
    email_client: &EmailGatewayClient,
    config: &Config,
) -> ResponseEnvelope<NotificationResult> {
    let parsed: RequestEnvelope = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Rejecting unparseable notification payload");
            return ResponseEnvelope::failure(None, None, &NotificationError::Payload(e));
        }
    };

    let id = parsed.id.clone();
    let version = parsed.version.clone();

    match run_pipeline(
        &parsed.request,
        demographic_client,
        application_client,
        center_client,
        template_client,
        sms_client,
        email_client,
        config,
    )
    .await
    {
        Ok(result) => ResponseEnvelope::success(id, version, result),
        Err(e) => {
            error!(error = %e, "Notification request failed");
            ResponseEnvelope::failure(id, version, &e)
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_pipeline(
    raw: &NotificationRequest,
    demographic_client: &DemographicClient,
    application_client: &ApplicationServiceClient,
    center_client: &RegistrationCenterClient,
    template_client: &TemplateServiceClient,
    sms_client: &SmsGatewayClient,
    email_client: &EmailGatewayClient,
    config: &Config,
) -> Result<NotificationResult, NotificationError> {
    let mut notification = validate_request(raw, &config.default_language)?;

    info!(
        pre_registration_id = %notification.pre_registration_id,
        kind = notification.kind().as_str(),
        "Processing notification request"
    );

    // Batch requests arrive with store-fed data already resolved;
    // additional-recipient requests carry their own contacts. Only the
    // full interactive path consults the demographic and booking records.
    if !notification.additional_recipient && !notification.is_batch {
        resolve_against_records(
            &mut notification,
            demographic_client,
            application_client,
            center_client,
            config,
        )
        .await?;
    }

    let summary =
        dispatch_channels(&notification, template_client, sms_client, email_client, config).await;

    summarize_dispatch(&notification, &summary)
}

async fn resolve_against_records(
    notification: &mut Notification,
    demographic_client: &DemographicClient,
    application_client: &ApplicationServiceClient,
    center_client: &RegistrationCenterClient,
    config: &Config,
) -> Result<(), NotificationError> {
    let demographic = demographic_client
        .get_demographic(&notification.pre_registration_id)
        .await?;

    if demographic.name_entries.is_empty() {
        return Err(NotificationError::DemographicDetailsNotFound {
            pre_registration_id: notification.pre_registration_id.clone(),
        });
    }

    let candidate = notification.name.clone().unwrap_or_default();
    verify_name_match(&candidate, &demographic.name_entries)?;

    let booking = application_client
        .booking_details(&notification.pre_registration_id)
        .await?;

    if booking.appointment_date.to_string() != notification.appointment_date {
        return Err(NotificationError::InvalidField {
            field: "appointmentDate".to_string(),
        });
    }
    if booking.formatted_slot_time() != notification.appointment_time {
        return Err(NotificationError::InvalidField {
            field: "appointmentTime".to_string(),
        });
    }

    // The stored record owns the contact details; caller-supplied values
    // only survive where the record has none.
    if demographic.email.is_some() {
        notification.email_id = demographic.email.clone();
    }
    if demographic.phone.is_some() {
        notification.mob_num = demographic.phone.clone();
    }
    notification.full_name = demographic.name_entries.clone();

    let chain = config.fallback_chain(&notification.language_code);
    let (center_names, addresses) = center_client
        .localized_center_sets(
            &booking.registration_center_id,
            &notification.language_code,
            &notification.full_name,
            &chain,
        )
        .await;
    notification.center_name = center_names;
    notification.address = addresses;

    Ok(())
}

/// Renders and sends over both channels. Each channel runs to its own
/// outcome; a failure on one never aborts the other.
pub async fn dispatch_channels(
    notification: &Notification,
    template_client: &TemplateServiceClient,
    sms_client: &SmsGatewayClient,
    email_client: &EmailGatewayClient,
    config: &Config,
) -> DispatchSummary {
    let templates = config.templates_for(notification.kind());
    let chain = config.fallback_chain(&notification.language_code);

    let sms = async {
        match &notification.mob_num {
            None => ChannelOutcome::Skipped,
            Some(number) => {
                send_sms_channel(
                    notification,
                    number,
                    &templates.sms,
                    &chain,
                    template_client,
                    sms_client,
                )
                .await
            }
        }
    };

    let email = async {
        match &notification.email_id {
            None => ChannelOutcome::Skipped,
            Some(address) => {
                send_email_channel(
                    notification,
                    address,
                    &templates.email_subject,
                    &templates.email_content,
                    &chain,
                    template_client,
                    email_client,
                )
                .await
            }
        }
    };

    let (sms, email) = tokio::join!(sms, email);

    DispatchSummary { sms, email }
}

async fn send_sms_channel(
    notification: &Notification,
    number: &str,
    template_code: &str,
    chain: &[String],
    template_client: &TemplateServiceClient,
    sms_client: &SmsGatewayClient,
) -> ChannelOutcome {
    let variables = template_variables(notification);

    let body = match template_client.resolve_template(template_code, chain).await {
        Ok(body) => body,
        Err(e) => return ChannelOutcome::failed(FailureKind::Template, e.to_string()),
    };

    let message = match template_client.render(&body, &variables) {
        Ok(message) => message,
        Err(e) => return ChannelOutcome::failed(FailureKind::Template, e.to_string()),
    };

    match sms_client.send(&message, number).await {
        Ok(()) => ChannelOutcome::Sent,
        Err(e) => ChannelOutcome::failed(FailureKind::Transport, e.to_string()),
    }
}

async fn send_email_channel(
    notification: &Notification,
    address: &str,
    subject_code: &str,
    content_code: &str,
    chain: &[String],
    template_client: &TemplateServiceClient,
    email_client: &EmailGatewayClient,
) -> ChannelOutcome {
    let variables = template_variables(notification);

    // The email channel needs both halves; a partial render fails it.
    let subject = match template_client.resolve_template(subject_code, chain).await {
        Ok(body) => body,
        Err(e) => return ChannelOutcome::failed(FailureKind::Template, e.to_string()),
    };
    let content = match template_client.resolve_template(content_code, chain).await {
        Ok(body) => body,
        Err(e) => return ChannelOutcome::failed(FailureKind::Template, e.to_string()),
    };

    let subject = match template_client.render(&subject, &variables) {
        Ok(rendered) => rendered,
        Err(e) => return ChannelOutcome::failed(FailureKind::Template, e.to_string()),
    };
    let content = match template_client.render(&content, &variables) {
        Ok(rendered) => rendered,
        Err(e) => return ChannelOutcome::failed(FailureKind::Template, e.to_string()),
    };

    match email_client.send(&subject, &content, address).await {
        Ok(()) => ChannelOutcome::Sent,
        Err(e) => ChannelOutcome::failed(FailureKind::Transport, e.to_string()),
    }
}

/// Variable map handed to the merge engine, localized to the
/// notification's language.
pub fn template_variables(notification: &Notification) -> HashMap<String, String> {
    let language = notification.language_code.as_str();

    let user_name = if notification.full_name.is_empty() {
        notification.name.clone().unwrap_or_default()
    } else {
        value_for_language(&notification.full_name, language)
    };

    let mut variables = HashMap::new();
    variables.insert(
        "preRegistrationId".to_string(),
        notification.pre_registration_id.clone(),
    );
    variables.insert(
        "appointmentDate".to_string(),
        notification.appointment_date.clone(),
    );
    variables.insert(
        "appointmentTime".to_string(),
        notification.appointment_time.clone(),
    );
    variables.insert("userName".to_string(), user_name);
    variables.insert(
        "registrationCenterName".to_string(),
        value_for_language(&notification.center_name, language),
    );
    variables.insert(
        "address".to_string(),
        value_for_language(&notification.address, language),
    );
    variables
}

/// Aggregation rule: one Sent is overall success, double-Skipped is a
/// warning, and failures on every channel that had contact information
/// surface as an aggregate error.
pub fn summarize_dispatch(
    notification: &Notification,
    summary: &DispatchSummary,
) -> Result<NotificationResult, NotificationError> {
    info!(
        pre_registration_id = %notification.pre_registration_id,
        sms = %summary.sms,
        email = %summary.email,
        "Channel dispatch complete"
    );

    if summary.all_skipped() {
        warn!(
            pre_registration_id = %notification.pre_registration_id,
            "Neither email nor phone number available"
        );
        return Ok(NotificationResult {
            message: NO_CONTACT_MESSAGE.to_string(),
        });
    }

    if summary.any_sent() {
        return Ok(NotificationResult {
            message: SENT_MESSAGE.to_string(),
        });
    }

    Err(NotificationError::AllChannelsFailed {
        detail: format!("sms: {}; email: {}", summary.sms, summary.email),
    })
}
