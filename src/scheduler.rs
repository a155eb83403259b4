use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Error, Result};
use chrono::{DateTime, Days, NaiveTime, Utc};
use futures_util::stream::{self, StreamExt};
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    clients::{
        application::ApplicationServiceClient, center::RegistrationCenterClient,
        demographic::DemographicClient, email::EmailGatewayClient, sms::SmsGatewayClient,
        template::TemplateServiceClient,
    },
    config::Config,
    error::NotificationError,
    models::{
        application::ApplicationRecord, request::NotificationRequest, status::DispatchSummary,
        validation::validate_request,
    },
    utils::dispatch_channels,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    pub found: usize,
    pub dispatched: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Recurring reminder loop: sleeps until the configured daily trigger,
/// runs one sweep, repeats. One logical run per trigger; the next sleep
/// only starts once the sweep has finished.
pub async fn run(config: Config) -> Result<(), Error> {
    let demographic_client = DemographicClient::new(&config)?;
    let application_client = ApplicationServiceClient::new(&config)?;
    let center_client = RegistrationCenterClient::new(&config)?;
    let template_client = TemplateServiceClient::new(&config)?;
    let sms_client = SmsGatewayClient::new(&config)?;
    let email_client = EmailGatewayClient::new(&config)?;

    info!(
        trigger = %config.reminder_trigger_time,
        days_ahead = config.reminder_days_ahead,
        "Reminder scheduler started"
    );

    loop {
        let delay = delay_until_next_trigger(Utc::now(), &config.reminder_trigger_time);
        sleep(delay).await;

        run_sweep(
            &demographic_client,
            &application_client,
            &center_client,
            &template_client,
            &sms_client,
            &email_client,
            &config,
        )
        .await;
    }
}

/// Time until the next occurrence of the "HH:MM" UTC trigger. An
/// unparseable trigger falls back to 07:00.
pub fn delay_until_next_trigger(now: DateTime<Utc>, trigger: &str) -> Duration {
    let trigger_time = NaiveTime::parse_from_str(trigger, "%H:%M").unwrap_or_else(|_| {
        warn!(trigger, "Unparseable reminder trigger time, using 07:00");
        NaiveTime::from_hms_opt(7, 0, 0).expect("valid literal time")
    });

    let mut next = now.date_naive().and_time(trigger_time).and_utc();
    if next <= now {
        next += chrono::Duration::days(1);
    }

    (next - now).to_std().unwrap_or(Duration::from_secs(60))
}

/// One sweep: every application with an appointment on the target date
/// gets an independent reminder attempt. Failures are logged per
/// application and never stop the remaining ones.
#[allow(clippy::too_many_arguments)]
pub async fn run_sweep(
    demographic_client: &DemographicClient,
    application_client: &ApplicationServiceClient,
    center_client: &RegistrationCenterClient,
    template_client: &TemplateServiceClient,
    sms_client: &SmsGatewayClient,
    email_client: &EmailGatewayClient,
    config: &Config,
) -> SweepSummary {
    let run_id = Uuid::new_v4();
    let target_date = Utc::now().date_naive() + Days::new(config.reminder_days_ahead);

    info!(%run_id, %target_date, "Starting appointment reminder sweep");

    let applications = match application_client.appointments_on(target_date).await {
        Ok(applications) => applications,
        Err(e) => {
            error!(%run_id, error = %e, "Could not query applications for sweep");
            return SweepSummary::default();
        }
    };

    if applications.is_empty() {
        info!(%run_id, %target_date, "No appointments found for target date");
        return SweepSummary::default();
    }

    let found = applications.len();
    info!(%run_id, count = found, "Found appointments for target date");

    let dispatched = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    stream::iter(applications)
        .for_each_concurrent(config.worker_concurrency, |application| {
            let dispatched = &dispatched;
            let skipped = &skipped;
            let failed = &failed;

            async move {
                let pre_registration_id = application.application_id.clone();

                match process_single_reminder(
                    &application,
                    demographic_client,
                    center_client,
                    template_client,
                    sms_client,
                    email_client,
                    config,
                )
                .await
                {
                    Ok(summary) if summary.any_sent() => {
                        info!(pre_registration_id = %pre_registration_id, "Reminder dispatched");
                        dispatched.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(summary) if summary.all_skipped() => {
                        warn!(pre_registration_id = %pre_registration_id, "No contact information, reminder skipped");
                        skipped.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(summary) => {
                        error!(
                            pre_registration_id = %pre_registration_id,
                            sms = %summary.sms,
                            email = %summary.email,
                            "Reminder failed on every contactable channel"
                        );
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        error!(pre_registration_id = %pre_registration_id, error = %e, "Reminder processing failed");
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        })
        .await;

    let summary = SweepSummary {
        found,
        dispatched: dispatched.into_inner(),
        skipped: skipped.into_inner(),
        failed: failed.into_inner(),
    };

    info!(
        %run_id,
        found = summary.found,
        dispatched = summary.dispatched,
        skipped = summary.skipped,
        failed = summary.failed,
        "Appointment reminder sweep completed"
    );

    summary
}

/// One application's reminder: demographic record, synthesized batch
/// request, validation, center resolution, dispatch.
async fn process_single_reminder(
    application: &ApplicationRecord,
    demographic_client: &DemographicClient,
    center_client: &RegistrationCenterClient,
    template_client: &TemplateServiceClient,
    sms_client: &SmsGatewayClient,
    email_client: &EmailGatewayClient,
    config: &Config,
) -> Result<DispatchSummary, NotificationError> {
    let demographic = demographic_client
        .get_demographic(&application.application_id)
        .await?;

    let language = demographic
        .lang_code
        .clone()
        .or_else(|| application.lang_code.clone())
        .unwrap_or_else(|| config.default_language.clone());

    let raw = NotificationRequest {
        pre_registration_id: Some(application.application_id.clone()),
        appointment_date: Some(application.appointment_date.to_string()),
        appointment_time: Some(application.formatted_slot_time()),
        name: demographic.primary_name().map(str::to_string),
        email_id: demographic.email.clone(),
        mob_num: demographic.phone.clone(),
        language_code: Some(language),
        is_batch: true,
        additional_recipient: false,
        full_name: demographic.name_entries.clone(),
        registration_center_name: Vec::new(),
        address: Vec::new(),
    };

    let mut notification = validate_request(&raw, &config.default_language)?;

    let chain = config.fallback_chain(&notification.language_code);
    let (center_names, addresses) = center_client
        .localized_center_sets(
            &application.registration_center_id,
            &notification.language_code,
            &notification.full_name,
            &chain,
        )
        .await;
    notification.center_name = center_names;
    notification.address = addresses;

    Ok(dispatch_channels(&notification, template_client, sms_client, email_client, config).await)
}
