use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use anyhow::{Result, anyhow};
use prereg_notify::{models::retry::RetryConfig, utils::retry_with_backoff};

fn fast_retries(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        initial_delay_ms: 1,
        max_delay_ms: 10,
        backoff_multiplier: 2,
    }
}

/// Test: a successful call is not retried
#[tokio::test]
async fn success_is_not_retried() -> Result<()> {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let result = retry_with_backoff(&fast_retries(3), || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>("delivered")
        }
    })
    .await?;

    assert_eq!(result, "delivered");
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    Ok(())
}

/// Test: transient failures are retried until the call succeeds
#[tokio::test]
async fn transient_failure_recovers() -> Result<()> {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let result = retry_with_backoff(&fast_retries(5), || {
        let counter = Arc::clone(&counter);
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(anyhow!("gateway hiccup"))
            } else {
                Ok("delivered")
            }
        }
    })
    .await?;

    assert_eq!(result, "delivered");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    Ok(())
}

/// Test: a persistent failure stops after exactly max_attempts
#[tokio::test]
async fn persistent_failure_exhausts_attempts() {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let result: Result<&str, _> = retry_with_backoff(&fast_retries(4), || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<&str, _>(anyhow!("gateway down"))
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}
