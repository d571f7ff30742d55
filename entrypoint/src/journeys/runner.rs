use std::{sync::Arc, time::Duration};

use browser::{Browser, SessionOptions, WebDriverBrowser};
use common::fixtures::TestData;
use metrics::put_metric;
use tokio::{sync::Semaphore, task::JoinHandle, time::Instant};
use tracing::{error, info, warn};

use crate::{
    context::JourneyContext,
    errors::JourneyError,
    journey::{Journey, JourneyResult, Outcome},
    suites,
};

const JOURNEY_TIMEOUT: Duration = Duration::from_secs(60);

pub struct RunSettings {
    pub session: SessionOptions,
    pub base_url: String,
    pub workers: usize,
    pub data: TestData,
}

/// Runs every journey in its own browser session, at most `workers` at a time.
/// Results come back in the order the journeys were given.
pub async fn run_journeys(settings: Arc<RunSettings>, journeys: Vec<Journey>) -> Vec<JourneyResult> {
    let semaphore = Arc::new(Semaphore::new(settings.workers.max(1)));
    let mut handles: Vec<(Journey, JoinHandle<JourneyResult>)> = Vec::new();

    for journey in journeys {
        let settings = settings.clone();
        let semaphore = semaphore.clone();

        handles.push((
            journey,
            tokio::spawn(async move {
                // the semaphore is never closed
                let _permit = semaphore.acquire_owned().await;

                run_in_session(&settings, journey).await
            }),
        ));
    }

    let mut results = Vec::with_capacity(handles.len());

    for (journey, handle) in handles {
        match handle.await {
            Ok(result) => results.push(result),
            Err(err) => {
                error!("{journey} task did not complete: {err}");
                results.push(JourneyResult {
                    journey,
                    outcome: Outcome::Failed(err.to_string()),
                    elapsed: Duration::ZERO,
                });
            }
        }
    }

    results
}

async fn run_in_session(settings: &RunSettings, journey: Journey) -> JourneyResult {
    let started = Instant::now();

    info!("Starting {journey} - {}", journey.title());

    let outcome = match WebDriverBrowser::connect(settings.session.clone()).await {
        Ok(browser) => {
            let context = JourneyContext::new(&browser, &settings.base_url, &settings.data);
            let result = run_with_timeout(journey, &context).await;

            if let Err(err) = &result
                && !matches!(err, JourneyError::Skipped(_))
            {
                capture_failure(journey, &context).await;
            }

            if let Err(err) = browser.close().await {
                warn!("Failed to close the {journey} session: {err}");
            }

            Outcome::from(result)
        }
        Err(err) => Outcome::Failed(err.to_string()),
    };

    let result = JourneyResult {
        journey,
        outcome,
        elapsed: started.elapsed(),
    };

    record_outcome(&result);

    result
}

pub(crate) async fn run_with_timeout<B: Browser>(
    journey: Journey,
    context: &JourneyContext<'_, B>,
) -> Result<(), JourneyError> {
    tokio::time::timeout(JOURNEY_TIMEOUT, suites::run(journey, context))
        .await
        .map_err(|_| JourneyError::TimedOut(JOURNEY_TIMEOUT))?
}

async fn capture_failure<B: Browser>(journey: Journey, context: &JourneyContext<'_, B>) {
    if let Err(err) = context
        .base()
        .take_screenshot(&format!("{journey}-failure"))
        .await
    {
        warn!("No screenshot for {journey}: {err}");
    }
}

fn record_outcome(result: &JourneyResult) {
    let journey = result.journey;
    let elapsed = result.elapsed.as_secs_f64();

    match &result.outcome {
        Outcome::Passed => {
            info!("{journey} passed in {elapsed:.1}s");
            put_metric!(Metrics::JourneyPassed, 1, "journey" => journey.to_string());
        }
        Outcome::Failed(reason) => {
            error!("{journey} failed in {elapsed:.1}s: {reason}");
            put_metric!(Metrics::JourneyFailed, 1, "journey" => journey.to_string());
        }
        Outcome::Skipped(reason) => {
            warn!("{journey} skipped: {reason}");
            put_metric!(Metrics::JourneySkipped, 1, "journey" => journey.to_string());
        }
    }
}

/// Logs one line per journey plus the totals; `true` when nothing failed
pub fn summarize(results: &[JourneyResult]) -> bool {
    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for result in results {
        let status = match &result.outcome {
            Outcome::Passed => {
                passed += 1;
                "PASSED"
            }
            Outcome::Failed(_) => {
                failed += 1;
                "FAILED"
            }
            Outcome::Skipped(_) => {
                skipped += 1;
                "SKIPPED"
            }
        };

        info!(
            "{status:<8} {} [{}] {}",
            result.journey,
            result.journey.suite(),
            result.journey.title()
        );
    }

    info!("{passed} passed, {failed} failed, {skipped} skipped");

    failed == 0
}
