//! Recognition service - face login attempts.
//!
//! Every call to [`recognize`] that gets past request deserialization
//! writes exactly one `login_logs` row, whether it ends in a match, a
//! rejection, or a client error. If that row can't be written the whole
//! request fails, so no attempt goes unaudited.

use crate::{
    error::AppError,
    face::{Analysis, pipeline},
    models::{
        login_log::{NewLoginLog, Requester},
        recognition::RecognizeResponse,
    },
    services::{audit_service, employee_service},
    state::AppState,
};

pub const NO_IMAGE: &str = "No image data provided";
pub const NOT_RECOGNIZED: &str = "Face not recognized or confidence too low. Please try again.";

/// Run one recognition attempt.
///
/// # Process
///
/// 1. Decode the data URL
/// 2. Quality gate, then encode
/// 3. Compare against every encoding of every active employee
/// 4. Accept if the best candidate clears the acceptance threshold
/// 5. Record the attempt
///
/// Steps 1-3 run on the blocking pool.
///
/// # Errors
///
/// - `InvalidRequest`: no image (attempt is still logged)
/// - `InvalidImage`: image could not be decoded (attempt is still logged)
/// - `Database`: the gallery or the log row could not be read/written
pub async fn recognize(
    state: &AppState,
    image: Option<&str>,
    requester: &Requester,
) -> Result<RecognizeResponse, AppError> {
    let pool = &state.pool;

    let Some(data_url) = image.filter(|s| !s.trim().is_empty()) else {
        audit_service::record_attempt(pool, &NewLoginLog::failure(None, 0.0, NO_IMAGE, requester))
            .await?;
        return Err(AppError::InvalidRequest(NO_IMAGE.to_string()));
    };

    let analysis = match pipeline::analyze(state.engine.clone(), data_url.to_string()).await {
        Ok(analysis) => analysis,
        Err(err) => {
            audit_service::record_attempt(
                pool,
                &NewLoginLog::failure(None, 0.0, err.to_string(), requester),
            )
            .await?;
            return Err(err);
        }
    };

    let captured = match analysis {
        Analysis::Encoded { embedding, .. } => embedding,
        Analysis::PoorQuality(message) => {
            tracing::warn!(reason = %message, "recognition capture rejected");
            audit_service::record_attempt(
                pool,
                &NewLoginLog::failure(None, 0.0, message.clone(), requester),
            )
            .await?;
            return Ok(RecognizeResponse::rejected(message, None));
        }
        Analysis::NoEncoding => {
            let message = AppError::NoFaceEncoding.to_string();
            audit_service::record_attempt(
                pool,
                &NewLoginLog::failure(None, 0.0, message.clone(), requester),
            )
            .await?;
            return Ok(RecognizeResponse::rejected(message, None));
        }
    };

    let gallery = employee_service::load_gallery(pool).await?;
    let (candidate, similarity) =
        pipeline::find_match(captured, gallery, state.config.face_recognition_tolerance).await?;
    let confidence = f64::from(similarity);
    let threshold = f64::from(state.config.min_confidence_threshold);

    let failure_reason = match &candidate {
        Some(candidate) if confidence > threshold => {
            // The gallery only holds active employees, but the employee may
            // have been deactivated since it was loaded.
            match employee_service::find_active_employee(pool, &candidate.employee_id).await? {
                Some(employee) => {
                    audit_service::record_attempt(
                        pool,
                        &NewLoginLog::success(&employee.employee_id, confidence, requester),
                    )
                    .await?;
                    tracing::info!(
                        employee_id = %employee.employee_id,
                        confidence,
                        "face login accepted"
                    );
                    return Ok(RecognizeResponse::accepted(
                        &employee.employee_id,
                        &employee.name,
                        confidence,
                    ));
                }
                None => "Employee account inactive".to_string(),
            }
        }
        _ => format!(
            "Face not recognized (confidence: {:.1}%)",
            confidence * 100.0
        ),
    };

    let candidate_id = candidate.as_ref().map(|c| c.employee_id.as_str());
    audit_service::record_attempt(
        pool,
        &NewLoginLog::failure(candidate_id, confidence, failure_reason.clone(), requester),
    )
    .await?;
    tracing::warn!(
        candidate = ?candidate_id,
        confidence,
        reason = %failure_reason,
        "face login rejected"
    );

    Ok(RecognizeResponse::rejected(NOT_RECOGNIZED, Some(confidence)))
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use super::*;
    use crate::{
        config::Config,
        db::{DbPool, test_pool},
        face::{
            SampleEngine,
            engine::tests::{horizontal_ramp, vertical_ramp},
            intake::to_data_url,
        },
        services::employee_service::{self, tests::new_employee},
    };

    fn state(pool: DbPool) -> AppState {
        AppState::new(
            pool,
            Config::default(),
            Arc::new(SampleEngine::new(100, 100)),
        )
    }

    async fn log_count(pool: &DbPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM login_logs")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn enroll(state: &AppState, id: &str, email: &str, image: &image::DynamicImage) {
        let embedding = state.engine.encode(image).unwrap();
        employee_service::register_employee(&state.pool, &new_employee(id, email), &embedding, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn same_face_is_accepted_and_logged() {
        let state = state(test_pool().await);
        let face = horizontal_ramp(200, 160);
        enroll(&state, "EMP010", "alex.lee@company.com", &face).await;
        let before = log_count(&state.pool).await;

        let response = recognize(&state, Some(&to_data_url(&face)), &Requester::default())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.employee_name.as_deref(), Some("Alex Lee"));
        let confidence = response.confidence.unwrap();
        assert!(confidence > 0.7);
        assert_eq!(log_count(&state.pool).await, before + 1);

        let (success, logged): (bool, f64) = sqlx::query_as(
            "SELECT success, confidence_score FROM login_logs ORDER BY id DESC LIMIT 1",
        )
        .fetch_one(&state.pool)
        .await
        .unwrap();
        assert!(success);
        assert_eq!(logged, confidence);
    }

    #[tokio::test]
    async fn unknown_face_is_rejected_and_logged() {
        let state = state(test_pool().await);
        enroll(&state, "EMP010", "alex.lee@company.com", &horizontal_ramp(200, 200)).await;
        let before = log_count(&state.pool).await;

        let response = recognize(
            &state,
            Some(&to_data_url(&vertical_ramp(200, 200))),
            &Requester::default(),
        )
        .await
        .unwrap();

        assert!(!response.success);
        assert_eq!(response.message, NOT_RECOGNIZED);
        assert_eq!(log_count(&state.pool).await, before + 1);

        let (success, employee_id, logged): (bool, Option<String>, f64) = sqlx::query_as(
            "SELECT success, employee_id, confidence_score FROM login_logs ORDER BY id DESC LIMIT 1",
        )
        .fetch_one(&state.pool)
        .await
        .unwrap();
        assert!(!success);
        assert_eq!(employee_id, None);
        assert_eq!(Some(logged), response.confidence);
    }

    #[tokio::test]
    async fn deactivated_employee_never_matches() {
        let state = state(test_pool().await);
        let face = horizontal_ramp(200, 160);
        enroll(&state, "EMP010", "alex.lee@company.com", &face).await;
        employee_service::deactivate_employee(&state.pool, "EMP010")
            .await
            .unwrap();

        let response = recognize(&state, Some(&to_data_url(&face)), &Requester::default())
            .await
            .unwrap();
        assert!(!response.success);
        assert!(response.employee_name.is_none());
    }

    #[tokio::test]
    async fn threshold_is_configurable() {
        let pool = test_pool().await;
        let state = AppState::new(
            pool,
            Config {
                // Nothing but an exact hash hit can exceed this
                min_confidence_threshold: 1.0,
                ..Config::default()
            },
            Arc::new(SampleEngine::new(100, 100)),
        );
        let face = horizontal_ramp(200, 160);
        enroll(&state, "EMP010", "alex.lee@company.com", &face).await;

        let response = recognize(&state, Some(&to_data_url(&face)), &Requester::default())
            .await
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.confidence, Some(1.0));

        // The candidate cleared the tolerance, so the rejection names it
        let (employee_id, success, logged): (Option<String>, bool, f64) = sqlx::query_as(
            "SELECT employee_id, success, confidence_score FROM login_logs ORDER BY id DESC LIMIT 1",
        )
        .fetch_one(&state.pool)
        .await
        .unwrap();
        assert_eq!(employee_id.as_deref(), Some("EMP010"));
        assert!(!success);
        assert_eq!(Some(logged), response.confidence);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn large_capture_keeps_runtime_responsive() {
        let state = state(test_pool().await);
        let capture = to_data_url(&horizontal_ramp(4000, 3000));

        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = tokio::spawn({
            let ticks = ticks.clone();
            async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                    ticks.fetch_add(1, Ordering::Relaxed);
                }
            }
        });

        let response = recognize(&state, Some(&capture), &Requester::default())
            .await
            .unwrap();
        ticker.abort();

        assert!(!response.success);
        assert!(ticks.load(Ordering::Relaxed) > 0);
    }

    #[tokio::test]
    async fn missing_and_invalid_images_are_logged_errors() {
        let state = state(test_pool().await);
        let before = log_count(&state.pool).await;

        let err = recognize(&state, None, &Requester::default()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let err = recognize(&state, Some("data:image/png;base64,aGVsbG8="), &Requester::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidImage));

        assert_eq!(log_count(&state.pool).await, before + 2);
    }

    #[tokio::test]
    async fn poor_quality_capture_is_a_logged_rejection() {
        let state = state(test_pool().await);
        let before = log_count(&state.pool).await;

        let tiny = horizontal_ramp(50, 50);
        let response = recognize(&state, Some(&to_data_url(&tiny)), &Requester::default())
            .await
            .unwrap();
        assert!(!response.success);
        assert!(response.message.contains("too small"));
        assert_eq!(response.confidence, None);
        assert_eq!(log_count(&state.pool).await, before + 1);
    }
}
