//! Face login HTTP handler.
//!
//! - POST /api/recognize - Match a captured face and log the attempt

use crate::{
    error::AppError,
    models::{
        login_log::Requester,
        recognition::{RecognizeRequest, RecognizeResponse},
    },
    services::recognition_service,
    state::AppState,
};
use axum::{Json, extract::State};

/// Recognize the face in a captured frame.
///
/// # Request Body
///
/// ```json
/// { "image": "data:image/jpeg;base64,/9j/4AAQ..." }
/// ```
///
/// # Response
///
/// - **200**: attempt completed; `success` tells whether it matched
/// - **400**: no image, or image could not be decoded (attempt still logged)
/// - **500**: database error
pub async fn recognize(
    State(state): State<AppState>,
    requester: Requester,
    Json(request): Json<RecognizeRequest>,
) -> Result<Json<RecognizeResponse>, AppError> {
    let response =
        recognition_service::recognize(&state, request.image.as_deref(), &requester).await?;
    Ok(Json(response))
}
