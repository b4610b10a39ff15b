//! Face processing on tokio's blocking pool.
//!
//! Decoding, sampling and gallery comparison are CPU bound and scale with
//! the upload size and the number of stored encodings. Running them inline
//! would stall every other task on the worker, so handlers go through here.
//! Database access stays on the async side.

use std::sync::Arc;

use image::DynamicImage;

use super::{
    embedding::{Embedding, encoding_hash},
    engine::FaceEngine,
    intake,
    matcher::{GalleryEntry, best_match},
};
use crate::error::AppError;

/// What the engine made of a capture.
#[derive(Debug)]
pub enum Analysis {
    Encoded {
        capture: DynamicImage,
        embedding: Embedding,
    },
    /// Rejected by the quality gate, with a user-facing reason.
    PoorQuality(String),
    /// Passed the gate but no embedding could be produced.
    NoEncoding,
}

/// Decode a data URL, run the quality gate and encode.
///
/// # Errors
///
/// - `InvalidImage`: the payload is not a decodable image
/// - `Task`: the blocking task panicked
pub async fn analyze(engine: Arc<dyn FaceEngine>, data_url: String) -> Result<Analysis, AppError> {
    tokio::task::spawn_blocking(move || -> Result<Analysis, AppError> {
        let capture = intake::decode_data_url(&data_url)?;
        if let Err(reason) = engine.assess(&capture) {
            return Ok(Analysis::PoorQuality(reason));
        }
        Ok(match engine.encode(&capture) {
            Some(embedding) => Analysis::Encoded { capture, embedding },
            None => Analysis::NoEncoding,
        })
    })
    .await?
}

/// Best candidate above `tolerance` and the best similarity seen.
pub async fn find_match(
    probe: Embedding,
    gallery: Vec<GalleryEntry>,
    tolerance: f32,
) -> Result<(Option<GalleryEntry>, f32), AppError> {
    tokio::task::spawn_blocking(move || -> Result<(Option<GalleryEntry>, f32), AppError> {
        let probe_hash = encoding_hash(&probe.to_json()?);
        let outcome = best_match(&probe, &probe_hash, &gallery, tolerance);
        Ok((outcome.candidate.cloned(), outcome.similarity))
    })
    .await?
}

/// JPEG bytes of a capture, for the registration photo.
pub async fn jpeg(capture: DynamicImage) -> Result<Vec<u8>, AppError> {
    tokio::task::spawn_blocking(move || intake::to_jpeg(&capture)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{SampleEngine, engine::tests::horizontal_ramp, intake::to_data_url};

    fn engine() -> Arc<dyn FaceEngine> {
        Arc::new(SampleEngine::new(100, 100))
    }

    #[tokio::test]
    async fn good_capture_is_encoded() {
        let analysis = analyze(engine(), to_data_url(&horizontal_ramp(200, 150)))
            .await
            .unwrap();
        match analysis {
            Analysis::Encoded { capture, embedding } => {
                assert_eq!(capture.width(), 200);
                assert_eq!(embedding.len(), 100 * 100);
            }
            other => panic!("expected an embedding, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn small_capture_fails_quality() {
        let analysis = analyze(engine(), to_data_url(&horizontal_ramp(40, 40)))
            .await
            .unwrap();
        assert!(matches!(analysis, Analysis::PoorQuality(reason) if reason.contains("too small")));
    }

    #[tokio::test]
    async fn garbage_is_invalid_image() {
        let err = analyze(engine(), "data:image/png;base64,aGVsbG8=".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidImage));
    }

    #[tokio::test]
    async fn exact_gallery_entry_matches() {
        let embedding = Embedding::new(vec![0.6, 0.8]);
        let entry = GalleryEntry {
            employee_id: "EMP010".into(),
            encoding_hash: encoding_hash(&embedding.to_json().unwrap()),
            embedding: embedding.clone(),
        };

        let (candidate, similarity) = find_match(embedding, vec![entry], 0.6).await.unwrap();
        assert_eq!(candidate.unwrap().employee_id, "EMP010");
        assert_eq!(similarity, 1.0);
    }
}
