//! Turning a registration capture into something storable.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use image::DynamicImage;
use uuid::Uuid;

use crate::{
    error::AppError,
    face::{Analysis, Embedding, FaceEngine, pipeline},
};

/// Decode, quality-check and encode a capture.
///
/// Unlike recognition, a poor capture is an error here: the administrator
/// has to retake it before anything is stored.
pub async fn prepare_capture(
    engine: Arc<dyn FaceEngine>,
    data_url: String,
) -> Result<(DynamicImage, Embedding), AppError> {
    match pipeline::analyze(engine, data_url).await? {
        Analysis::Encoded { capture, embedding } => Ok((capture, embedding)),
        Analysis::PoorQuality(reason) => Err(AppError::FaceQuality(reason)),
        Analysis::NoEncoding => Err(AppError::NoFaceEncoding),
    }
}

/// Write the capture as `<dir>/<employee_id>-<uuid>.jpg` and return the path.
pub async fn store_photo(
    dir: &Path,
    employee_id: &str,
    capture: DynamicImage,
) -> Result<PathBuf, AppError> {
    let jpeg = pipeline::jpeg(capture).await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}-{}.jpg", file_stem(employee_id), Uuid::new_v4()));
    tokio::fs::write(&path, jpeg).await?;
    Ok(path)
}

/// Remove a photo written for a registration that was then rejected.
pub async fn discard_photo(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "could not remove orphaned photo");
    }
}

/// `employee_id` restricted to characters that are safe in a file name.
fn file_stem(employee_id: &str) -> String {
    employee_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{SampleEngine, engine::tests::horizontal_ramp, intake::to_data_url};

    fn engine() -> Arc<dyn FaceEngine> {
        Arc::new(SampleEngine::new(100, 100))
    }

    #[tokio::test]
    async fn good_capture_yields_embedding() {
        let (capture, embedding) =
            prepare_capture(engine(), to_data_url(&horizontal_ramp(200, 150)))
                .await
                .unwrap();
        assert_eq!(capture.width(), 200);
        assert_eq!(embedding.len(), 100 * 100);
    }

    #[tokio::test]
    async fn poor_capture_is_a_quality_error() {
        let err = prepare_capture(engine(), to_data_url(&horizontal_ramp(60, 60)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FaceQuality(_)));
    }

    #[test]
    fn file_stem_strips_path_characters() {
        assert_eq!(file_stem("../EMP 1"), "___EMP_1");
        assert_eq!(file_stem("EMP-010_a"), "EMP-010_a");
    }

    #[tokio::test]
    async fn photo_is_written_and_discarded() {
        let dir = std::env::temp_dir().join(format!("face-login-test-{}", Uuid::new_v4()));
        let path = store_photo(&dir, "EMP010", horizontal_ramp(64, 64))
            .await
            .unwrap();
        assert!(path.starts_with(&dir));
        assert!(tokio::fs::metadata(&path).await.is_ok());

        discard_photo(&path).await;
        assert!(tokio::fs::metadata(&path).await.is_err());
        let _ = tokio::fs::remove_dir(&dir).await;
    }
}
