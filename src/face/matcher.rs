//! Probe-versus-gallery matching.

use super::embedding::Embedding;

/// One stored encoding of an active employee.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub employee_id: String,
    pub embedding: Embedding,
    pub encoding_hash: String,
}

/// Result of comparing a probe against the gallery.
#[derive(Debug, Clone, Copy)]
pub struct MatchOutcome<'a> {
    /// Best entry whose similarity is above the tolerance.
    pub candidate: Option<&'a GalleryEntry>,

    /// Best similarity seen over the whole gallery, 0 when the gallery is empty.
    pub similarity: f32,
}

/// Find the closest gallery entry to `probe`.
///
/// An entry whose `encoding_hash` equals `probe_hash` holds the exact same
/// vector, so it wins with similarity 1 and no vector comparison happens.
/// Otherwise every entry is compared and the most similar one becomes the
/// candidate if its similarity is strictly above `tolerance`.
pub fn best_match<'a>(
    probe: &Embedding,
    probe_hash: &str,
    gallery: &'a [GalleryEntry],
    tolerance: f32,
) -> MatchOutcome<'a> {
    if let Some(exact) = gallery.iter().find(|e| e.encoding_hash == probe_hash) {
        return MatchOutcome {
            candidate: Some(exact),
            similarity: 1.0,
        };
    }

    let mut best: Option<(&GalleryEntry, f32)> = None;
    for entry in gallery {
        let similarity = probe.similarity(&entry.embedding);
        if best.is_none_or(|(_, s)| similarity > s) {
            best = Some((entry, similarity));
        }
    }

    match best {
        Some((entry, similarity)) => MatchOutcome {
            candidate: (similarity > tolerance).then_some(entry),
            similarity,
        },
        None => MatchOutcome {
            candidate: None,
            similarity: 0.0,
        },
    }
}
