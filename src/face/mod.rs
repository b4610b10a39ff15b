//! Face sampling, embedding and matching.
//!
//! - `intake`: data URL → decoded image
//! - `engine`: image → quality verdict and [`Embedding`]
//! - `matcher`: embedding → best gallery candidate
//! - `pipeline`: the above, run on the blocking pool for handlers

pub mod embedding;
pub mod engine;
pub mod intake;
pub mod matcher;
pub mod pipeline;

pub use embedding::{Embedding, encoding_hash};
pub use engine::{FaceEngine, SampleEngine};
pub use matcher::GalleryEntry;
pub use pipeline::Analysis;
