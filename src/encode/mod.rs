//! Encoders behind the pipeline's sink stage.
//!
//! The pipeline hands each encoder one frame per `process()` call, in timeline order.

/// `ffmpeg`-based video encoder (system binary, raw frames over stdin).
pub mod ffmpeg;
/// Still-image encoder backed by the `image` crate.
pub mod image_seq;
/// Encoder trait and the in-memory encoder.
pub mod sink;
