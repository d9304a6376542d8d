// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opaque classifier capability traits: sentiment, speech-to-text,
//! and image object detection.
//!
//! These model external ML collaborators as narrow interfaces; the core's
//! contracts never depend on their internals.

use async_trait::async_trait;

use crate::error::ReverieError;
use crate::traits::adapter::Adapter;
use crate::types::{DetectionOutput, Sentiment};

/// Capability for tagging a text prompt with a sentiment label.
#[async_trait]
pub trait SentimentClassifier: Adapter {
    /// Classifies the given text and returns a label with confidence.
    ///
    /// Blank input must yield a neutral result rather than an error.
    async fn classify(&self, text: &str) -> Result<Sentiment, ReverieError>;
}

/// Capability for transcribing recorded audio to text.
#[async_trait]
pub trait Transcriber: Adapter {
    /// Transcribes the given audio bytes and returns the recognized text.
    ///
    /// `file_name` carries the original name so the backend can infer the
    /// container format (e.g. `clip.wav`).
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str) -> Result<String, ReverieError>;
}

/// Capability for detecting objects in an image.
#[async_trait]
pub trait ObjectDetector: Adapter {
    /// Detects objects in the encoded image, returning an annotated copy
    /// and one label per detection.
    async fn detect(&self, image: Vec<u8>) -> Result<DetectionOutput, ReverieError>;
}
