// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock object-detector adapter.
//!
//! No production detector ships; this mock exercises the trait boundary
//! so callers can be tested without a vision model.

use async_trait::async_trait;

use reverie_core::types::{AdapterType, DetectionOutput, HealthStatus};
use reverie_core::{Adapter, ObjectDetector, ReverieError};

/// A mock detector that echoes the input image back annotated with a
/// fixed label set.
pub struct MockDetector {
    labels: Vec<String>,
}

impl MockDetector {
    pub fn new() -> Self {
        Self {
            labels: vec!["person".to_string()],
        }
    }

    /// Create a mock detector that reports the given labels.
    pub fn with_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

impl Default for MockDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockDetector {
    fn name(&self) -> &str {
        "mock-detector"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Detector
    }

    async fn health_check(&self) -> Result<HealthStatus, ReverieError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ObjectDetector for MockDetector {
    async fn detect(&self, image: Vec<u8>) -> Result<DetectionOutput, ReverieError> {
        if image.is_empty() {
            return Err(ReverieError::Internal("empty image".to_string()));
        }
        Ok(DetectionOutput {
            annotated_image: image,
            labels: self.labels.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn detector_echoes_image_with_labels() {
        let detector = MockDetector::with_labels(vec!["cat".to_string(), "dog".to_string()]);
        let output = detector.detect(vec![1, 2, 3]).await.unwrap();
        assert_eq!(output.annotated_image, vec![1, 2, 3]);
        assert_eq!(output.labels, vec!["cat", "dog"]);
    }

    #[tokio::test]
    async fn detector_rejects_empty_input() {
        let detector = MockDetector::new();
        assert!(detector.detect(Vec::new()).await.is_err());
    }
}
