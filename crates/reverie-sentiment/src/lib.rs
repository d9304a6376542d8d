// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexicon-based sentiment classifier.
//!
//! A deliberately small word-list model: no network, no weights, always
//! available. It tags each user message so the shell can color the reply
//! header, and it doubles as the always-on fallback when richer sentiment
//! backends are not deployed.

use async_trait::async_trait;

use reverie_core::types::{AdapterType, HealthStatus, Sentiment, SentimentLabel};
use reverie_core::{Adapter, ReverieError, SentimentClassifier};

const POSITIVE_WORDS: &[&str] = &["great", "good", "awesome", "happy", "love", "excellent"];
const NEGATIVE_WORDS: &[&str] = &["bad", "sad", "angry", "hate", "terrible", "upset"];

/// Confidence reported when a lexicon word is matched.
const MATCH_SCORE: f32 = 0.55;
/// Confidence reported for non-blank text with no lexicon match.
const NO_MATCH_SCORE: f32 = 0.50;

/// Word-list sentiment classifier.
///
/// Case-insensitive substring match against two small lexicons; positive
/// wins when both match. Blank input is NEUTRAL with zero confidence.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    fn classify_text(text: &str) -> Sentiment {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Sentiment {
                label: SentimentLabel::Neutral,
                score: 0.0,
            };
        }

        let lowered = trimmed.to_lowercase();
        if POSITIVE_WORDS.iter().any(|w| lowered.contains(w)) {
            Sentiment {
                label: SentimentLabel::Positive,
                score: MATCH_SCORE,
            }
        } else if NEGATIVE_WORDS.iter().any(|w| lowered.contains(w)) {
            Sentiment {
                label: SentimentLabel::Negative,
                score: MATCH_SCORE,
            }
        } else {
            Sentiment {
                label: SentimentLabel::Neutral,
                score: NO_MATCH_SCORE,
            }
        }
    }
}

#[async_trait]
impl Adapter for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon-sentiment"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Sentiment
    }

    async fn health_check(&self) -> Result<HealthStatus, ReverieError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment, ReverieError> {
        Ok(Self::classify_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_word_matches() {
        let s = LexiconClassifier::classify_text("this is a great day");
        assert_eq!(s.label, SentimentLabel::Positive);
        assert_eq!(s.score, 0.55);
    }

    #[test]
    fn negative_word_matches() {
        let s = LexiconClassifier::classify_text("what a terrible mess");
        assert_eq!(s.label, SentimentLabel::Negative);
        assert_eq!(s.score, 0.55);
    }

    #[test]
    fn match_is_case_insensitive() {
        let s = LexiconClassifier::classify_text("I LOVE this");
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn positive_wins_when_both_lexicons_match() {
        let s = LexiconClassifier::classify_text("good news about the bad weather");
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn no_match_is_neutral_with_half_confidence() {
        let s = LexiconClassifier::classify_text("the meeting starts at noon");
        assert_eq!(s.label, SentimentLabel::Neutral);
        assert_eq!(s.score, 0.50);
    }

    #[test]
    fn blank_input_is_neutral_with_zero_confidence() {
        for text in ["", "   ", "\n\t"] {
            let s = LexiconClassifier::classify_text(text);
            assert_eq!(s.label, SentimentLabel::Neutral);
            assert_eq!(s.score, 0.0);
        }
    }

    #[tokio::test]
    async fn trait_surface_reports_healthy() {
        let classifier = LexiconClassifier::new();
        assert_eq!(classifier.name(), "lexicon-sentiment");
        assert_eq!(classifier.adapter_type(), AdapterType::Sentiment);
        assert_eq!(
            classifier.health_check().await.unwrap(),
            HealthStatus::Healthy
        );
        let s = classifier.classify("awesome").await.unwrap();
        assert_eq!(s.label, SentimentLabel::Positive);
    }
}
