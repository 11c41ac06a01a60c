//! The per-image record emitted by the CLI.

use crate::asset::ImageFormat;
use crate::classifier::Classification;
use crate::engagement::GuessOutcome;
use crate::error::ClassificationError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Outcome of segmenting one image file, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Path to the source file
    pub file_path: PathBuf,

    /// Just the filename portion
    pub file_name: String,

    /// Sniffed format ("jpeg", "png", "unknown")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,

    /// Label text: a segment name or the model's raw text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Whether `label` is one of the known segments
    pub known: bool,

    /// Explanation of the segment, when known and engagement is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Model that produced the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Round-trip latency in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    /// The user's guess and whether it matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess: Option<GuessOutcomeRecord>,

    /// Error kind and message when classification failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessOutcomeRecord {
    pub guessed: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: String,
    pub message: String,
}

impl SegmentRecord {
    fn base(path: &Path) -> Self {
        Self {
            file_path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            format: None,
            label: None,
            known: false,
            description: None,
            model: None,
            latency_ms: None,
            guess: None,
            error: None,
        }
    }

    /// Record a successful classification.
    pub fn success(
        path: &Path,
        format: ImageFormat,
        result: &Classification,
        with_description: bool,
    ) -> Self {
        let segment = result.label.segment();
        Self {
            format: Some(format),
            label: Some(result.label.as_str().to_string()),
            known: segment.is_some(),
            description: segment
                .filter(|_| with_description)
                .map(|s| s.description().to_string()),
            model: Some(result.model.clone()),
            latency_ms: Some(result.latency_ms),
            ..Self::base(path)
        }
    }

    /// Record a failed classification.
    pub fn failure(path: &Path, format: Option<ImageFormat>, error: &ClassificationError) -> Self {
        Self {
            format,
            error: Some(ErrorRecord {
                kind: error.kind().to_string(),
                message: error.to_string(),
            }),
            ..Self::base(path)
        }
    }

    pub fn with_guess(mut self, outcome: &GuessOutcome) -> Self {
        self.guess = Some(GuessOutcomeRecord {
            guessed: outcome.guessed.as_str().to_string(),
            correct: outcome.correct,
        });
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{Label, Segment};

    fn classification(label: Label) -> Classification {
        Classification {
            raw: label.as_str().to_string(),
            label,
            model: "meta-llama/llama-4-maverick:free".to_string(),
            latency_ms: 812,
        }
    }

    #[test]
    fn test_success_record() {
        let result = classification(Label::Known(Segment::DealSeeker));
        let record =
            SegmentRecord::success(Path::new("/shop/cam1.jpg"), ImageFormat::Jpeg, &result, true);

        assert_eq!(record.file_name, "cam1.jpg");
        assert_eq!(record.label.as_deref(), Some("Deal Seeker"));
        assert!(record.known);
        assert!(record.description.is_some());
        assert!(record.is_success());
    }

    #[test]
    fn test_success_record_without_engagement_has_no_description() {
        let result = classification(Label::Known(Segment::DealSeeker));
        let record =
            SegmentRecord::success(Path::new("cam1.jpg"), ImageFormat::Jpeg, &result, false);
        assert!(record.description.is_none());
    }

    #[test]
    fn test_unclassified_record() {
        let result = classification(Label::Unclassified("A person".to_string()));
        let record = SegmentRecord::success(Path::new("x.png"), ImageFormat::Png, &result, true);
        assert!(!record.known);
        assert!(record.description.is_none());
        assert_eq!(record.label.as_deref(), Some("A person"));
    }

    #[test]
    fn test_failure_record_json() {
        let err = ClassificationError::Remote {
            status: 429,
            body: "rate limited".to_string(),
        };
        let record = SegmentRecord::failure(Path::new("x.jpg"), Some(ImageFormat::Jpeg), &err);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["error"]["kind"], "remote_error");
        assert!(json["error"]["message"].as_str().unwrap().contains("429"));
        assert!(json.get("label").is_none());
        assert_eq!(json["format"], "jpeg");
    }
}
