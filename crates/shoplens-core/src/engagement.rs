//! Guess-the-segment scoring and the per-segment breakdown of a run.

use crate::segment::{Label, Segment};
use serde::Serialize;
use std::collections::BTreeMap;

/// How a user's guess compared with the model's label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuessOutcome {
    pub guessed: Segment,
    pub predicted: String,
    pub correct: bool,
}

impl GuessOutcome {
    /// Score a guess. An unclassified prediction never matches.
    pub fn score(guessed: Segment, predicted: &Label) -> Self {
        Self {
            guessed,
            predicted: predicted.as_str().to_string(),
            correct: predicted.segment() == Some(guessed),
        }
    }
}

/// One row of the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentShare {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

/// Counts of predicted labels over a run of classifications.
#[derive(Debug, Clone, Default)]
pub struct SegmentTally {
    known: BTreeMap<Segment, usize>,
    unclassified: usize,
    failed: usize,
    guesses: usize,
    correct_guesses: usize,
}

impl SegmentTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: &Label) {
        match label {
            Label::Known(segment) => *self.known.entry(*segment).or_insert(0) += 1,
            Label::Unclassified(_) => self.unclassified += 1,
        }
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn record_guess(&mut self, outcome: &GuessOutcome) {
        self.guesses += 1;
        if outcome.correct {
            self.correct_guesses += 1;
        }
    }

    /// Number of successful classifications.
    pub fn classified(&self) -> usize {
        self.known.values().sum::<usize>() + self.unclassified
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn count(&self, segment: Segment) -> usize {
        self.known.get(&segment).copied().unwrap_or(0)
    }

    /// `(correct, total)` guesses.
    pub fn guess_score(&self) -> (usize, usize) {
        (self.correct_guesses, self.guesses)
    }

    /// Share of each observed label among successful classifications,
    /// largest first, with "Unclassified" last.
    pub fn shares(&self) -> Vec<SegmentShare> {
        let total = self.classified();
        if total == 0 {
            return Vec::new();
        }
        let pct = |count: usize| count as f64 * 100.0 / total as f64;

        let mut shares: Vec<SegmentShare> = self
            .known
            .iter()
            .map(|(segment, &count)| SegmentShare {
                label: segment.as_str().to_string(),
                count,
                percent: pct(count),
            })
            .collect();
        // Stable sort keeps taxonomy order for ties.
        shares.sort_by(|a, b| b.count.cmp(&a.count));

        if self.unclassified > 0 {
            shares.push(SegmentShare {
                label: "Unclassified".to_string(),
                count: self.unclassified,
                percent: pct(self.unclassified),
            });
        }
        shares
    }
}
