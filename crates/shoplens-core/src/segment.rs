//! The closed set of shopper segments and the label returned for an image.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A shopper's inferred behavioural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    DealSeeker,
    ProductResearcher,
    DecisiveBuyer,
    SocialShopper,
    LostConfused,
    AssistanceNeeded,
    BrowsingCasually,
    ComparingProducts,
    OnAMission,
    WaitingIdle,
    CheckingOut,
}

impl Segment {
    /// All segments, in the order they are listed to the model.
    pub const ALL: [Segment; 11] = [
        Segment::DealSeeker,
        Segment::ProductResearcher,
        Segment::DecisiveBuyer,
        Segment::SocialShopper,
        Segment::LostConfused,
        Segment::AssistanceNeeded,
        Segment::BrowsingCasually,
        Segment::ComparingProducts,
        Segment::OnAMission,
        Segment::WaitingIdle,
        Segment::CheckingOut,
    ];

    /// The exact label string the model is asked to return.
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::DealSeeker => "Deal Seeker",
            Segment::ProductResearcher => "Product Researcher",
            Segment::DecisiveBuyer => "Decisive Buyer",
            Segment::SocialShopper => "Social Shopper",
            Segment::LostConfused => "Lost/Confused",
            Segment::AssistanceNeeded => "Assistance Needed",
            Segment::BrowsingCasually => "Browsing Casually",
            Segment::ComparingProducts => "Comparing Products",
            Segment::OnAMission => "On a Mission",
            Segment::WaitingIdle => "Waiting/Idle",
            Segment::CheckingOut => "Checking Out",
        }
    }

    /// One-line explanation shown next to a result.
    pub fn description(&self) -> &'static str {
        match self {
            Segment::DealSeeker => "Looking for discounts, offers, and the best price.",
            Segment::ProductResearcher => "Reading labels and specs before deciding.",
            Segment::DecisiveBuyer => "Knows what they want and buys quickly.",
            Segment::SocialShopper => "Shopping with friends or family, treating it as an outing.",
            Segment::LostConfused => "Unsure where to go or what to pick.",
            Segment::AssistanceNeeded => "Actively looking for a staff member to help.",
            Segment::BrowsingCasually => "Wandering without a specific goal.",
            Segment::ComparingProducts => "Weighing two or more items against each other.",
            Segment::OnAMission => "Moving fast toward a specific item.",
            Segment::WaitingIdle => "Waiting for someone or resting, not shopping right now.",
            Segment::CheckingOut => "At or heading to the till to pay.",
        }
    }

    /// Comma-separated label list, as embedded in the system instruction.
    pub fn taxonomy_list() -> String {
        Self::ALL
            .iter()
            .map(Segment::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = String;

    /// Exact label match first, then a lenient match that ignores case,
    /// surrounding punctuation, and separators (`"lost / confused."`).
    /// Used for user input; model output goes through `Label::from_model_output`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(seg) = Self::ALL.iter().find(|seg| seg.as_str() == trimmed) {
            return Ok(*seg);
        }
        let wanted = normalize(trimmed);
        Self::ALL
            .iter()
            .find(|seg| normalize(seg.as_str()) == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown segment: {s}"))
    }
}

// Serialized as the label string, not the variant name.
impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// The label returned for one image.
///
/// The model's text is validated against the closed segment set; anything
/// outside it is kept verbatim as `Unclassified` rather than shown as if it
/// were a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Known(Segment),
    Unclassified(String),
}

impl Label {
    /// Validate raw model output.
    ///
    /// Only an exact label is `Known`, so `as_str()` always returns `raw`
    /// unchanged. Near misses such as `"deal seeker"` stay `Unclassified`.
    pub fn from_model_output(raw: &str) -> Self {
        match Segment::ALL.iter().find(|seg| seg.as_str() == raw) {
            Some(segment) => Label::Known(*segment),
            None => Label::Unclassified(raw.to_string()),
        }
    }

    /// The model's text.
    pub fn as_str(&self) -> &str {
        match self {
            Label::Known(segment) => segment.as_str(),
            Label::Unclassified(raw) => raw,
        }
    }

    pub fn segment(&self) -> Option<Segment> {
        match self {
            Label::Known(segment) => Some(*segment),
            Label::Unclassified(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Label::Known(_))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
