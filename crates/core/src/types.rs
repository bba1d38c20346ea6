//! Core data types for the news-labeler system.

use crate::error::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Calendar day with no time of day and no offset.
pub type Day = NaiveDate;

/// Named numeric field of a daily price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl PriceField {
    /// All fields in canonical order.
    pub const ALL: [PriceField; 4] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
    ];

    /// Canonical column name.
    pub fn as_str(self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = Error;

    /// Case-insensitive match against the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            other => Err(Error::parse(format!("unknown price field '{other}'"))),
        }
    }
}

impl TryFrom<String> for PriceField {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PriceField> for String {
    fn from(field: PriceField) -> Self {
        field.as_str().to_string()
    }
}

/// One daily price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Trading day.
    pub date: Day,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
}

impl Observation {
    /// Read a named field.
    #[inline]
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
        }
    }
}

/// A news article tied to a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Article title, passed through to the output unchanged.
    pub title: String,
    /// Stock symbol; empty when the source row had none.
    pub symbol: String,
    /// Publication day (UTC).
    pub date: Day,
}

impl Event {
    pub fn new(title: impl Into<String>, symbol: impl Into<String>, date: Day) -> Self {
        Self {
            title: title.into(),
            symbol: symbol.into(),
            date,
        }
    }
}

/// Discretized direction of the move between anchor and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Label {
    /// Relative change at or below -threshold.
    Down = -1,
    /// Relative change strictly inside the threshold band.
    Flat = 0,
    /// Relative change at or above +threshold.
    Up = 1,
}

impl Label {
    /// Get the sign as i8.
    #[inline]
    pub fn sign(self) -> i8 {
        self as i8
    }
}

impl TryFrom<i8> for Label {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Label::Down),
            0 => Ok(Label::Flat),
            1 => Ok(Label::Up),
            other => Err(Error::parse(format!("invalid label {other}"))),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.sign())
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i8::deserialize(deserializer)?;
        Label::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Outcome of aligning one event against its symbol's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Article title of the source event.
    pub title: String,
    /// Symbol of the source event.
    pub symbol: String,
    /// Event day.
    pub event_date: Day,
    /// Index of the anchor observation.
    pub anchor_pos: usize,
    /// Index of the target observation.
    pub target_pos: usize,
    /// Day of the anchor observation.
    pub anchor_date: Day,
    /// Day of the target observation.
    pub target_date: Day,
    /// Reference value read at the anchor.
    pub anchor_value: f64,
    /// Reference value read at the target.
    pub target_value: f64,
    /// (target - anchor) / anchor.
    pub relative_change: f64,
    /// Discretized relative change.
    pub label: Label,
}

/// Output row: the event payload and its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    #[serde(rename = "Article_title")]
    pub title: String,
    #[serde(rename = "Label")]
    pub label: Label,
}

impl From<&AlignmentResult> for LabelRecord {
    fn from(result: &AlignmentResult) -> Self {
        Self {
            title: result.title.clone(),
            label: result.label,
        }
    }
}

/// A title followed by a fixed-width window of prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceWindow {
    pub title: String,
    pub values: Vec<f64>,
}

/// A normalized window, optionally scored for sentiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredWindow {
    pub title: String,
    /// Sentiment score in [-1, 1], once computed.
    pub sentiment: Option<f64>,
    /// Per-row z-scores of the window.
    pub zscores: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_field_parse_case_insensitive() {
        assert_eq!("open".parse::<PriceField>().unwrap(), PriceField::Open);
        assert_eq!("CLOSE".parse::<PriceField>().unwrap(), PriceField::Close);
        assert_eq!(" High ".parse::<PriceField>().unwrap(), PriceField::High);
        assert!("adj close".parse::<PriceField>().is_err());
    }

    #[test]
    fn test_observation_field() {
        let obs = Observation {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 1.0,
            high: 4.0,
            low: 0.5,
            close: 2.0,
        };
        assert_eq!(obs.field(PriceField::Open), 1.0);
        assert_eq!(obs.field(PriceField::High), 4.0);
        assert_eq!(obs.field(PriceField::Low), 0.5);
        assert_eq!(obs.field(PriceField::Close), 2.0);
    }

    #[test]
    fn test_label_sign() {
        assert_eq!(Label::Up.sign(), 1);
        assert_eq!(Label::Down.sign(), -1);
        assert_eq!(Label::Flat.sign(), 0);
        assert!(Label::try_from(2).is_err());
    }

    #[test]
    fn test_label_serializes_as_integer() {
        let record = LabelRecord {
            title: "Stocks rally".to_string(),
            label: Label::Down,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Article_title":"Stocks rally","Label":-1}"#);

        let back: LabelRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
