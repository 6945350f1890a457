//! Iteration labels - ordinal names for cumulative corpora

use serde::{Deserialize, Serialize};
use std::fmt;

/// How iteration labels are rendered
///
/// - Numeric: 1, 2, 3, ...
/// - Alphabetic: A, B, ..., Z, AA, AB, ... (spreadsheet-style, never runs out)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// Decimal ordinals starting at 1
    #[default]
    Numeric,

    /// Bijective base-26 letters starting at A
    Alphabetic,
}

impl LabelStyle {
    /// Get the style name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelStyle::Numeric => "numeric",
            LabelStyle::Alphabetic => "alphabetic",
        }
    }
}

impl std::str::FromStr for LabelStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" => Ok(LabelStyle::Numeric),
            "alphabetic" | "letters" => Ok(LabelStyle::Alphabetic),
            _ => Err(format!("Invalid label style: {}", s)),
        }
    }
}

/// Label of one iteration of the convergence loop
///
/// The ordinal is 1-based: iteration 1 is the corpus holding only the most
/// significant document. Labels order by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IterationLabel {
    ordinal: u32,
    style: LabelStyle,
}

impl IterationLabel {
    /// Create a label for a 1-based ordinal
    ///
    /// An ordinal of 0 is bumped to 1.
    pub fn new(ordinal: u32, style: LabelStyle) -> Self {
        Self {
            ordinal: ordinal.max(1),
            style,
        }
    }

    /// Numeric label shorthand
    pub fn numeric(ordinal: u32) -> Self {
        Self::new(ordinal, LabelStyle::Numeric)
    }

    /// The 1-based ordinal
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// The rendering style
    pub fn style(&self) -> LabelStyle {
        self.style
    }

    /// The label that follows this one, in the same style
    pub fn next(&self) -> Self {
        Self::new(self.ordinal.saturating_add(1), self.style)
    }

    /// Parse a label from its rendered form ("3" or "C")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            let ordinal: u32 = s.parse().ok()?;
            if ordinal == 0 {
                return None;
            }
            return Some(Self::numeric(ordinal));
        }
        if s.chars().all(|c| c.is_ascii_uppercase()) {
            let mut ordinal: u32 = 0;
            for c in s.chars() {
                ordinal = ordinal
                    .checked_mul(26)?
                    .checked_add(c as u32 - 'A' as u32 + 1)?;
            }
            return Some(Self::new(ordinal, LabelStyle::Alphabetic));
        }
        None
    }
}

fn letters(mut ordinal: u32) -> String {
    let mut out = Vec::new();
    while ordinal > 0 {
        let rem = (ordinal - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        ordinal = (ordinal - 1) / 26;
    }
    out.iter().rev().collect()
}

impl fmt::Display for IterationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            LabelStyle::Numeric => write!(f, "{}", self.ordinal),
            LabelStyle::Alphabetic => write!(f, "{}", letters(self.ordinal)),
        }
    }
}

impl From<IterationLabel> for String {
    fn from(label: IterationLabel) -> Self {
        label.to_string()
    }
}

impl TryFrom<String> for IterationLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("Invalid iteration label: {}", value))
    }
}
