use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::lenient::{self, FromLabel};

/// A Steward's Rule. Submitting one is what puts a participant on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(alias = "user_id")]
    pub author: String,
    #[serde(default, alias = "rule")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InquiryStatus {
    #[default]
    Open,
    Closed,
}

impl FromLabel for InquiryStatus {
    fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("closed") {
            InquiryStatus::Closed
        } else {
            InquiryStatus::Open
        }
    }
}

/// A Steward's Inquiry: one participant accusing another of breaking a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub reporter: String,
    pub accused: String,
    #[serde(default, alias = "rule_violated")]
    pub rule_text: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub guilty_votes: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub innocent_votes: u32,
    #[serde(default, deserialize_with = "lenient::label")]
    pub status: InquiryStatus,
    #[serde(default, deserialize_with = "lenient::name_list")]
    pub voters: Vec<String>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Inquiry {
    /// Guilt is decided by the vote counts alone, whatever the status.
    pub fn is_guilty(&self) -> bool {
        self.guilty_votes > self.innocent_votes
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BetResult {
    #[default]
    Pending,
    Win,
    Loss,
}

impl FromLabel for BetResult {
    fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "WIN" | "WON" => BetResult::Win,
            "LOSS" | "LOST" => BetResult::Loss,
            _ => BetResult::Pending,
        }
    }
}

/// A race bet with fractional odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    #[serde(alias = "user_id")]
    pub bettor: String,
    #[serde(default, alias = "race_num", deserialize_with = "lenient::count")]
    pub race: u32,
    #[serde(default)]
    pub horse: String,
    #[serde(default, deserialize_with = "lenient::money")]
    pub stake: f64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub odds_num: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub odds_den: u32,
    #[serde(default, deserialize_with = "lenient::label")]
    pub result: BetResult,
    #[serde(default, deserialize_with = "lenient::money")]
    pub payout: f64,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Bet {
    /// Return on a winning bet, stake included, rounded to cents.
    ///
    /// A zero denominator (only possible in hand-edited data) is read as 1.
    pub fn winning_payout(&self) -> f64 {
        let den = self.odds_den.max(1) as f64;
        let payout = self.stake * (self.odds_num as f64 / den + 1.0);
        (payout * 100.0).round() / 100.0
    }

    pub fn odds(&self) -> String {
        format!("{}/{}", self.odds_num, self.odds_den)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrinkType {
    #[default]
    Guinness,
    Jameson,
    Other,
}

impl FromLabel for DrinkType {
    fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("guinness") {
            DrinkType::Guinness
        } else if label.eq_ignore_ascii_case("jameson") {
            DrinkType::Jameson
        } else {
            DrinkType::Other
        }
    }
}

impl std::fmt::Display for DrinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DrinkType::Guinness => "Guinness",
            DrinkType::Jameson => "Jameson",
            DrinkType::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A logged drink. Rows from before drink types existed are Guinness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    #[serde(alias = "user_id")]
    pub drinker: String,
    #[serde(default, rename = "pub")]
    pub pub_name: String,
    #[serde(default, deserialize_with = "lenient::label")]
    pub drink_type: DrinkType,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Outcome of a side bet, from the creator's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SideBetResult {
    #[default]
    Open,
    /// Creator won.
    Win,
    /// Taker won.
    Loss,
}

impl FromLabel for SideBetResult {
    fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "WIN" | "WON" => SideBetResult::Win,
            "LOSS" | "LOST" => SideBetResult::Loss,
            _ => SideBetResult::Open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideBet {
    pub creator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taker: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::money")]
    pub stake: f64,
    #[serde(default, deserialize_with = "lenient::label")]
    pub result: SideBetResult,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl SideBet {
    pub fn has_taker(&self, user: &str) -> bool {
        self.taker.as_deref() == Some(user)
    }
}

/// One vote for the daily MVP. Voters may vote again; see
/// [`crate::scoring::current_mvp_vote`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MvpVote {
    pub voter: String,
    pub nominee: String,
    #[serde(default, deserialize_with = "lenient::day", skip_serializing_if = "Option::is_none")]
    pub day: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub submitter: String,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub votes: u32,
    #[serde(default, deserialize_with = "lenient::name_list")]
    pub voters: Vec<String>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub uploader: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub likes: u32,
    #[serde(default, alias = "liked_by", deserialize_with = "lenient::name_list")]
    pub likers: Vec<String>,
    #[serde(default, deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}
