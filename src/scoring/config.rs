use serde::{Deserialize, Serialize};

pub const DEFAULT_RULE_POINTS: i64 = 10;
pub const DEFAULT_INQUIRY_FILED_POINTS: i64 = 5;
pub const DEFAULT_GUILTY_PENALTY: i64 = 20;
pub const DEFAULT_GUINNESS_POINTS: i64 = 5;
pub const DEFAULT_JAMESON_POINTS: i64 = 5;
pub const DEFAULT_OTHER_DRINK_POINTS: i64 = 0;
pub const DEFAULT_DAILY_MVP_POINTS: i64 = 25;
pub const DEFAULT_QUOTE_OF_THE_TRIP_POINTS: i64 = 25;
pub const DEFAULT_PHOTO_POINTS: i64 = 2;
pub const DEFAULT_PHOTO_LIKE_POINTS: i64 = 1;

/// Points table for the leaderboard.
///
/// Every field is optional; a missing value falls back to the standard table.
/// Penalties are written as magnitudes and subtracted by the engine.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   rule: 10
///   inquiry_filed: 5
///   guilty_penalty: 20
///   drinks:
///     guinness: 5
///     jameson: 5
///     other: 0
///   daily_mvp: 25
///   quote_of_the_trip: 25
///   photo: 2
///   photo_like: 1
///   mvp_dedupe_per_voter: false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Awarded once to every participant who submitted a rule
    #[serde(default)]
    pub rule: Option<i64>,

    /// Awarded per inquiry filed
    #[serde(default)]
    pub inquiry_filed: Option<i64>,

    /// Subtracted per inquiry where the accused was voted guilty
    #[serde(default)]
    pub guilty_penalty: Option<i64>,

    /// Per-drink points by type
    #[serde(default)]
    pub drinks: Option<DrinkPoints>,

    /// Awarded per day won in the MVP vote
    #[serde(default)]
    pub daily_mvp: Option<i64>,

    /// Awarded to whoever submitted the most-voted quote
    #[serde(default)]
    pub quote_of_the_trip: Option<i64>,

    /// Awarded per photo uploaded
    #[serde(default)]
    pub photo: Option<i64>,

    /// Awarded per like received on uploaded photos
    #[serde(default)]
    pub photo_like: Option<i64>,

    /// Count only each voter's latest MVP vote per day (default: every vote counts)
    #[serde(default)]
    pub mvp_dedupe_per_voter: Option<bool>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rule: Some(DEFAULT_RULE_POINTS),
            inquiry_filed: Some(DEFAULT_INQUIRY_FILED_POINTS),
            guilty_penalty: Some(DEFAULT_GUILTY_PENALTY),
            drinks: Some(DrinkPoints::default()),
            daily_mvp: Some(DEFAULT_DAILY_MVP_POINTS),
            quote_of_the_trip: Some(DEFAULT_QUOTE_OF_THE_TRIP_POINTS),
            photo: Some(DEFAULT_PHOTO_POINTS),
            photo_like: Some(DEFAULT_PHOTO_LIKE_POINTS),
            mvp_dedupe_per_voter: Some(false),
        }
    }
}

/// Points per drink, by type.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DrinkPoints {
    #[serde(default)]
    pub guinness: Option<i64>,
    #[serde(default)]
    pub jameson: Option<i64>,
    #[serde(default)]
    pub other: Option<i64>,
}

impl Default for DrinkPoints {
    fn default() -> Self {
        Self {
            guinness: Some(DEFAULT_GUINNESS_POINTS),
            jameson: Some(DEFAULT_JAMESON_POINTS),
            other: Some(DEFAULT_OTHER_DRINK_POINTS),
        }
    }
}
