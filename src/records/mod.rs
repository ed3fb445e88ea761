pub mod lenient;
pub mod types;

pub use types::{
    Bet, BetResult, Drink, DrinkType, Inquiry, InquiryStatus, MvpVote, Photo, Quote, Rule,
    SideBet, SideBetResult,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight kinds of activity the trip tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Rule,
    Inquiry,
    Bet,
    Drink,
    SideBet,
    MvpVote,
    Quote,
    Photo,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActivityKind::Rule => "rule",
            ActivityKind::Inquiry => "inquiry",
            ActivityKind::Bet => "bet",
            ActivityKind::Drink => "drink",
            ActivityKind::SideBet => "side bet",
            ActivityKind::MvpVote => "MVP vote",
            ActivityKind::Quote => "quote",
            ActivityKind::Photo => "photo",
        };
        f.write_str(label)
    }
}

/// A record type with a home collection in [`TripRecords`].
pub trait Record: Clone {
    const KIND: ActivityKind;

    fn collection(records: &TripRecords) -> &[Self];
    fn collection_mut(records: &mut TripRecords) -> &mut Vec<Self>;
}

macro_rules! impl_record {
    ($ty:ty, $kind:expr, $field:ident) => {
        impl Record for $ty {
            const KIND: ActivityKind = $kind;

            fn collection(records: &TripRecords) -> &[Self] {
                &records.$field
            }

            fn collection_mut(records: &mut TripRecords) -> &mut Vec<Self> {
                &mut records.$field
            }
        }
    };
}

impl_record!(Rule, ActivityKind::Rule, rules);
impl_record!(Inquiry, ActivityKind::Inquiry, inquiries);
impl_record!(Bet, ActivityKind::Bet, bets);
impl_record!(Drink, ActivityKind::Drink, drinks);
impl_record!(SideBet, ActivityKind::SideBet, side_bets);
impl_record!(MvpVote, ActivityKind::MvpVote, mvp_votes);
impl_record!(Quote, ActivityKind::Quote, quotes);
impl_record!(Photo, ActivityKind::Photo, photos);

/// Every activity record of a trip, one collection per kind.
///
/// Row identity is position within its collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRecords {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub inquiries: Vec<Inquiry>,
    #[serde(default)]
    pub bets: Vec<Bet>,
    #[serde(default)]
    pub drinks: Vec<Drink>,
    #[serde(default)]
    pub side_bets: Vec<SideBet>,
    #[serde(default)]
    pub mvp_votes: Vec<MvpVote>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl TripRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in the collection for `kind`
    pub fn count(&self, kind: ActivityKind) -> usize {
        match kind {
            ActivityKind::Rule => self.rules.len(),
            ActivityKind::Inquiry => self.inquiries.len(),
            ActivityKind::Bet => self.bets.len(),
            ActivityKind::Drink => self.drinks.len(),
            ActivityKind::SideBet => self.side_bets.len(),
            ActivityKind::MvpVote => self.mvp_votes.len(),
            ActivityKind::Quote => self.quotes.len(),
            ActivityKind::Photo => self.photos.len(),
        }
    }

    /// Distinct rule authors in order of first submission. These are the only
    /// participants that appear on the leaderboard.
    pub fn participants(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for rule in &self.rules {
            if !seen.contains(&rule.author.as_str()) {
                seen.push(rule.author.as_str());
            }
        }
        seen
    }

    pub fn has_rule(&self, user: &str) -> bool {
        self.rules.iter().any(|r| r.author == user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_parses() {
        let records: TripRecords = serde_json::from_str("{}").unwrap();
        assert_eq!(records, TripRecords::new());
        assert_eq!(records.count(ActivityKind::Photo), 0);
    }

    #[test]
    fn test_participants_dedup_in_first_seen_order() {
        let records: TripRecords = serde_json::from_str(
            r#"{"rules": [
                {"author": "carl", "text": "one"},
                {"author": "alice", "text": "two"},
                {"author": "carl", "text": "three"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(records.participants(), vec!["carl", "alice"]);
        assert!(records.has_rule("alice"));
        assert!(!records.has_rule("bob"));
    }

    #[test]
    fn test_record_collection_lookup() {
        let mut records = TripRecords::new();
        Drink::collection_mut(&mut records).push(Drink {
            drinker: "alice".to_string(),
            pub_name: "The Oak".to_string(),
            drink_type: DrinkType::Guinness,
            timestamp: None,
        });
        assert_eq!(Drink::collection(&records).len(), 1);
        assert_eq!(Drink::KIND, ActivityKind::Drink);
        assert_eq!(records.count(ActivityKind::Drink), 1);
        assert_eq!(ActivityKind::SideBet.to_string(), "side bet");
    }
}
