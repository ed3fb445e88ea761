use serde::Serialize;

use super::awards::{daily_mvp_winners, quote_of_the_trip, DailyMvp};
use super::config::*;
use crate::records::{BetResult, DrinkType, SideBetResult, TripRecords};

/// One line of a participant's receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// What earned or cost the points, e.g. "The Oak (Guinness)"
    pub label: String,
    pub points: i64,
}

/// A participant's total and the entries that sum to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserScore {
    pub user: String,
    pub score: i64,
    pub ledger: Vec<LedgerEntry>,
}

/// Points table with every default filled in.
struct Points {
    rule: i64,
    inquiry_filed: i64,
    guilty_penalty: i64,
    guinness: i64,
    jameson: i64,
    other_drink: i64,
    daily_mvp: i64,
    quote_of_the_trip: i64,
    photo: i64,
    photo_like: i64,
    mvp_dedupe_per_voter: bool,
}

impl Points {
    fn from_config(config: &ScoringConfig) -> Self {
        let drinks = config.drinks.clone().unwrap_or_default();
        Self {
            rule: config.rule.unwrap_or(DEFAULT_RULE_POINTS),
            inquiry_filed: config.inquiry_filed.unwrap_or(DEFAULT_INQUIRY_FILED_POINTS),
            guilty_penalty: config.guilty_penalty.unwrap_or(DEFAULT_GUILTY_PENALTY),
            guinness: drinks.guinness.unwrap_or(DEFAULT_GUINNESS_POINTS),
            jameson: drinks.jameson.unwrap_or(DEFAULT_JAMESON_POINTS),
            other_drink: drinks.other.unwrap_or(DEFAULT_OTHER_DRINK_POINTS),
            daily_mvp: config.daily_mvp.unwrap_or(DEFAULT_DAILY_MVP_POINTS),
            quote_of_the_trip: config
                .quote_of_the_trip
                .unwrap_or(DEFAULT_QUOTE_OF_THE_TRIP_POINTS),
            photo: config.photo.unwrap_or(DEFAULT_PHOTO_POINTS),
            photo_like: config.photo_like.unwrap_or(DEFAULT_PHOTO_LIKE_POINTS),
            mvp_dedupe_per_voter: config.mvp_dedupe_per_voter.unwrap_or(false),
        }
    }

    fn drink(&self, drink_type: DrinkType) -> i64 {
        match drink_type {
            DrinkType::Guinness => self.guinness,
            DrinkType::Jameson => self.jameson,
            DrinkType::Other => self.other_drink,
        }
    }
}

/// Running total plus receipt for one participant.
struct Receipt {
    score: i64,
    ledger: Vec<LedgerEntry>,
}

impl Receipt {
    fn new() -> Self {
        Self {
            score: 0,
            ledger: Vec::new(),
        }
    }

    /// Record a contribution; zero contributions leave no line.
    fn add(&mut self, label: String, points: i64) {
        if points != 0 {
            self.always(label, points);
        }
    }

    /// Record a contribution even when it is zero (fixed and one-time awards).
    fn always(&mut self, label: String, points: i64) {
        self.score = self.score.saturating_add(points);
        self.ledger.push(LedgerEntry { label, points });
    }
}

/// Whole euros in a cash amount, rounded to cents first so float noise
/// (9.999999) does not cost a euro.
fn whole_euros(amount: f64) -> i64 {
    cents(amount) / 100
}

fn cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Score every participant and rank them, highest first.
///
/// Participants are the distinct rule authors; activity by anyone else is
/// ignored. Equal scores keep the order in which the participants submitted
/// their rules. Pure: the same records always give the same board.
pub fn calculate_leaderboard(records: &TripRecords, config: &ScoringConfig) -> Vec<UserScore> {
    let points = Points::from_config(config);
    let mvps = daily_mvp_winners(&records.mvp_votes, points.mvp_dedupe_per_voter);
    let quote_winner = quote_of_the_trip(&records.quotes).map(|q| q.submitter.as_str());

    let mut board: Vec<UserScore> = records
        .participants()
        .into_iter()
        .map(|user| score_user(user, records, &points, &mvps, quote_winner))
        .collect();

    // Stable sort: ties stay in participant order
    board.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        participants = board.len(),
        mvp_days = mvps.len(),
        quote_winner = quote_winner.unwrap_or("-"),
        "leaderboard calculated"
    );

    board
}

fn score_user(
    user: &str,
    records: &TripRecords,
    points: &Points,
    mvps: &[DailyMvp],
    quote_winner: Option<&str>,
) -> UserScore {
    let mut receipt = Receipt::new();

    // Only participants get here, so the rule award always applies
    receipt.always("Rule".to_string(), points.rule);

    for drink in records.drinks.iter().filter(|d| d.drinker == user) {
        receipt.add(
            format!("{} ({})", drink.pub_name, drink.drink_type),
            points.drink(drink.drink_type),
        );
    }

    for bet in records.bets.iter().filter(|b| b.bettor == user) {
        match bet.result {
            BetResult::Win => {
                let profit = cents(bet.payout).saturating_sub(cents(bet.stake)) / 100;
                receipt.add(
                    format!("Race {}: {} @ {}", bet.race, bet.horse, bet.odds()),
                    profit,
                );
            }
            BetResult::Loss => {
                receipt.add(
                    format!("Race {}: {} (lost)", bet.race, bet.horse),
                    whole_euros(bet.stake).saturating_neg(),
                );
            }
            BetResult::Pending => {}
        }
    }

    for inquiry in records.inquiries.iter().filter(|i| i.reporter == user) {
        receipt.add(
            format!("Inquiry filed vs {}", inquiry.accused),
            points.inquiry_filed,
        );
    }

    for inquiry in records
        .inquiries
        .iter()
        .filter(|i| i.accused == user && i.is_guilty())
    {
        receipt.add(
            format!("Found guilty: {}", inquiry.rule_text),
            points.guilty_penalty.saturating_neg(),
        );
    }

    for side_bet in &records.side_bets {
        let is_creator = side_bet.creator == user;
        let is_taker = side_bet.has_taker(user);
        let won = match side_bet.result {
            SideBetResult::Win if is_creator => Some(true),
            SideBetResult::Loss if is_taker => Some(true),
            SideBetResult::Loss if is_creator => Some(false),
            SideBetResult::Win if is_taker => Some(false),
            _ => None,
        };
        let stake = whole_euros(side_bet.stake);
        match won {
            Some(true) => receipt.add(format!("Side bet won: {}", side_bet.description), stake),
            Some(false) => receipt.add(
                format!("Side bet lost: {}", side_bet.description),
                stake.saturating_neg(),
            ),
            None => {}
        }
    }

    for mvp in mvps.iter().filter(|m| m.winner == user) {
        receipt.always(format!("Daily MVP ({})", mvp.day), points.daily_mvp);
    }

    if quote_winner == Some(user) {
        receipt.always("Quote of the Trip".to_string(), points.quote_of_the_trip);
    }

    let photos: Vec<_> = records.photos.iter().filter(|p| p.uploader == user).collect();
    if !photos.is_empty() {
        receipt.add(
            format!("Photos ({})", photos.len()),
            (photos.len() as i64).saturating_mul(points.photo),
        );
        let likes: i64 = photos.iter().map(|p| p.likes as i64).sum();
        receipt.add(
            format!("Photo likes ({})", likes),
            likes.saturating_mul(points.photo_like),
        );
    }

    UserScore {
        user: user.to_string(),
        score: receipt.score,
        ledger: receipt.ledger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::*;
    use chrono::NaiveDate;

    fn rule(author: &str) -> Rule {
        Rule {
            author: author.to_string(),
            text: format!("{}'s rule about pints", author),
            timestamp: None,
        }
    }

    fn drink(drinker: &str, pub_name: &str, drink_type: DrinkType) -> Drink {
        Drink {
            drinker: drinker.to_string(),
            pub_name: pub_name.to_string(),
            drink_type,
            timestamp: None,
        }
    }

    fn bet(bettor: &str, stake: f64, result: BetResult, payout: f64) -> Bet {
        Bet {
            bettor: bettor.to_string(),
            race: 3,
            horse: "Lucky Charm".to_string(),
            stake,
            odds_num: 5,
            odds_den: 1,
            result,
            payout,
            timestamp: None,
        }
    }

    fn inquiry(reporter: &str, accused: &str, guilty: u32, innocent: u32) -> Inquiry {
        Inquiry {
            reporter: reporter.to_string(),
            accused: accused.to_string(),
            rule_text: "No phones at the table".to_string(),
            evidence: "Seen scrolling".to_string(),
            guilty_votes: guilty,
            innocent_votes: innocent,
            status: InquiryStatus::Open,
            voters: vec![],
            timestamp: None,
        }
    }

    fn side_bet(creator: &str, taker: &str, stake: f64, result: SideBetResult) -> SideBet {
        SideBet {
            creator: creator.to_string(),
            taker: Some(taker.to_string()),
            description: "First to fall asleep".to_string(),
            stake,
            result,
            timestamp: None,
        }
    }

    fn mvp_vote(voter: &str, nominee: &str, day: &str) -> MvpVote {
        MvpVote {
            voter: voter.to_string(),
            nominee: nominee.to_string(),
            day: NaiveDate::parse_from_str(day, "%Y-%m-%d").ok(),
            timestamp: None,
        }
    }

    fn quote(submitter: &str, votes: u32) -> Quote {
        Quote {
            submitter: submitter.to_string(),
            speaker: "someone".to_string(),
            text: "Just the one".to_string(),
            votes,
            voters: vec![],
            timestamp: None,
        }
    }

    fn photo(uploader: &str, likes: u32) -> Photo {
        Photo {
            uploader: uploader.to_string(),
            caption: "Paddock".to_string(),
            url: "https://example.com/p.jpg".to_string(),
            likes,
            likers: vec![],
            timestamp: None,
        }
    }

    fn board(records: &TripRecords) -> Vec<UserScore> {
        calculate_leaderboard(records, &ScoringConfig::default())
    }

    fn find<'a>(board: &'a [UserScore], user: &str) -> &'a UserScore {
        board.iter().find(|s| s.user == user).unwrap()
    }

    fn entry(label: &str, points: i64) -> LedgerEntry {
        LedgerEntry {
            label: label.to_string(),
            points,
        }
    }

    #[test]
    fn test_rule_and_guinness() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Alice"));
        records.drinks.push(drink("Alice", "The Oak", DrinkType::Guinness));

        let result = board(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].score, 15);
        assert_eq!(
            result[0].ledger,
            vec![entry("Rule", 10), entry("The Oak (Guinness)", 5)]
        );
    }

    #[test]
    fn test_other_drink_leaves_no_line() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Alice"));
        records.drinks.push(drink("Alice", "The Oak", DrinkType::Other));
        records.drinks.push(drink("Alice", "Kehoe's", DrinkType::Jameson));

        let result = board(&records);
        assert_eq!(result[0].score, 15);
        assert_eq!(
            result[0].ledger,
            vec![entry("Rule", 10), entry("Kehoe's (Jameson)", 5)]
        );
    }

    #[test]
    fn test_winning_bet_profit() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Bob"));
        records.bets.push(bet("Bob", 10.0, BetResult::Win, 60.0));

        let result = board(&records);
        assert_eq!(result[0].score, 60);
        assert_eq!(result[0].ledger[1], entry("Race 3: Lucky Charm @ 5/1", 50));
    }

    #[test]
    fn test_bet_profit_truncates() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Bob"));
        // 7 @ 2/3 settles at 11.67 -> profit 4.67 -> 4
        records.bets.push(bet("Bob", 7.0, BetResult::Win, 11.67));
        // lost 2.5 -> -2
        records.bets.push(bet("Bob", 2.5, BetResult::Loss, 0.0));
        // pending contributes nothing
        records.bets.push(bet("Bob", 100.0, BetResult::Pending, 0.0));

        let result = board(&records);
        assert_eq!(result[0].score, 10 + 4 - 2);
        assert_eq!(result[0].ledger.len(), 3);
        assert_eq!(result[0].ledger[2], entry("Race 3: Lucky Charm (lost)", -2));
    }

    #[test]
    fn test_profit_survives_float_noise() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Bob"));
        // 13.2 - 4.2 is 8.999999999999998 in floating point
        records.bets.push(bet("Bob", 4.2, BetResult::Win, 13.2));

        let result = board(&records);
        assert_eq!(result[0].ledger[1].points, 9);
    }

    #[test]
    fn test_side_bet_taker_wins() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Carl"));
        records.rules.push(rule("Dot"));
        records
            .side_bets
            .push(side_bet("Carl", "Dot", 20.0, SideBetResult::Loss));

        let result = board(&records);
        assert_eq!(find(&result, "Carl").score, 10 - 20);
        assert_eq!(find(&result, "Dot").score, 10 + 20);
        assert_eq!(
            find(&result, "Dot").ledger[1],
            entry("Side bet won: First to fall asleep", 20)
        );
        assert_eq!(
            find(&result, "Carl").ledger[1],
            entry("Side bet lost: First to fall asleep", -20)
        );
    }

    #[test]
    fn test_side_bet_creator_wins_and_open_ignored() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Carl"));
        records.rules.push(rule("Dot"));
        records
            .side_bets
            .push(side_bet("Carl", "Dot", 15.0, SideBetResult::Win));
        records
            .side_bets
            .push(side_bet("Carl", "Dot", 50.0, SideBetResult::Open));

        let result = board(&records);
        assert_eq!(find(&result, "Carl").score, 25);
        assert_eq!(find(&result, "Dot").score, -5);
    }

    #[test]
    fn test_inquiries_filed_and_guilty() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Alice"));
        records.rules.push(rule("Bob"));
        records.inquiries.push(inquiry("Alice", "Bob", 3, 1));
        records.inquiries.push(inquiry("Alice", "Bob", 1, 1)); // tie: not guilty

        let result = board(&records);
        let alice = find(&result, "Alice");
        assert_eq!(alice.score, 20);
        assert_eq!(alice.ledger[1], entry("Inquiry filed vs Bob", 5));

        let bob = find(&result, "Bob");
        assert_eq!(bob.score, -10);
        assert_eq!(bob.ledger, vec![entry("Rule", 10), entry("Found guilty: No phones at the table", -20)]);
    }

    #[test]
    fn test_daily_mvp_counts_duplicate_votes() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Eve"));
        records.rules.push(rule("Finn"));
        records.mvp_votes.push(mvp_vote("Alice", "Eve", "2025-06-01"));
        records.mvp_votes.push(mvp_vote("Alice", "Eve", "2025-06-01"));
        records.mvp_votes.push(mvp_vote("Bob", "Finn", "2025-06-01"));

        let result = board(&records);
        let eve = find(&result, "Eve");
        assert_eq!(eve.score, 35);
        assert_eq!(eve.ledger[1], entry("Daily MVP (2025-06-01)", 25));
        assert_eq!(find(&result, "Finn").score, 10);
    }

    #[test]
    fn test_daily_mvp_dedupe_option() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Eve"));
        records.rules.push(rule("Finn"));
        records.mvp_votes.push(mvp_vote("Alice", "Eve", "2025-06-01"));
        records.mvp_votes.push(mvp_vote("Alice", "Eve", "2025-06-01"));
        records.mvp_votes.push(mvp_vote("Bob", "Finn", "2025-06-01"));

        let config = ScoringConfig {
            mvp_dedupe_per_voter: Some(true),
            ..ScoringConfig::default()
        };
        let result = calculate_leaderboard(&records, &config);
        // One counted vote each: first nominee encountered takes the tie
        assert_eq!(find(&result, "Eve").score, 35);
        assert_eq!(find(&result, "Finn").score, 10);
    }

    #[test]
    fn test_quote_of_the_trip_only_top_submitter() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Xan"));
        records.rules.push(rule("Yve"));
        records.rules.push(rule("Zed"));
        records.quotes.push(quote("Xan", 3));
        records.quotes.push(quote("Yve", 1));
        records.quotes.push(quote("Zed", 0));

        let result = board(&records);
        assert_eq!(find(&result, "Xan").score, 35);
        assert_eq!(find(&result, "Xan").ledger[1], entry("Quote of the Trip", 25));
        assert_eq!(find(&result, "Yve").score, 10);
        assert_eq!(find(&result, "Zed").score, 10);
    }

    #[test]
    fn test_photos_aggregate() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Pat"));
        records.photos.push(photo("Pat", 3));
        records.photos.push(photo("Pat", 4));
        records.photos.push(photo("Pat", 0));

        let result = board(&records);
        assert_eq!(result[0].score, 10 + 6 + 7);
        assert_eq!(
            result[0].ledger,
            vec![
                entry("Rule", 10),
                entry("Photos (3)", 6),
                entry("Photo likes (7)", 7)
            ]
        );
    }

    #[test]
    fn test_photo_without_likes_has_no_like_line() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Pat"));
        records.photos.push(photo("Pat", 0));

        let result = board(&records);
        assert_eq!(result[0].ledger, vec![entry("Rule", 10), entry("Photos (1)", 2)]);
    }

    #[test]
    fn test_non_participants_excluded() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Alice"));
        records.drinks.push(drink("Ghost", "The Oak", DrinkType::Guinness));
        records.quotes.push(quote("Ghost", 9));
        records.inquiries.push(inquiry("Alice", "Ghost", 5, 0));

        let result = board(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].user, "Alice");
        assert_eq!(result[0].score, 15);
    }

    #[test]
    fn test_empty_records() {
        assert!(board(&TripRecords::new()).is_empty());
    }

    #[test]
    fn test_sorted_descending_ties_keep_rule_order() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Ann"));
        records.rules.push(rule("Ben"));
        records.rules.push(rule("Cat"));
        records.drinks.push(drink("Cat", "The Oak", DrinkType::Guinness));

        let result = board(&records);
        let users: Vec<_> = result.iter().map(|s| s.user.as_str()).collect();
        assert_eq!(users, vec!["Cat", "Ann", "Ben"]);
        for pair in result.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_ledger_sums_to_score_and_output_is_stable() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Alice"));
        records.rules.push(rule("Bob"));
        records.drinks.push(drink("Alice", "The Oak", DrinkType::Guinness));
        records.bets.push(bet("Bob", 10.0, BetResult::Win, 60.0));
        records.bets.push(bet("Alice", 12.5, BetResult::Loss, 0.0));
        records.inquiries.push(inquiry("Bob", "Alice", 2, 0));
        records
            .side_bets
            .push(side_bet("Alice", "Bob", 5.0, SideBetResult::Win));
        records.mvp_votes.push(mvp_vote("Bob", "Alice", "2025-06-02"));
        records.quotes.push(quote("Bob", 2));
        records.photos.push(photo("Alice", 5));

        let first = board(&records);
        for user in &first {
            let sum: i64 = user.ledger.iter().map(|e| e.points).sum();
            assert_eq!(sum, user.score);
        }

        let second = board(&records);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_custom_points_table() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Alice"));
        records.drinks.push(drink("Alice", "The Oak", DrinkType::Other));

        let config = ScoringConfig {
            rule: Some(1),
            drinks: Some(DrinkPoints {
                guinness: None,
                jameson: None,
                other: Some(3),
            }),
            ..ScoringConfig::default()
        };
        let result = calculate_leaderboard(&records, &config);
        assert_eq!(result[0].score, 4);
    }

    #[test]
    fn test_zero_rule_points_still_listed() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Alice"));
        let config = ScoringConfig {
            rule: Some(0),
            ..ScoringConfig::default()
        };
        let result = calculate_leaderboard(&records, &config);
        assert_eq!(result[0].ledger, vec![entry("Rule", 0)]);
    }

    #[test]
    fn test_extreme_amounts_saturate() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Alice"));
        records.bets.push(bet("Alice", -1e300, BetResult::Win, 1e300));
        records.bets.push(bet("Alice", f64::MAX, BetResult::Loss, 0.0));

        let result = calculate_leaderboard(&records, &ScoringConfig::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].ledger.len(), 3);
    }

    #[test]
    fn test_huge_points_table_saturates() {
        let mut records = TripRecords::new();
        records.rules.push(rule("Alice"));
        records.inquiries.push(inquiry("Alice", "Bob", 0, 0));
        records.photos.push(photo("Alice", 3));
        records.photos.push(photo("Alice", 4));

        let config = ScoringConfig {
            rule: Some(i64::MAX),
            inquiry_filed: Some(i64::MAX),
            photo: Some(i64::MAX),
            photo_like: Some(i64::MAX),
            ..ScoringConfig::default()
        };
        let result = calculate_leaderboard(&records, &config);
        assert_eq!(result[0].score, i64::MAX);
    }
}
