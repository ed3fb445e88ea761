//! Derived winners: Daily MVP and Quote of the Trip.
//!
//! Ties go to whichever candidate was encountered first in input order.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use crate::records::{MvpVote, Quote};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyMvp {
    pub day: NaiveDate,
    pub winner: String,
    pub votes: u32,
}

/// The vote a voter currently has standing for a day: their last one.
pub fn current_mvp_vote<'a>(votes: &'a [MvpVote], voter: &str, day: NaiveDate) -> Option<&'a MvpVote> {
    votes
        .iter()
        .rev()
        .find(|v| v.voter == voter && v.day == Some(day))
}

/// Votes that count toward a tally. With `dedupe_per_voter` only each
/// voter's last vote per day is kept; otherwise every vote cast counts,
/// including ones the voter later replaced. Votes without a day never count.
fn counted_votes(votes: &[MvpVote], dedupe_per_voter: bool) -> Vec<&MvpVote> {
    if !dedupe_per_voter {
        return votes.iter().filter(|v| v.day.is_some()).collect();
    }

    let mut last_index: HashMap<(NaiveDate, &str), usize> = HashMap::new();
    for (i, vote) in votes.iter().enumerate() {
        if let Some(day) = vote.day {
            last_index.insert((day, vote.voter.as_str()), i);
        }
    }

    votes
        .iter()
        .enumerate()
        .filter(|(i, vote)| {
            vote.day
                .map(|day| last_index.get(&(day, vote.voter.as_str())) == Some(i))
                .unwrap_or(false)
        })
        .map(|(_, vote)| vote)
        .collect()
}

/// Vote counts per nominee for every day, nominees in first-vote order.
pub fn mvp_tally(votes: &[MvpVote], dedupe_per_voter: bool) -> BTreeMap<NaiveDate, Vec<(String, u32)>> {
    let mut tally: BTreeMap<NaiveDate, Vec<(String, u32)>> = BTreeMap::new();

    for vote in counted_votes(votes, dedupe_per_voter) {
        let Some(day) = vote.day else { continue };
        let counts = tally.entry(day).or_default();
        match counts.iter_mut().find(|(nominee, _)| *nominee == vote.nominee) {
            Some((_, n)) => *n += 1,
            None => counts.push((vote.nominee.clone(), 1)),
        }
    }

    tally
}

/// Plurality winner of each day, in day order.
pub fn daily_mvp_winners(votes: &[MvpVote], dedupe_per_voter: bool) -> Vec<DailyMvp> {
    mvp_tally(votes, dedupe_per_voter)
        .into_iter()
        .filter_map(|(day, counts)| {
            let mut best: Option<&(String, u32)> = None;
            for entry in &counts {
                if best.map_or(true, |b| entry.1 > b.1) {
                    best = Some(entry);
                }
            }
            best.map(|(winner, n)| DailyMvp {
                day,
                winner: winner.clone(),
                votes: *n,
            })
        })
        .collect()
}

/// The single most-voted quote of the whole trip.
///
/// Any quote qualifies, even with zero votes; an empty slice gives `None`.
pub fn quote_of_the_trip(quotes: &[Quote]) -> Option<&Quote> {
    let mut best: Option<&Quote> = None;
    for quote in quotes {
        if best.map_or(true, |b| quote.votes > b.votes) {
            best = Some(quote);
        }
    }
    best
}
