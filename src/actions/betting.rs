use chrono::{DateTime, Utc};

use super::{append, in_range, require_participant, required, row_mut, ActionError, ActionResult};
use crate::records::{ActivityKind, Bet, BetResult, SideBet, SideBetResult, TripRecords};

pub const MAX_RACE: u32 = 10;
pub const MIN_STAKE: f64 = 1.0;
pub const MAX_STAKE: f64 = 1000.0;
pub const MAX_ODDS_NUMERATOR: u32 = 100;
pub const MAX_ODDS_DENOMINATOR: u32 = 20;

/// Settlement outcome. For side bets `Win` means the creator won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

/// A bet slip before it is placed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBet {
    pub race: u32,
    pub horse: String,
    pub stake: f64,
    pub odds_num: u32,
    pub odds_den: u32,
}

/// Place a race bet. The bet stays PENDING with no payout until settled.
pub fn place_bet(
    records: &mut TripRecords,
    bettor: &str,
    slip: NewBet,
    now: DateTime<Utc>,
) -> ActionResult<usize> {
    require_participant(records, bettor)?;
    in_range("race", slip.race as f64, 1.0, MAX_RACE as f64)?;
    let horse = required("horse", &slip.horse)?;
    in_range("stake", slip.stake, MIN_STAKE, MAX_STAKE)?;
    in_range("odds numerator", slip.odds_num as f64, 1.0, MAX_ODDS_NUMERATOR as f64)?;
    in_range("odds denominator", slip.odds_den as f64, 1.0, MAX_ODDS_DENOMINATOR as f64)?;

    let bet = Bet {
        bettor: bettor.to_string(),
        race: slip.race,
        horse,
        stake: slip.stake,
        odds_num: slip.odds_num,
        odds_den: slip.odds_den,
        result: BetResult::Pending,
        payout: 0.0,
        timestamp: Some(now),
    };
    Ok(append(records, bet))
}

/// Settle a pending bet. Only the bettor settles their own bets.
///
/// A win writes the payout (stake included, rounded to cents); a loss
/// writes 0. Returns the payout written.
pub fn settle_bet(
    records: &mut TripRecords,
    index: usize,
    actor: &str,
    outcome: Outcome,
) -> ActionResult<f64> {
    let bet: &mut Bet = row_mut(records, index)?;
    if bet.bettor != actor {
        return Err(ActionError::NotAllowed(bet.bettor.clone()));
    }
    if bet.result != BetResult::Pending {
        return Err(ActionError::AlreadySettled {
            kind: ActivityKind::Bet,
            index,
        });
    }

    match outcome {
        Outcome::Win => {
            bet.result = BetResult::Win;
            bet.payout = bet.winning_payout();
        }
        Outcome::Loss => {
            bet.result = BetResult::Loss;
            bet.payout = 0.0;
        }
    }

    tracing::info!(index, result = ?bet.result, payout = bet.payout, "bet settled");
    Ok(bet.payout)
}

/// Offer a side bet, optionally naming who takes the other side.
pub fn create_side_bet(
    records: &mut TripRecords,
    creator: &str,
    description: &str,
    stake: f64,
    taker: Option<&str>,
    now: DateTime<Utc>,
) -> ActionResult<usize> {
    require_participant(records, creator)?;
    let description = required("description", description)?;
    in_range("stake", stake, MIN_STAKE, MAX_STAKE)?;
    if let Some(taker) = taker {
        check_taker(records, creator, taker)?;
    }

    let side_bet = SideBet {
        creator: creator.to_string(),
        taker: taker.map(String::from),
        description,
        stake,
        result: SideBetResult::Open,
        timestamp: Some(now),
    };
    Ok(append(records, side_bet))
}

fn check_taker(records: &TripRecords, creator: &str, taker: &str) -> ActionResult<()> {
    require_participant(records, taker)?;
    if taker == creator {
        return Err(ActionError::SelfAction("take your own side bet"));
    }
    Ok(())
}

/// Take the other side of an open, untaken side bet.
pub fn take_side_bet(records: &mut TripRecords, index: usize, taker: &str) -> ActionResult<()> {
    let creator = {
        let side_bet: &mut SideBet = row_mut(records, index)?;
        side_bet.creator.clone()
    };
    check_taker(records, &creator, taker)?;

    let side_bet: &mut SideBet = row_mut(records, index)?;
    if let Some(existing) = &side_bet.taker {
        return Err(ActionError::AlreadyTaken {
            index,
            taker: existing.clone(),
        });
    }
    if side_bet.result != SideBetResult::Open {
        return Err(ActionError::AlreadySettled {
            kind: ActivityKind::SideBet,
            index,
        });
    }
    side_bet.taker = Some(taker.to_string());
    Ok(())
}

/// Settle a side bet. Either party may settle; `Outcome::Win` means the
/// creator won.
pub fn settle_side_bet(
    records: &mut TripRecords,
    index: usize,
    actor: &str,
    outcome: Outcome,
) -> ActionResult<()> {
    let side_bet: &mut SideBet = row_mut(records, index)?;
    let Some(taker) = side_bet.taker.clone() else {
        return Err(ActionError::NoTaker(index));
    };
    if side_bet.creator != actor && taker != actor {
        return Err(ActionError::NotAllowed(format!("{} or {}", side_bet.creator, taker)));
    }
    if side_bet.result != SideBetResult::Open {
        return Err(ActionError::AlreadySettled {
            kind: ActivityKind::SideBet,
            index,
        });
    }

    side_bet.result = match outcome {
        Outcome::Win => SideBetResult::Win,
        Outcome::Loss => SideBetResult::Loss,
    };
    tracing::info!(index, result = ?side_bet.result, "side bet settled");
    Ok(())
}
