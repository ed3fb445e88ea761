//! Write-side operations on trip records.
//!
//! Every action names its acting user explicitly and mutates a
//! [`TripRecords`] in place; persisting the result is the store's job (see
//! [`crate::store::JsonStore::update`]). Rows are addressed by 1-based index
//! within their collection, as shown to users.

pub mod betting;
pub mod inquiry;
pub mod social;

pub use betting::{
    create_side_bet, place_bet, settle_bet, settle_side_bet, take_side_bet, NewBet, Outcome,
};
pub use inquiry::{close_inquiry, file_inquiry, vote_inquiry, Verdict};
pub use social::{
    add_photo, cast_mvp_vote, like_photo, log_drink, submit_quote, submit_rule, vote_quote,
    MIN_RULE_LENGTH,
};

use thiserror::Error;

use crate::records::{ActivityKind, Record, TripRecords};

#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("{kind} #{index} does not exist")]
    NotFound { kind: ActivityKind, index: usize },

    #[error("{0} has not submitted a rule yet")]
    NotParticipant(String),

    #[error("{0} has already submitted a rule")]
    DuplicateRule(String),

    #[error("rule must be longer than {} characters", MIN_RULE_LENGTH)]
    RuleTooShort,

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("you cannot {0}")]
    SelfAction(&'static str),

    #[error("{0} has already voted")]
    AlreadyVoted(String),

    #[error("{kind} #{index} is already settled")]
    AlreadySettled { kind: ActivityKind, index: usize },

    #[error("only {0} can do that")]
    NotAllowed(String),

    #[error("inquiry #{0} is closed")]
    InquiryClosed(usize),

    #[error("side bet #{0} has no taker yet")]
    NoTaker(usize),

    #[error("side bet #{index} was already taken by {taker}")]
    AlreadyTaken { index: usize, taker: String },
}

pub type ActionResult<T> = Result<T, ActionError>;

/// Trimmed copy of a required text field.
fn required(field: &'static str, value: &str) -> ActionResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(ActionError::Empty(field))
    } else {
        Ok(value.to_string())
    }
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> ActionResult<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ActionError::OutOfRange { field, min, max })
    }
}

/// Only rule authors may take part in anything else.
fn require_participant(records: &TripRecords, user: &str) -> ActionResult<()> {
    if records.has_rule(user) {
        Ok(())
    } else {
        Err(ActionError::NotParticipant(user.to_string()))
    }
}

/// Mutable access to a row by its 1-based index.
fn row_mut<R: Record>(records: &mut TripRecords, index: usize) -> ActionResult<&mut R> {
    let not_found = ActionError::NotFound {
        kind: R::KIND,
        index,
    };
    if index == 0 {
        return Err(not_found);
    }
    R::collection_mut(records)
        .get_mut(index - 1)
        .ok_or(not_found)
}

/// Append a row and return its 1-based index.
fn append<R: Record>(records: &mut TripRecords, row: R) -> usize {
    let rows = R::collection_mut(records);
    rows.push(row);
    tracing::debug!(kind = %R::KIND, index = rows.len(), "record appended");
    rows.len()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::records::{Rule, TripRecords};

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap()
    }

    /// Records where every named user has submitted a rule.
    pub fn trip_with(users: &[&str]) -> TripRecords {
        let mut records = TripRecords::new();
        for user in users {
            records.rules.push(Rule {
                author: user.to_string(),
                text: format!("{} says no phones at dinner", user),
                timestamp: Some(now()),
            });
        }
        records
    }
}
