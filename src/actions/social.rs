use chrono::{DateTime, NaiveDate, Utc};

use super::{append, require_participant, required, row_mut, ActionError, ActionResult};
use crate::records::{Drink, DrinkType, MvpVote, Photo, Quote, Rule, TripRecords};

/// A rule must be longer than this many characters once trimmed.
pub const MIN_RULE_LENGTH: usize = 10;

/// Submit a participant's Steward's Rule. This is the entry ticket: nobody
/// can do anything else until they have one, and everyone gets exactly one.
pub fn submit_rule(
    records: &mut TripRecords,
    author: &str,
    text: &str,
    now: DateTime<Utc>,
) -> ActionResult<usize> {
    let author = required("name", author)?;
    let text = text.trim();
    if text.chars().count() <= MIN_RULE_LENGTH {
        return Err(ActionError::RuleTooShort);
    }
    if records.has_rule(&author) {
        return Err(ActionError::DuplicateRule(author));
    }

    let rule = Rule {
        author,
        text: text.to_string(),
        timestamp: Some(now),
    };
    Ok(append(records, rule))
}

pub fn log_drink(
    records: &mut TripRecords,
    drinker: &str,
    pub_name: &str,
    drink_type: DrinkType,
    now: DateTime<Utc>,
) -> ActionResult<usize> {
    require_participant(records, drinker)?;
    let pub_name = required("pub", pub_name)?;

    let drink = Drink {
        drinker: drinker.to_string(),
        pub_name,
        drink_type,
        timestamp: Some(now),
    };
    Ok(append(records, drink))
}

/// Vote for a day's MVP. Changing your mind means voting again; the old
/// vote stays on record.
pub fn cast_mvp_vote(
    records: &mut TripRecords,
    voter: &str,
    nominee: &str,
    day: NaiveDate,
    now: DateTime<Utc>,
) -> ActionResult<usize> {
    require_participant(records, voter)?;
    require_participant(records, nominee)?;
    if voter == nominee {
        return Err(ActionError::SelfAction("vote for yourself"));
    }

    let vote = MvpVote {
        voter: voter.to_string(),
        nominee: nominee.to_string(),
        day: Some(day),
        timestamp: Some(now),
    };
    Ok(append(records, vote))
}

/// Post something someone said. The speaker need not be on the trip board.
pub fn submit_quote(
    records: &mut TripRecords,
    submitter: &str,
    speaker: &str,
    text: &str,
    now: DateTime<Utc>,
) -> ActionResult<usize> {
    require_participant(records, submitter)?;
    let speaker = required("speaker", speaker)?;
    let text = required("quote", text)?;

    let quote = Quote {
        submitter: submitter.to_string(),
        speaker,
        text,
        votes: 0,
        voters: Vec::new(),
        timestamp: Some(now),
    };
    Ok(append(records, quote))
}

pub fn vote_quote(records: &mut TripRecords, index: usize, voter: &str) -> ActionResult<u32> {
    require_participant(records, voter)?;
    let quote: &mut Quote = row_mut(records, index)?;
    if quote.submitter == voter {
        return Err(ActionError::SelfAction("vote for your own quote"));
    }
    if quote.voters.iter().any(|v| v == voter) {
        return Err(ActionError::AlreadyVoted(voter.to_string()));
    }

    quote.votes = quote.votes.saturating_add(1);
    quote.voters.push(voter.to_string());
    Ok(quote.votes)
}

/// Record an uploaded photo. The image itself lives wherever `url` points.
pub fn add_photo(
    records: &mut TripRecords,
    uploader: &str,
    caption: &str,
    url: &str,
    now: DateTime<Utc>,
) -> ActionResult<usize> {
    require_participant(records, uploader)?;
    let url = required("url", url)?;

    let photo = Photo {
        uploader: uploader.to_string(),
        caption: caption.trim().to_string(),
        url,
        likes: 0,
        likers: Vec::new(),
        timestamp: Some(now),
    };
    Ok(append(records, photo))
}

pub fn like_photo(records: &mut TripRecords, index: usize, user: &str) -> ActionResult<u32> {
    require_participant(records, user)?;
    let photo: &mut Photo = row_mut(records, index)?;
    if photo.uploader == user {
        return Err(ActionError::SelfAction("like your own photo"));
    }
    if photo.likers.iter().any(|u| u == user) {
        return Err(ActionError::AlreadyVoted(user.to_string()));
    }

    photo.likes = photo.likes.saturating_add(1);
    photo.likers.push(user.to_string());
    Ok(photo.likes)
}
