use chrono::{DateTime, Utc};

use super::{append, require_participant, required, row_mut, ActionError, ActionResult};
use crate::records::{Inquiry, InquiryStatus, TripRecords};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Guilty,
    Innocent,
}

/// File a Steward's Inquiry against another participant.
pub fn file_inquiry(
    records: &mut TripRecords,
    reporter: &str,
    accused: &str,
    rule_text: &str,
    evidence: &str,
    now: DateTime<Utc>,
) -> ActionResult<usize> {
    require_participant(records, reporter)?;
    require_participant(records, accused)?;
    if reporter == accused {
        return Err(ActionError::SelfAction("file an inquiry against yourself"));
    }
    let rule_text = required("rule", rule_text)?;
    let evidence = required("evidence", evidence)?;

    let inquiry = Inquiry {
        reporter: reporter.to_string(),
        accused: accused.to_string(),
        rule_text,
        evidence,
        guilty_votes: 0,
        innocent_votes: 0,
        status: InquiryStatus::Open,
        voters: Vec::new(),
        timestamp: Some(now),
    };
    Ok(append(records, inquiry))
}

/// Cast a guilty/innocent vote. One vote per participant; the accused sits
/// this one out.
pub fn vote_inquiry(
    records: &mut TripRecords,
    index: usize,
    voter: &str,
    verdict: Verdict,
) -> ActionResult<()> {
    require_participant(records, voter)?;
    let inquiry: &mut Inquiry = row_mut(records, index)?;

    if inquiry.status == InquiryStatus::Closed {
        return Err(ActionError::InquiryClosed(index));
    }
    if inquiry.accused == voter {
        return Err(ActionError::SelfAction("vote on your own case"));
    }
    if inquiry.voters.iter().any(|v| v == voter) {
        return Err(ActionError::AlreadyVoted(voter.to_string()));
    }

    match verdict {
        Verdict::Guilty => inquiry.guilty_votes = inquiry.guilty_votes.saturating_add(1),
        Verdict::Innocent => inquiry.innocent_votes = inquiry.innocent_votes.saturating_add(1),
    }
    inquiry.voters.push(voter.to_string());

    tracing::info!(
        index,
        guilty = inquiry.guilty_votes,
        innocent = inquiry.innocent_votes,
        "inquiry vote recorded"
    );
    Ok(())
}

/// Close an inquiry to further voting. Only the reporter may close it.
pub fn close_inquiry(records: &mut TripRecords, index: usize, actor: &str) -> ActionResult<()> {
    let inquiry: &mut Inquiry = row_mut(records, index)?;
    if inquiry.reporter != actor {
        return Err(ActionError::NotAllowed(inquiry.reporter.clone()));
    }
    inquiry.status = InquiryStatus::Closed;
    Ok(())
}
