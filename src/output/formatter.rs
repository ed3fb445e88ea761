use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::records::{ActivityKind, Quote, Rule, TripRecords};
use crate::scoring::{DailyMvp, UserScore};

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format points with an explicit sign: "+10", "-20", "0"
pub fn format_points(points: i64) -> String {
    if points > 0 {
        format!("+{}", points)
    } else {
        points.to_string()
    }
}

fn medal(rank: usize) -> &'static str {
    MEDALS.get(rank - 1).copied().unwrap_or("  ")
}

/// Format the leaderboard, one line per participant.
/// Rank column: 3 chars right-aligned with trailing dot, then a medal for the
/// podium, the name, and the score right-aligned in 6 chars.
pub fn format_leaderboard(board: &[UserScore], use_colors: bool) -> String {
    if board.is_empty() {
        return "No scores yet. Get involved!".to_string();
    }

    let score_width = 6;
    // "NN. " + medal (2 cols) + " " + "  " + score
    let fixed_width = 4 + 2 + 1 + 2 + score_width;
    let longest = board.iter().map(|u| u.user.chars().count()).max().unwrap_or(0);
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        // Very narrow terminal
        Some(_) => longest.min(10),
        None => longest,
    };

    board
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let rank = idx + 1;
            let rank_str = format!("{:>3}.", rank);
            let name = format!("{:<width$}", truncate_name(&entry.user, name_width), width = name_width);
            let score = format!("{:>width$}", entry.score, width = score_width);

            if use_colors {
                let score = if entry.score < 0 {
                    score.red().to_string()
                } else {
                    score.bold().to_string()
                };
                let name = if rank <= MEDALS.len() {
                    name.bold().to_string()
                } else {
                    name
                };
                format!("{} {} {}  {}", rank_str.dimmed(), medal(rank), name, score)
            } else {
                format!("{} {} {}  {}", rank_str, medal(rank), name, score)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a participant's receipt: every entry with its signed points, then
/// the total.
pub fn format_receipt(entry: &UserScore, use_colors: bool) -> String {
    let points_width = entry
        .ledger
        .iter()
        .map(|line| format_points(line.points).len())
        .chain(std::iter::once(format_points(entry.score).len()))
        .max()
        .unwrap_or(1);

    let mut lines = Vec::with_capacity(entry.ledger.len() + 2);
    if use_colors {
        lines.push(format!("Receipt for {}", entry.user.bold()));
    } else {
        lines.push(format!("Receipt for {}", entry.user));
    }

    for line in &entry.ledger {
        let points = format!("{:>width$}", format_points(line.points), width = points_width);
        if use_colors && line.points < 0 {
            lines.push(format!("  {}  {}", points.red(), line.label));
        } else if use_colors && line.points > 0 {
            lines.push(format!("  {}  {}", points.green(), line.label));
        } else {
            lines.push(format!("  {}  {}", points, line.label));
        }
    }

    let total = format!("{:>width$}", format_points(entry.score), width = points_width);
    if use_colors {
        lines.push(format!("  {}  {}", total.bold(), "Total".bold()));
    } else {
        lines.push(format!("  {}  Total", total));
    }
    lines.join("\n")
}

/// Format the leaderboard as tab-separated values for scripting
/// Columns: rank, user, score (no headers, no colors)
pub fn format_tsv(board: &[UserScore]) -> String {
    board
        .iter()
        .enumerate()
        .map(|(idx, entry)| format!("{}\t{}\t{}", idx + 1, entry.user, entry.score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the leaderboard (ledgers included) as pretty JSON
pub fn format_json(board: &[UserScore]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(board)
}

/// Format the derived awards: one line per MVP day, then the Quote of the Trip.
pub fn format_awards(mvps: &[DailyMvp], quote: Option<&Quote>, use_colors: bool) -> String {
    let heading = |text: &str| {
        if use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    };

    let mut lines = vec![heading("Daily MVP")];
    if mvps.is_empty() {
        lines.push("  No votes yet.".to_string());
    }
    for mvp in mvps {
        lines.push(format!(
            "  {}  {} ({} {})",
            mvp.day,
            mvp.winner,
            mvp.votes,
            if mvp.votes == 1 { "vote" } else { "votes" }
        ));
    }

    lines.push(String::new());
    lines.push(heading("Quote of the Trip"));
    match quote {
        Some(q) => {
            lines.push(format!("  \"{}\" - {}", q.text, q.speaker));
            lines.push(format!("  submitted by {}, {} votes", q.submitter, q.votes));
        }
        None => lines.push("  No quotes yet.".to_string()),
    }
    lines.join("\n")
}

/// Format the Steward's Rules, numbered in submission order.
pub fn format_rules(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "No rules yet. Submit one to join the trip.".to_string();
    }

    rules
        .iter()
        .enumerate()
        .map(|(idx, rule)| format!("{:>3}. {}: {}", idx + 1, rule.author, rule.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format every row of one activity kind with the 1-based index actions use.
pub fn format_rows(records: &TripRecords, kind: ActivityKind) -> String {
    if records.count(kind) == 0 {
        return match kind {
            ActivityKind::Rule => format_rules(&records.rules),
            _ => format!("No {} records yet.", kind),
        };
    }

    let rows: Vec<String> = match kind {
        ActivityKind::Rule => return format_rules(&records.rules),
        ActivityKind::Inquiry => records
            .inquiries
            .iter()
            .map(|i| {
                format!(
                    "{} vs {}: {} [{:?}, {} guilty / {} innocent]",
                    i.reporter, i.accused, i.rule_text, i.status, i.guilty_votes, i.innocent_votes
                )
            })
            .collect(),
        ActivityKind::Bet => records
            .bets
            .iter()
            .map(|b| {
                format!(
                    "{}: race {}, {} @ {}, stake {:.2} [{:?}, payout {:.2}]",
                    b.bettor, b.race, b.horse, b.odds(), b.stake, b.result, b.payout
                )
            })
            .collect(),
        ActivityKind::Drink => records
            .drinks
            .iter()
            .map(|d| format!("{}: {} at {}", d.drinker, d.drink_type, d.pub_name))
            .collect(),
        ActivityKind::SideBet => records
            .side_bets
            .iter()
            .map(|s| {
                format!(
                    "{} vs {}: {}, stake {:.2} [{:?}]",
                    s.creator,
                    s.taker.as_deref().unwrap_or("(untaken)"),
                    s.description,
                    s.stake,
                    s.result
                )
            })
            .collect(),
        ActivityKind::MvpVote => records
            .mvp_votes
            .iter()
            .map(|v| {
                let day = v.day.map(|d| d.to_string()).unwrap_or_else(|| "(no day)".to_string());
                format!("{}: {} voted for {}", day, v.voter, v.nominee)
            })
            .collect(),
        ActivityKind::Quote => records
            .quotes
            .iter()
            .map(|q| format!("\"{}\" - {} ({} votes, posted by {})", q.text, q.speaker, q.votes, q.submitter))
            .collect(),
        ActivityKind::Photo => records
            .photos
            .iter()
            .map(|p| format!("{}: {} {} ({} likes)", p.uploader, p.caption, p.url, p.likes))
            .collect(),
    };

    rows.iter()
        .enumerate()
        .map(|(idx, row)| format!("{:>3}. {}", idx + 1, row))
        .collect::<Vec<_>>()
        .join("\n")
}
