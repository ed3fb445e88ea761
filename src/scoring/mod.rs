pub mod awards;
pub mod config;
pub mod engine;
pub mod validation;

pub use awards::{current_mvp_vote, daily_mvp_winners, mvp_tally, quote_of_the_trip, DailyMvp};
pub use config::*;
pub use engine::{calculate_leaderboard, LedgerEntry, UserScore};
pub use validation::validate_scoring;
