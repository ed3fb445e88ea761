pub mod formatter;

pub use formatter::{
    format_awards, format_json, format_leaderboard, format_points, format_receipt, format_rows,
    format_rules, format_tsv, should_use_colors,
};
