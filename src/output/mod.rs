pub mod formatter;

pub use formatter::{
    format_assignments, format_breakdown, format_leaderboard, format_score, format_tsv,
    should_use_colors,
};
