use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::roster::{Assignment, RosterEntry};
use crate::scoring::ScoreResult;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with `precision` decimals, dropping an all-zero fraction
pub fn format_score(score: f64, precision: u32) -> String {
    let formatted = format!("{:.*}", precision as usize, score);
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    if !fraction.bytes().all(|b| b == b'0') {
        return formatted;
    }
    if whole == "-0" {
        "0".to_string()
    } else {
        whole.to_string()
    }
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

/// Format a leaderboard with columns: Index, Average, Name, Work/Feedback/Cancellations
/// Index column: 3 chars (fits "99."), right-aligned
/// Average column is right-aligned, 9 chars wide
pub fn format_leaderboard(entries: &[RosterEntry], precision: u32, use_colors: bool) -> String {
    if entries.is_empty() {
        return "No drivers found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 3;
    let score_width = 9;
    let separator = "  ";

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format_score(entry.metrics.current_average, precision);
            let score_padded = format!("{:>width$}", score_str, width = score_width);
            let stats = format!(
                "work {} | feedback {} | cancellations {}",
                entry.metrics.work_rate, entry.metrics.feedback_rate, entry.metrics.cancellation_rate
            );

            let fixed_width = index_width + 1 + score_width + separator.len() * 2 + stats.len();
            let name = entry.display_name();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&name, width - fixed_width),
                Some(_) => truncate_name(&name, 20),
                None => name,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name.cyan(),
                    separator,
                    stats.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_padded, separator, name, separator, stats
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a leaderboard as tab-separated values for scripting
/// Columns: driver_id, average, name (no headers, no colors)
pub fn format_tsv(entries: &[RosterEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\t{}",
                entry.driver_id,
                entry.metrics.current_average,
                entry.display_name()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format normalization results, one driver per line: "#id  previous -> new"
pub fn format_assignments(assignments: &[Assignment], precision: u32, use_colors: bool) -> String {
    assignments
        .iter()
        .map(|a| {
            let previous = format_score(a.previous_average, precision);
            let new = format_score(a.new_average, precision);
            if use_colors {
                format!(
                    "#{:<6} {:>9} -> {}",
                    a.driver_id,
                    previous.dimmed(),
                    new.bold()
                )
            } else {
                format!("#{:<6} {:>9} -> {}", a.driver_id, previous, new)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line explanation of how a single score was reached (for --explain)
pub fn format_breakdown(result: &ScoreResult, precision: u32) -> String {
    let breakdown = &result.breakdown;
    let mut lines = vec![format!("Base average: {}", format_score(breakdown.base_score, precision))];
    for factor in &breakdown.factors {
        lines.push(format!(
            "  {}: {} ({} -> {})",
            factor.label,
            factor.description,
            format_score(factor.before, precision),
            format_score(factor.after, precision)
        ));
    }
    lines.push(format!(
        "Monthly score: {}",
        format_score(breakdown.monthly_score, precision)
    ));
    if result.normalized {
        lines.push(format!("Rank-based score: {}", format_score(result.score, precision)));
    } else {
        lines.push(format!("Score: {}", format_score(result.score, precision)));
    }
    lines.join("\n")
}
