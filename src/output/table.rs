use crate::cli::SortOrder;
use crate::output::format::{NumberFormat, format_number};
use crate::utils::Timezone;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) compact: bool,
    pub(crate) number_format: NumberFormat,
    pub(crate) timezone: Timezone,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SummaryOptions {
    pub(crate) sessions: usize,
    pub(crate) duplicates: usize,
    pub(crate) elapsed_ms: Option<f64>,
}

pub(super) fn summary_text(summary: SummaryOptions, number_format: NumberFormat) -> String {
    let sessions = format_number(summary.sessions as u64, number_format);
    if summary.duplicates > 0 {
        format!(
            "{} sessions ({} duplicates skipped)",
            sessions,
            format_number(summary.duplicates as u64, number_format)
        )
    } else {
        format!("{sessions} sessions")
    }
}

/// Print the summary line with optional timing
pub(crate) fn print_summary_line(summary: SummaryOptions, number_format: NumberFormat, use_color: bool) {
    let stats_text = summary_text(summary, number_format);

    if let Some(ms) = summary.elapsed_ms {
        if use_color {
            println!("\n  {} | \x1b[36m{:.0}ms\x1b[0m\n", stats_text, ms);
        } else {
            println!("\n  {} | {:.0}ms\n", stats_text, ms);
        }
    } else {
        println!("\n  {}\n", stats_text);
    }
}
