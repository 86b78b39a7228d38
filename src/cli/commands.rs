//! CLI subcommand definitions

use std::path::PathBuf;

use clap::Subcommand;

use super::args::SortOrder;

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// List sessions with derived distance, speed and climate (default)
    Sessions,
    /// Per-day totals and averages
    Daily,
    /// Totals, averages and extremes over all matching sessions
    Stats,
    /// Per-day chart series
    Chart,
    /// Import session payload files into the session store
    Import {
        /// JSON or JSONL payload files, or directories containing them
        #[arg(required_unless_present = "from_log")]
        files: Vec<PathBuf>,
        /// Also replay uploads the tracker log shows were rejected with 401
        #[arg(long, value_name = "FILE")]
        from_log: Option<PathBuf>,
    },
    /// Remove re-uploaded duplicate sessions from the session store
    Dedup {
        /// Only report duplicates, delete nothing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Report views rendered from loaded sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Sessions,
    Daily,
    Stats,
    Chart,
}

impl View {
    /// Newest first for the session list, chronological elsewhere
    pub(crate) fn default_order(self) -> SortOrder {
        match self {
            View::Sessions => SortOrder::Desc,
            View::Daily | View::Stats | View::Chart => SortOrder::Asc,
        }
    }
}

/// Normalized command: a report view or a store maintenance action
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Report(View),
    Import {
        files: Vec<PathBuf>,
        from_log: Option<PathBuf>,
    },
    Dedup { dry_run: bool },
}

pub(crate) fn parse_command(cmd: &Option<Commands>) -> Action {
    match cmd {
        None | Some(Commands::Sessions) => Action::Report(View::Sessions),
        Some(Commands::Daily) => Action::Report(View::Daily),
        Some(Commands::Stats) => Action::Report(View::Stats),
        Some(Commands::Chart) => Action::Report(View::Chart),
        Some(Commands::Import { files, from_log }) => Action::Import {
            files: files.clone(),
            from_log: from_log.clone(),
        },
        Some(Commands::Dedup { dry_run }) => Action::Dedup { dry_run: *dry_run },
    }
}
