//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode, ConfigSortOrder};

use super::commands::{Commands, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first
    Desc,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(name = "wheelstats")]
#[command(about = "Hamster wheel session statistics", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Session database (defaults to the platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) db: Option<PathBuf>,

    /// Read sessions from payload files instead of the database
    #[arg(short, long, global = true, value_name = "PATH", conflicts_with = "db")]
    pub(crate) input: Option<PathBuf>,

    /// Sessions starting on or after this UTC date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) since: Option<String>,

    /// Sessions starting on or before this UTC date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) until: Option<String>,

    /// Page number, starting at 1
    #[arg(short, long, global = true, default_value_t = 1,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) page: u32,

    /// Sessions per page (all sessions when omitted)
    #[arg(long, global = true, value_name = "N",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) page_size: Option<u32>,

    /// Wheel diameter in meters (default 0.28)
    #[arg(long, global = true, value_name = "METERS", allow_hyphen_values = true)]
    pub(crate) diameter: Option<f64>,

    /// Hours after UTC midnight at which a new day starts (default 12)
    #[arg(long, global = true, value_name = "HOURS",
          value_parser = clap::value_parser!(i64).range(0..24))]
    pub(crate) day_boundary: Option<i64>,

    /// Sessions at or below this many meters are left out of min/max distance
    #[arg(long, global = true, value_name = "METERS", allow_hyphen_values = true)]
    pub(crate) min_distance: Option<f64>,

    /// Distance filter in kilometers (MIN..MAX, MIN.. or ..MAX)
    #[arg(long, global = true, value_name = "KM", allow_hyphen_values = true)]
    pub(crate) distance: Option<String>,

    /// Mean temperature filter in °C
    #[arg(long, global = true, value_name = "RANGE", allow_hyphen_values = true)]
    pub(crate) temperature: Option<String>,

    /// Mean humidity filter in percent
    #[arg(long, global = true, value_name = "RANGE", allow_hyphen_values = true)]
    pub(crate) humidity: Option<String>,

    /// Rotation count filter
    #[arg(long, global = true, value_name = "RANGE")]
    pub(crate) rotations: Option<String>,

    /// Speed filter in km/h
    #[arg(long, global = true, value_name = "RANGE", allow_hyphen_values = true)]
    pub(crate) speed: Option<String>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Output as CSV
    #[arg(long, global = true, conflicts_with = "json")]
    pub(crate) csv: bool,

    /// Sort order for results (sessions default to newest first)
    #[arg(short, long, global = true, value_enum)]
    pub(crate) order: Option<SortOrder>,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Compact output (fewer columns)
    #[arg(short = 'c', long, global = true)]
    pub(crate) compact: bool,

    /// Timezone for displayed times (e.g., "Europe/Berlin", "UTC")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Locale for number formatting (e.g., "en", "de", "fr")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // Boolean flags: config only applies if CLI is false (default)
        if !self.compact && config.compact {
            self.compact = true;
        }
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if self.order.is_none() {
            self.order = config.order.map(|order| match order {
                ConfigSortOrder::Asc => SortOrder::Asc,
                ConfigSortOrder::Desc => SortOrder::Desc,
            });
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        // Value options: only apply if CLI didn't set them
        if self.diameter.is_none() {
            self.diameter = config.wheel_diameter_m;
        }
        if self.day_boundary.is_none() {
            self.day_boundary = config.day_boundary_hours;
        }
        if self.min_distance.is_none() {
            self.min_distance = config.min_distance_m;
        }
        if self.db.is_none() && self.input.is_none() {
            self.db = config.db.clone();
            if self.db.is_none() {
                self.input = config.input.clone();
            }
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn sort_order(&self, view: View) -> SortOrder {
        self.order.unwrap_or_else(|| view.default_order())
    }
}
