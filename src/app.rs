use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::cli::{Action, Cli, View, parse_command};
use crate::config::Config;
use crate::consts::DEFAULT_MIN_DISTANCE_M;
use crate::core::{
    DayBoundary, DerivedSession, FilterCriteria, RawSession, SessionQuery, WheelGeometry,
    bucket_by_day, build_series, day_summaries, deduplicate, overview, to_meters,
};
use crate::error::AppError;
use crate::output::{
    NumberFormat, SummaryOptions, TableOptions, output_chart_csv, output_chart_json,
    output_daily_csv, output_daily_json, output_overview_csv, output_overview_json,
    output_session_csv, output_session_json, print_chart_table, print_daily_table,
    print_overview_table, print_session_table, print_summary_line,
};
use crate::source::{
    FileSource, LoadResult, SessionSource, SqliteStore, find_payload_files,
    load_sessions, read_payload_file, read_upload_log,
};
use crate::utils::{Timezone, day_range, parse_date, parse_f64_range, parse_u64_range};

/// Everything a command needs, resolved once from CLI and config
pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) query: SessionQuery,
    pub(crate) criteria: FilterCriteria,
    pub(crate) geometry: WheelGeometry,
    pub(crate) boundary: DayBoundary,
    pub(crate) min_distance_m: f64,
    pub(crate) timezone: Timezone,
    pub(crate) number_format: NumberFormat,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn from_cli(cli: &'a Cli) -> Result<Self, AppError> {
        let since = cli.since.as_deref().map(parse_date).transpose()?;
        let until = cli.until.as_deref().map(parse_date).transpose()?;
        let dates = day_range(since, until);

        let geometry = match cli.diameter {
            Some(d) => WheelGeometry::new(d)?,
            None => WheelGeometry::default(),
        };

        let boundary = match cli.day_boundary {
            Some(hours) if !(0..24).contains(&hours) => {
                return Err(AppError::InvalidRange {
                    input: hours.to_string(),
                    reason: "day boundary must be between 0 and 23 hours".to_string(),
                });
            }
            Some(hours) => DayBoundary::new(hours),
            None => DayBoundary::default(),
        };

        let min_distance_m = cli.min_distance.unwrap_or(DEFAULT_MIN_DISTANCE_M);
        if !(min_distance_m >= 0.0 && min_distance_m.is_finite()) {
            return Err(AppError::InvalidRange {
                input: min_distance_m.to_string(),
                reason: "minimum distance must be a non-negative number of meters".to_string(),
            });
        }

        let mut criteria = FilterCriteria {
            dates,
            ..Default::default()
        };
        if let Some(raw) = cli.distance.as_deref() {
            criteria.distance_m = parse_f64_range(raw)?.map(to_meters);
        }
        if let Some(raw) = cli.temperature.as_deref() {
            criteria.temperature = parse_f64_range(raw)?;
        }
        if let Some(raw) = cli.humidity.as_deref() {
            criteria.humidity = parse_f64_range(raw)?;
        }
        if let Some(raw) = cli.rotations.as_deref() {
            criteria.rotations = parse_u64_range(raw)?;
        }
        if let Some(raw) = cli.speed.as_deref() {
            criteria.speed_kmh = parse_f64_range(raw)?;
        }

        Ok(Self {
            cli,
            query: SessionQuery {
                page: cli.page,
                page_size: cli.page_size,
                range: dates,
            },
            criteria,
            geometry,
            boundary,
            min_distance_m,
            timezone: Timezone::parse(cli.timezone.as_deref())?,
            number_format: NumberFormat::from_locale(cli.locale.as_deref())?,
        })
    }

    fn db_path(&self) -> PathBuf {
        self.cli.db.clone().unwrap_or_else(Config::default_db_path)
    }

    fn open_source(&self) -> Result<Box<dyn SessionSource>, AppError> {
        Ok(match &self.cli.input {
            Some(input) => Box::new(FileSource::new(input)),
            None => Box::new(SqliteStore::open(&self.db_path())?),
        })
    }

    fn summary(&self, result: &LoadResult) -> SummaryOptions {
        SummaryOptions {
            sessions: result.sessions.len(),
            duplicates: result.duplicates.len(),
            elapsed_ms: Some(result.elapsed_ms),
        }
    }
}

fn handle_sessions(sessions: &[DerivedSession], ctx: &CommandContext<'_>) {
    let order = ctx.cli.sort_order(View::Sessions);
    if ctx.cli.json {
        println!("{}", output_session_json(sessions, order));
    } else if ctx.cli.csv {
        print!("{}", output_session_csv(sessions, order));
    } else {
        print_session_table(
            sessions,
            TableOptions {
                order,
                use_color: ctx.cli.use_color(),
                compact: ctx.cli.compact,
                number_format: ctx.number_format,
                timezone: ctx.timezone,
            },
        );
    }
}

fn handle_daily(sessions: &[DerivedSession], ctx: &CommandContext<'_>) {
    let order = ctx.cli.sort_order(View::Daily);
    let days = day_summaries(&bucket_by_day(sessions, ctx.boundary));
    log::debug!(
        "{} days with a {}h boundary",
        days.len(),
        ctx.boundary.offset_hours()
    );
    if ctx.cli.json {
        println!("{}", output_daily_json(&days, order));
    } else if ctx.cli.csv {
        print!("{}", output_daily_csv(&days, order));
    } else {
        print_daily_table(
            &days,
            order,
            ctx.cli.use_color(),
            ctx.cli.compact,
            ctx.number_format,
        );
    }
}

fn handle_stats(sessions: &[DerivedSession], ctx: &CommandContext<'_>) {
    let overview = overview(sessions, ctx.min_distance_m);
    if ctx.cli.json {
        println!("{}", output_overview_json(&overview));
    } else if ctx.cli.csv {
        print!("{}", output_overview_csv(&overview));
    } else {
        print_overview_table(&overview, ctx.cli.use_color(), ctx.number_format);
    }
}

fn handle_chart(sessions: &[DerivedSession], ctx: &CommandContext<'_>) {
    let order = ctx.cli.sort_order(View::Chart);
    let series = build_series(&bucket_by_day(sessions, ctx.boundary));
    log::debug!(
        "{} chart points with a {}h boundary",
        series.len(),
        ctx.boundary.offset_hours()
    );
    if ctx.cli.json {
        println!("{}", output_chart_json(&series, order));
    } else if ctx.cli.csv {
        print!("{}", output_chart_csv(&series, order));
    } else {
        print_chart_table(&series, order, ctx.cli.use_color(), ctx.number_format);
    }
}

fn handle_report(view: View, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let source = ctx.open_source()?;
    let result = load_sessions(source.as_ref(), &ctx.query, &ctx.geometry, &ctx.criteria)?;

    let machine_output = ctx.cli.json || ctx.cli.csv;
    if result.sessions.is_empty() && !machine_output {
        println!("No sessions found.");
        return Ok(());
    }

    match view {
        View::Sessions => handle_sessions(&result.sessions, ctx),
        View::Daily => handle_daily(&result.sessions, ctx),
        View::Stats => handle_stats(&result.sessions, ctx),
        View::Chart => handle_chart(&result.sessions, ctx),
    }

    if !machine_output {
        print_summary_line(ctx.summary(&result), ctx.number_format, ctx.cli.use_color());
    }
    Ok(())
}

fn handle_import(
    paths: &[PathBuf],
    from_log: Option<&Path>,
    ctx: &CommandContext<'_>,
) -> Result<(), AppError> {
    let imported_at = Utc::now();
    let mut sessions: Vec<RawSession> = Vec::new();
    let mut file_count = 0;
    for path in paths {
        for file in find_payload_files(path)? {
            let parsed = read_payload_file(&file)?;
            file_count += 1;
            for payload in parsed.payloads {
                sessions.push(payload.into_raw(0, imported_at, &parsed.origin)?);
            }
        }
    }

    let mut recovered = 0;
    if let Some(log_path) = from_log {
        for upload in read_upload_log(log_path)? {
            let origin = format!("{}:{}", log_path.display(), upload.line);
            sessions.push(upload.payload.into_raw(0, imported_at, &origin)?);
            recovered += 1;
        }
        log::info!("recovered {recovered} rejected uploads from {}", log_path.display());
    }

    let db_path = ctx.db_path();
    let mut store = SqliteStore::open(&db_path)?;
    let ids = store.insert_all(&sessions)?;
    log::info!("imported {} sessions into {}", ids.len(), db_path.display());

    if ctx.cli.json {
        let output = serde_json::json!({
            "imported": ids,
            "files": file_count,
            "recovered": recovered,
        });
        println!("{output}");
    } else {
        println!(
            "Imported {} sessions from {} files into {}",
            ids.len(),
            file_count,
            db_path.display()
        );
        if let Some(log_path) = from_log {
            println!(
                "{} of them were rejected uploads found in {}",
                recovered,
                log_path.display()
            );
        }
    }
    Ok(())
}

fn handle_dedup(dry_run: bool, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let all = SessionQuery::default();
    let (duplicates, removed) = match &ctx.cli.input {
        Some(input) => {
            if !dry_run {
                log::warn!("payload files are never modified; reporting duplicates only");
            }
            let (_, duplicates) = deduplicate(FileSource::new(input).fetch(&all)?);
            (duplicates, 0)
        }
        None => {
            let mut store = SqliteStore::open(&ctx.db_path())?;
            let (_, duplicates) = deduplicate(store.fetch(&all)?);
            let removed = if dry_run { 0 } else { store.delete(&duplicates)? };
            (duplicates, removed)
        }
    };

    if ctx.cli.json {
        let output = serde_json::json!({ "duplicates": duplicates, "removed": removed });
        println!("{output}");
    } else if duplicates.is_empty() {
        println!("No duplicate sessions found.");
    } else {
        let ids: Vec<String> = duplicates.iter().map(i64::to_string).collect();
        println!(
            "Found {} duplicate sessions ({}), removed {}",
            duplicates.len(),
            ids.join(", "),
            removed
        );
    }
    Ok(())
}

pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let ctx = CommandContext::from_cli(cli)?;
    match parse_command(&cli.command) {
        Action::Report(view) => handle_report(view, &ctx),
        Action::Import { files, from_log } => handle_import(&files, from_log.as_deref(), &ctx),
        Action::Dedup { dry_run } => handle_dedup(dry_run, &ctx),
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::core::ValueRange;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wheelstats").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_resolve() {
        let cli = cli(&[]);
        let ctx = CommandContext::from_cli(&cli).unwrap();
        assert_eq!(ctx.geometry.diameter_m(), 0.28);
        assert_eq!(ctx.boundary, DayBoundary::default());
        assert_eq!(ctx.min_distance_m, 10.0);
        assert_eq!(ctx.query, SessionQuery::default());
        assert_eq!(ctx.criteria, FilterCriteria::default());
    }

    #[test]
    fn distance_filter_is_given_in_kilometers() {
        let cli = cli(&["--distance", "0.5..2"]);
        let ctx = CommandContext::from_cli(&cli).unwrap();
        assert_eq!(
            ctx.criteria.distance_m,
            ValueRange::new(500.0, 2000.0).unwrap()
        );
    }

    #[test]
    fn dates_feed_query_and_filter() {
        let cli = cli(&["--since", "2025-03-01", "--page-size", "10", "--page", "2"]);
        let ctx = CommandContext::from_cli(&cli).unwrap();
        assert!(ctx.query.range.start.is_some());
        assert!(ctx.query.range.end.is_none());
        assert_eq!(ctx.query.range, ctx.criteria.dates);
        assert_eq!(ctx.query.offset(), 10);
    }

    #[test]
    fn invalid_inputs_are_errors() {
        for args in [
            &["--since", "March"][..],
            &["--diameter", "0"][..],
            &["--humidity", "80..20"][..],
            &["--min-distance", "-1"][..],
            &["--timezone", "Mars/Base"][..],
            &["--locale", "ja"][..],
        ] {
            let cli = cli(args);
            assert!(CommandContext::from_cli(&cli).is_err(), "{args:?}");
        }
    }

    #[test]
    fn config_day_boundary_out_of_range_is_rejected() {
        let config: Config = toml::from_str("day_boundary_hours = 30").unwrap();
        let cli = cli(&[]).with_config(&config);
        assert!(CommandContext::from_cli(&cli).is_err());
    }
}
