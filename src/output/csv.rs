use chrono::SecondsFormat;
use std::fmt::Write;

use crate::cli::SortOrder;
use crate::core::{ChartSeries, DaySummary, DerivedSession, Overview, to_kilometers};
use crate::output::daily::sort_days;
use crate::output::session::sort_sessions;
use crate::output::summary::overview_csv_rows;

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub(crate) fn output_session_csv(sessions: &[DerivedSession], order: SortOrder) -> String {
    let mut out = String::from(
        "id,start_time,end_time,length_minutes,rotations,distance_km,speed_kmh,temperature,humidity,image\n",
    );
    for s in sort_sessions(sessions, order) {
        let _ = writeln!(
            out,
            "{},{},{},{:.3},{},{:.6},{:.6},{:.2},{:.2},{}",
            s.id,
            s.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            s.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            s.length_minutes(),
            s.rotations,
            to_kilometers(s.distance_m),
            s.speed_kmh,
            s.temperature,
            s.humidity,
            csv_escape(s.image().unwrap_or("")),
        );
    }
    out
}

pub(crate) fn output_daily_csv(days: &[DaySummary], order: SortOrder) -> String {
    let mut out = String::from(
        "day,sessions,rotations,distance_km,speed_kmh,avg_session_minutes,avg_temperature,avg_humidity\n",
    );
    for d in sort_days(days, order) {
        let _ = writeln!(
            out,
            "{},{},{},{:.6},{:.6},{:.3},{:.2},{:.2}",
            csv_escape(&d.day),
            d.totals.sessions,
            d.totals.rotations,
            to_kilometers(d.totals.distance_m),
            d.speed_kmh,
            d.averages.session_minutes,
            d.averages.temperature,
            d.averages.humidity,
        );
    }
    out
}

pub(crate) fn output_chart_csv(series: &ChartSeries, order: SortOrder) -> String {
    let mut out = String::from("day,distance_km,rotations,session_minutes,speed_kmh,avg_temperature,avg_humidity\n");
    let mut idx: Vec<usize> = (0..series.len()).collect();
    if order == SortOrder::Desc {
        idx.reverse();
    }
    for i in idx {
        let _ = writeln!(
            out,
            "{},{:.6},{},{:.3},{:.6},{:.2},{:.2}",
            csv_escape(&series.days[i]),
            to_kilometers(series.distance_m[i]),
            series.rotations[i],
            series.session_minutes[i],
            series.speed_kmh[i],
            series.avg_temperature[i],
            series.avg_humidity[i],
        );
    }
    out
}

/// `metric,value` pairs; absent values are left empty
pub(crate) fn output_overview_csv(overview: &Overview) -> String {
    let mut out = String::from("metric,value\n");
    for (label, value) in overview_csv_rows(overview) {
        let value = value.map(|v| format!("{v:.6}")).unwrap_or_default();
        let _ = writeln!(out, "{},{}", csv_escape(label), value);
    }
    out
}
