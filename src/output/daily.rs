//! Per-day view
//!
//! Day labels come from the configured day boundary, so one night of wheel
//! activity stays in a single row.

use comfy_table::{Cell, Color};

use crate::cli::SortOrder;
use crate::core::{DaySummary, to_kilometers};
use crate::output::format::{
    NumberFormat, accent, create_styled_table, format_decimal, format_number, header_cell,
    json_number, right_cell, styled_cell,
};

pub(super) fn sort_days(days: &[DaySummary], order: SortOrder) -> Vec<&DaySummary> {
    let mut sorted: Vec<_> = days.iter().collect();
    match order {
        SortOrder::Asc => sorted.sort_by(|a, b| a.day.cmp(&b.day)),
        SortOrder::Desc => sorted.sort_by(|a, b| b.day.cmp(&a.day)),
    }
    sorted
}

pub(crate) fn print_daily_table(
    days: &[DaySummary],
    order: SortOrder,
    use_color: bool,
    compact: bool,
    fmt: NumberFormat,
) {
    let mut table = create_styled_table();
    let mut header = vec![
        header_cell("Day", use_color),
        header_cell("Sessions", use_color),
        header_cell("Rotations", use_color),
        header_cell("Distance (km)", use_color),
        header_cell("Speed (km/h)", use_color),
    ];
    if !compact {
        header.push(header_cell("Avg Minutes", use_color));
        header.push(header_cell("Avg Temp (°C)", use_color));
        header.push(header_cell("Avg Humidity (%)", use_color));
    }
    table.set_header(header);

    let green = accent(use_color, Color::Green);
    let mut sessions = 0;
    let mut rotations = 0;
    let mut distance_m = 0.0;
    for day in sort_days(days, order) {
        sessions += day.totals.sessions;
        rotations += day.totals.rotations;
        distance_m += day.totals.distance_m;

        let mut row = vec![
            Cell::new(&day.day),
            right_cell(&format_number(day.totals.sessions as u64, fmt), None, false),
            right_cell(&format_number(day.totals.rotations, fmt), None, false),
            right_cell(&format_decimal(to_kilometers(day.totals.distance_m), 3, fmt), green, false),
            right_cell(&format_decimal(day.speed_kmh, 3, fmt), None, false),
        ];
        if !compact {
            row.push(right_cell(&format_decimal(day.averages.session_minutes, 1, fmt), None, false));
            row.push(right_cell(&format_decimal(day.averages.temperature, 1, fmt), None, false));
            row.push(right_cell(&format_decimal(day.averages.humidity, 1, fmt), None, false));
        }
        table.add_row(row);
    }

    if !days.is_empty() {
        let cyan = accent(use_color, Color::Cyan);
        let mut row = vec![
            styled_cell("TOTAL", cyan, true),
            right_cell(&format_number(sessions as u64, fmt), cyan, true),
            right_cell(&format_number(rotations, fmt), cyan, true),
            right_cell(&format_decimal(to_kilometers(distance_m), 3, fmt), green, true),
            Cell::new(""),
        ];
        if !compact {
            row.extend([Cell::new(""), Cell::new(""), Cell::new("")]);
        }
        table.add_row(row);
    }

    println!("\n  Daily Wheel Activity\n");
    println!("{table}");
}

pub(crate) fn output_daily_json(days: &[DaySummary], order: SortOrder) -> String {
    let output: Vec<serde_json::Value> = sort_days(days, order)
        .into_iter()
        .map(|day| {
            serde_json::json!({
                "day": day.day,
                "sessions": day.totals.sessions,
                "rotations": day.totals.rotations,
                "distance_km": json_number(Some(to_kilometers(day.totals.distance_m)), 6),
                "speed_kmh": json_number(Some(day.speed_kmh), 6),
                "total_minutes": json_number(Some(day.totals.session_minutes), 6),
                "avg_session_minutes": json_number(Some(day.averages.session_minutes), 6),
                "avg_distance_km": json_number(Some(to_kilometers(day.averages.distance_m)), 6),
                "avg_temperature": json_number(Some(day.averages.temperature), 6),
                "avg_humidity": json_number(Some(day.averages.humidity), 6),
            })
        })
        .collect();

    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        log::error!("Failed to serialize JSON output: {e}");
        "[]".to_string()
    })
}
