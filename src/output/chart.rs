//! Chart series output
//!
//! JSON keeps the dashboard's parallel-array shape: `days`, `distance` (km),
//! `rotations`, `sessionLength` (min), `speed` (km/h), `avgTemp`, `avgHumidity`.

use comfy_table::Cell;

use crate::cli::SortOrder;
use crate::core::{ChartSeries, to_kilometers};
use crate::output::format::{
    NumberFormat, create_styled_table, format_decimal, format_number, header_cell, json_number,
    right_cell,
};

/// Index order for the requested sort; the series itself is ascending
fn indices(series: &ChartSeries, order: SortOrder) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..series.len()).collect();
    if order == SortOrder::Desc {
        idx.reverse();
    }
    idx
}

pub(crate) fn output_chart_json(series: &ChartSeries, order: SortOrder) -> String {
    let idx = indices(series, order);
    let pick = |values: &[f64]| -> Vec<serde_json::Value> {
        idx.iter().map(|&i| json_number(Some(values[i]), 6)).collect()
    };
    let distance_km: Vec<f64> = series.distance_m.iter().copied().map(to_kilometers).collect();

    let output = serde_json::json!({
        "days": idx.iter().map(|&i| series.days[i].as_str()).collect::<Vec<_>>(),
        "distance": pick(&distance_km),
        "rotations": idx.iter().map(|&i| series.rotations[i]).collect::<Vec<_>>(),
        "sessionLength": pick(&series.session_minutes),
        "speed": pick(&series.speed_kmh),
        "avgTemp": pick(&series.avg_temperature),
        "avgHumidity": pick(&series.avg_humidity),
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        log::error!("Failed to serialize JSON output: {e}");
        "{}".to_string()
    })
}

pub(crate) fn print_chart_table(
    series: &ChartSeries,
    order: SortOrder,
    use_color: bool,
    fmt: NumberFormat,
) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Day", use_color),
        header_cell("Distance (km)", use_color),
        header_cell("Rotations", use_color),
        header_cell("Session (min)", use_color),
        header_cell("Speed (km/h)", use_color),
        header_cell("Avg Temp (°C)", use_color),
        header_cell("Avg Humidity (%)", use_color),
    ]);

    for i in indices(series, order) {
        table.add_row(vec![
            Cell::new(&series.days[i]),
            right_cell(&format_decimal(to_kilometers(series.distance_m[i]), 3, fmt), None, false),
            right_cell(&format_number(series.rotations[i], fmt), None, false),
            right_cell(&format_decimal(series.session_minutes[i], 1, fmt), None, false),
            right_cell(&format_decimal(series.speed_kmh[i], 3, fmt), None, false),
            right_cell(&format_decimal(series.avg_temperature[i], 1, fmt), None, false),
            right_cell(&format_decimal(series.avg_humidity[i], 1, fmt), None, false),
        ]);
    }

    println!("\n  Chart Series\n");
    println!("{table}");
}
