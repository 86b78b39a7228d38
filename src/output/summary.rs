use comfy_table::{Cell, Color};

use crate::core::{Overview, to_kilometers};
use crate::output::format::{
    NumberFormat, accent, create_styled_table, format_number, format_optional, header_cell,
    json_number, right_cell,
};

fn km(meters: Option<f64>) -> Option<f64> {
    meters.map(to_kilometers)
}

/// Label, value and decimal places for every overview line
fn overview_rows(overview: &Overview) -> Vec<(&'static str, Option<f64>, usize)> {
    let totals = overview.totals;
    let averages = overview.averages;
    let extremes = &overview.extremes;
    vec![
        ("Sessions", Some(totals.map_or(0.0, |t| t.sessions as f64)), 0),
        ("Total rotations", totals.map(|t| t.rotations as f64), 0),
        ("Total distance (km)", km(totals.map(|t| t.distance_m)), 3),
        ("Total running time (min)", totals.map(|t| t.session_minutes), 1),
        ("Sum of speeds (km/h)", totals.map(|t| t.speed_kmh), 3),
        ("Sum of temperatures (°C)", totals.map(|t| t.temperature), 1),
        ("Sum of humidity (%)", totals.map(|t| t.humidity), 1),
        ("Avg rotations", averages.map(|a| a.rotations), 1),
        ("Avg distance (km)", km(averages.map(|a| a.distance_m)), 3),
        ("Avg speed (km/h)", averages.map(|a| a.speed_kmh), 3),
        ("Avg session (min)", averages.map(|a| a.session_minutes), 1),
        ("Avg temperature (°C)", averages.map(|a| a.temperature), 1),
        ("Avg humidity (%)", averages.map(|a| a.humidity), 1),
        ("Min distance (km)", km(extremes.min_distance_m), 3),
        ("Max distance (km)", km(extremes.max_distance_m), 3),
        ("Fastest (km/h)", extremes.fastest_kmh, 3),
        ("Slowest (km/h)", extremes.slowest_kmh, 3),
        ("Shortest session (min)", extremes.shortest_minutes, 1),
        ("Longest session (min)", extremes.longest_minutes, 1),
    ]
}

pub(crate) fn print_overview_table(overview: &Overview, use_color: bool, fmt: NumberFormat) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Metric", use_color),
        header_cell("Value", use_color),
    ]);

    let green = accent(use_color, Color::Green);
    for (label, value, places) in overview_rows(overview) {
        let text = match (value, places) {
            (Some(v), 0) => format_number(v.round() as u64, fmt),
            _ => format_optional(value, places, fmt),
        };
        table.add_row(vec![Cell::new(label), right_cell(&text, green, false)]);
    }

    println!("\n  Wheel Overview\n");
    println!("{table}");
}

pub(crate) fn overview_csv_rows(overview: &Overview) -> Vec<(&'static str, Option<f64>)> {
    overview_rows(overview)
        .into_iter()
        .map(|(label, value, _)| (label, value))
        .collect()
}

pub(crate) fn output_overview_json(overview: &Overview) -> String {
    let totals = overview.totals.map(|t| {
        serde_json::json!({
            "sessions": t.sessions,
            "rotations": t.rotations,
            "distance_km": json_number(Some(to_kilometers(t.distance_m)), 6),
            "session_minutes": json_number(Some(t.session_minutes), 6),
            "speed_kmh": json_number(Some(t.speed_kmh), 6),
            "temperature": json_number(Some(t.temperature), 6),
            "humidity": json_number(Some(t.humidity), 6),
        })
    });
    let averages = overview.averages.map(|a| {
        serde_json::json!({
            "rotations": json_number(Some(a.rotations), 6),
            "distance_km": json_number(Some(to_kilometers(a.distance_m)), 6),
            "speed_kmh": json_number(Some(a.speed_kmh), 6),
            "session_minutes": json_number(Some(a.session_minutes), 6),
            "temperature": json_number(Some(a.temperature), 6),
            "humidity": json_number(Some(a.humidity), 6),
        })
    });
    let e = &overview.extremes;
    let output = serde_json::json!({
        "sessions": overview.totals.map_or(0, |t| t.sessions),
        "totals": totals,
        "averages": averages,
        "extremes": {
            "min_distance_km": json_number(km(e.min_distance_m), 6),
            "max_distance_km": json_number(km(e.max_distance_m), 6),
            "fastest_kmh": json_number(e.fastest_kmh, 6),
            "slowest_kmh": json_number(e.slowest_kmh, 6),
            "shortest_minutes": json_number(e.shortest_minutes, 6),
            "longest_minutes": json_number(e.longest_minutes, 6),
        },
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        log::error!("Failed to serialize JSON output: {e}");
        "{}".to_string()
    })
}
