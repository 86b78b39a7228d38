use chrono::SecondsFormat;
use comfy_table::{Cell, Color};

use crate::cli::SortOrder;
use crate::core::{DerivedSession, session_totals, to_kilometers};
use crate::output::format::{
    MISSING, accent, create_styled_table, format_decimal, format_number, header_cell,
    json_number, right_cell, styled_cell,
};
use crate::output::table::TableOptions;

/// Sessions ordered by start time, ties broken by id
pub(super) fn sort_sessions(sessions: &[DerivedSession], order: SortOrder) -> Vec<&DerivedSession> {
    let mut sorted: Vec<_> = sessions.iter().collect();
    sorted.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
    if order == SortOrder::Desc {
        sorted.reverse();
    }
    sorted
}

pub(crate) fn print_session_table(sessions: &[DerivedSession], options: TableOptions) {
    let TableOptions {
        order,
        use_color,
        compact,
        number_format: fmt,
        timezone,
    } = options;
    let sorted = sort_sessions(sessions, order);

    let mut table = create_styled_table();
    let mut header = vec![
        header_cell("ID", use_color),
        header_cell("Start", use_color),
        header_cell("Minutes", use_color),
        header_cell("Rotations", use_color),
        header_cell("Distance (km)", use_color),
        header_cell("Speed (km/h)", use_color),
    ];
    if !compact {
        header.push(header_cell("Temp (°C)", use_color));
        header.push(header_cell("Humidity (%)", use_color));
        header.push(header_cell("Image", use_color));
    }
    table.set_header(header);

    let green = accent(use_color, Color::Green);
    for session in &sorted {
        let mut row = vec![
            Cell::new(session.id),
            Cell::new(timezone.format_minute(session.start_time)),
            right_cell(&format_decimal(session.length_minutes(), 1, fmt), None, false),
            right_cell(&format_number(session.rotations, fmt), None, false),
            right_cell(
                &format_decimal(to_kilometers(session.distance_m), 3, fmt),
                green,
                false,
            ),
            right_cell(&format_decimal(session.speed_kmh, 3, fmt), None, false),
        ];
        if !compact {
            row.push(right_cell(&format_decimal(session.temperature, 1, fmt), None, false));
            row.push(right_cell(&format_decimal(session.humidity, 1, fmt), None, false));
            row.push(Cell::new(session.image().unwrap_or(MISSING)));
        }
        table.add_row(row);
    }

    // Totals row, omitted when nothing matched
    if let Some(totals) = session_totals(sessions) {
        let cyan = accent(use_color, Color::Cyan);
        let mut row = vec![
            styled_cell("TOTAL", cyan, true),
            Cell::new(""),
            right_cell(&format_decimal(totals.session_minutes, 1, fmt), cyan, true),
            right_cell(&format_number(totals.rotations, fmt), cyan, true),
            right_cell(
                &format_decimal(to_kilometers(totals.distance_m), 3, fmt),
                accent(use_color, Color::Green),
                true,
            ),
            Cell::new(""),
        ];
        if !compact {
            row.extend([Cell::new(""), Cell::new(""), Cell::new("")]);
        }
        table.add_row(row);
    }

    println!("\n  Wheel Sessions\n");
    println!("{table}");
}

pub(crate) fn session_json_value(session: &DerivedSession) -> serde_json::Value {
    serde_json::json!({
        "id": session.id,
        "created_at": session.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "start_time": session.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        "end_time": session.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        "length_minutes": json_number(Some(session.length_minutes()), 6),
        "rotations": session.rotations,
        "distance_km": json_number(Some(to_kilometers(session.distance_m)), 6),
        "speed_kmh": json_number(Some(session.speed_kmh), 6),
        "temperature": json_number(Some(session.temperature), 6),
        "humidity": json_number(Some(session.humidity), 6),
        "image": session.image(),
        "images": session.images,
    })
}

pub(crate) fn output_session_json(sessions: &[DerivedSession], order: SortOrder) -> String {
    let output: Vec<serde_json::Value> = sort_sessions(sessions, order)
        .into_iter()
        .map(session_json_value)
        .collect();

    serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        log::error!("Failed to serialize JSON output: {e}");
        "[]".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn session(id: i64, start: i64) -> DerivedSession {
        let at = |s| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
        DerivedSession {
            id,
            created_at: at(start),
            images: vec![format!("{id}.jpg")],
            rotation_log: Vec::new(),
            start_time: at(start),
            end_time: at(start + 600),
            rotations: 1000,
            distance_m: 879.6,
            speed_kmh: 5.2776,
            temperature: 21.0,
            humidity: 48.5,
        }
    }

    #[test]
    fn sort_sessions_by_start_then_id() {
        let sessions = vec![session(3, 200), session(1, 100), session(2, 200)];
        let asc: Vec<i64> = sort_sessions(&sessions, SortOrder::Asc).iter().map(|s| s.id).collect();
        assert_eq!(asc, vec![1, 2, 3]);
        let desc: Vec<i64> = sort_sessions(&sessions, SortOrder::Desc).iter().map(|s| s.id).collect();
        assert_eq!(desc, vec![3, 2, 1]);
    }

    #[test]
    fn session_json_uses_kilometers() {
        let json: serde_json::Value =
            serde_json::from_str(&output_session_json(&[session(1, 0)], SortOrder::Asc)).unwrap();
        let first = &json[0];
        assert_eq!(first["id"], 1);
        assert_eq!(first["rotations"], 1000);
        assert!((first["distance_km"].as_f64().unwrap() - 0.8796).abs() < 1e-9);
        assert!((first["length_minutes"].as_f64().unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(first["start_time"], "1970-01-01T00:00:00Z");
        assert_eq!(first["image"], "1.jpg");
    }

    #[test]
    fn empty_sessions_serialize_to_empty_array() {
        assert_eq!(output_session_json(&[], SortOrder::Desc), "[]");
    }
}
