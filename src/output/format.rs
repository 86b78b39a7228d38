use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::error::AppError;

/// Placeholder for values that do not exist (empty collections)
pub(super) const MISSING: &str = "-";

#[derive(Debug, Clone, Copy)]
pub(crate) struct NumberFormat {
    group_sep: char,
    decimal_sep: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            group_sep: ',',
            decimal_sep: '.',
        }
    }
}

impl NumberFormat {
    pub(crate) fn from_locale(locale: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = locale else {
            return Ok(NumberFormat::default());
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(NumberFormat::default());
        }
        let base = trimmed
            .split(['-', '_'])
            .next()
            .unwrap_or(trimmed)
            .to_ascii_lowercase();

        let format = match base.as_str() {
            "de" => NumberFormat {
                group_sep: '.',
                decimal_sep: ',',
            },
            "fr" | "ru" => NumberFormat {
                group_sep: ' ',
                decimal_sep: ',',
            },
            "en" | "zh" => NumberFormat::default(),
            _ => {
                return Err(AppError::UnsupportedLocale {
                    input: trimmed.to_string(),
                });
            }
        };

        Ok(format)
    }
}

fn group_digits(digits: &str, sep: char) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

pub(super) fn format_number(n: u64, format: NumberFormat) -> String {
    group_digits(&n.to_string(), format.group_sep)
}

/// Fixed-point with grouped integer part, e.g. 12,345.68
pub(super) fn format_decimal(value: f64, places: usize, format: NumberFormat) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    let fixed = format!("{:.*}", places, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let sign = if value < 0.0 && fixed.chars().any(|c| matches!(c, '1'..='9')) {
        "-"
    } else {
        ""
    };
    let grouped = group_digits(int_part, format.group_sep);
    match frac_part {
        Some(frac) => format!("{sign}{grouped}{}{frac}", format.decimal_sep),
        None => format!("{sign}{grouped}"),
    }
}

pub(super) fn format_optional(value: Option<f64>, places: usize, format: NumberFormat) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format_decimal(v, places, format))
}

/// JSON number rounded to `places`; `null` for absent or non-finite values
pub(super) fn json_number(value: Option<f64>, places: i32) -> serde_json::Value {
    match value {
        Some(v) if v.is_finite() => {
            let scale = 10f64.powi(places);
            serde_json::json!((v * scale).round() / scale)
        }
        _ => serde_json::Value::Null,
    }
}

pub(super) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

/// Create a table with the standard preset, inner borders, and normalized header separator.
pub(super) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}

pub(super) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text).set_alignment(CellAlignment::Right);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(super) fn accent(use_color: bool, color: Color) -> Option<Color> {
    use_color.then_some(color)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn format_number_with_commas() {
        let fmt = NumberFormat::default();
        assert_eq!(format_number(0, fmt), "0");
        assert_eq!(format_number(999, fmt), "999");
        assert_eq!(format_number(1000, fmt), "1,000");
        assert_eq!(format_number(1_234_567, fmt), "1,234,567");
    }

    #[test]
    fn format_decimal_groups_and_rounds() {
        let fmt = NumberFormat::default();
        assert_eq!(format_decimal(12_345.678, 2, fmt), "12,345.68");
        assert_eq!(format_decimal(0.0017, 3, fmt), "0.002");
        assert_eq!(format_decimal(-3.26, 1, fmt), "-3.3");
        assert_eq!(format_decimal(-0.0001, 2, fmt), "0.00");
        assert_eq!(format_decimal(42.0, 0, fmt), "42");
    }

    #[test]
    fn format_decimal_locale_separators() {
        let de = NumberFormat::from_locale(Some("de")).unwrap();
        assert_eq!(format_decimal(1234.5, 1, de), "1.234,5");
        let fr = NumberFormat::from_locale(Some("fr_FR")).unwrap();
        assert_eq!(format_decimal(1234.5, 1, fr), "1 234,5");
    }

    #[test]
    fn missing_values_render_as_dash() {
        let fmt = NumberFormat::default();
        assert_eq!(format_optional(None, 2, fmt), "-");
        assert_eq!(format_decimal(f64::NAN, 2, fmt), "-");
        assert_eq!(format_optional(Some(1.0), 1, fmt), "1.0");
    }

    #[test]
    fn json_number_rounds_and_nulls() {
        assert_eq!(json_number(None, 2), serde_json::Value::Null);
        assert_eq!(json_number(Some(f64::INFINITY), 2), serde_json::Value::Null);
        assert_eq!(json_number(Some(1.23456), 3).as_f64().unwrap(), 1.235);
    }

    #[test]
    fn from_locale_none_returns_default() {
        let fmt = NumberFormat::from_locale(None).unwrap();
        assert_eq!(format_number(1000, fmt), "1,000");
    }

    #[test]
    fn from_locale_de_uses_dot_separator() {
        let fmt = NumberFormat::from_locale(Some("de-DE")).unwrap();
        assert_eq!(format_number(1000, fmt), "1.000");
    }

    #[test]
    fn from_locale_unsupported_returns_error() {
        assert!(NumberFormat::from_locale(Some("ja")).is_err());
    }
}
