mod chart;
mod csv;
mod daily;
mod format;
mod session;
mod summary;
mod table;

pub(crate) use chart::{output_chart_json, print_chart_table};
pub(crate) use csv::{output_chart_csv, output_daily_csv, output_overview_csv, output_session_csv};
pub(crate) use daily::{output_daily_json, print_daily_table};
pub(crate) use format::NumberFormat;
pub(crate) use session::{output_session_json, print_session_table};
pub(crate) use summary::{output_overview_json, print_overview_table};
pub(crate) use table::{SummaryOptions, TableOptions, print_summary_line};
