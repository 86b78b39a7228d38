pub(crate) mod date;
pub(crate) mod range;
pub(crate) mod timezone;

pub(crate) use date::{day_range, parse_date, parse_instant};
pub(crate) use range::{parse_f64_range, parse_u64_range};
pub(crate) use timezone::Timezone;
