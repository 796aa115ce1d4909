//! Calendar-day arithmetic and the injectable clock the engine reads "today" from.

pub mod clock;
pub mod dates;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::{
    add_days, diff_days, extract_date_only, format_ymd, is_valid_date_string, is_within_range,
    parse_utc, today,
};
