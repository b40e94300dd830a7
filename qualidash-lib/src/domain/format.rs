//! Human-readable rendering of instants and durations used in report texts.

use chrono::{DateTime, Datelike, TimeDelta, Utc};

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Format an instant as `<day> <month>`, optionally followed by the year.
///
/// The minimal instant is the sentinel for "measurement date unavailable" and renders as `unknown date`.
#[must_use]
pub fn format_date(date: Option<DateTime<Utc>>, with_year: bool) -> String {
    match date {
        Some(date) if date != DateTime::<Utc>::MIN_UTC => {
            let month = MONTHS[date.month0() as usize];
            if with_year {
                format!("{} {month} {}", date.day(), date.year())
            } else {
                format!("{} {month}", date.day())
            }
        }
        _ => "unknown date".to_string(),
    }
}

/// Format a duration using its largest non-zero unit out of days, hours and minutes.
#[must_use]
pub fn format_age(age: TimeDelta) -> String {
    let days = age.num_days();
    let hours = age.num_hours() % 24;
    let minutes = age.num_minutes() % 60;

    for (amount, singular, plural) in [(days, "day", "days"), (hours, "hour", "hours"), (minutes, "minute", "minutes")] {
        if amount > 1 {
            return format!("{amount} {plural}");
        }
        if amount == 1 {
            return format!("one {singular}");
        }
    }

    "less than a minute".to_string()
}
