//! Message grouping for presentation.
//!
//! Decides where date separators and sender headers go in a run of visible
//! messages. Recomputed from scratch on every render.

use chrono::{NaiveDate, TimeZone};
use streamchat_proto::Message;

/// Longest gap, in milliseconds, between two messages from the same sender
/// that still share a header.
pub const HEADER_GAP_MS: i64 = 60_000;

/// Layout decisions for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grouping {
    /// Starts a new calendar day; render a date separator above it.
    pub date_boundary: bool,
    /// Starts a new sender run; render author and time above it.
    pub header_boundary: bool,
}

/// Grouping decisions for `messages` in display order, using `tz` for
/// calendar dates.
///
/// A message opens a date boundary when it is first or falls on a different
/// local date than its predecessor. It opens a header boundary when it is
/// first, its sender differs, more than [`HEADER_GAP_MS`] elapsed, or it opens
/// a date boundary.
pub fn groupings<'a, I, Tz>(messages: I, tz: &Tz) -> Vec<Grouping>
where
    I: IntoIterator<Item = &'a Message>,
    Tz: TimeZone,
{
    let mut previous: Option<&Message> = None;
    let mut result = Vec::new();

    for message in messages {
        let grouping = match previous {
            None => Grouping { date_boundary: true, header_boundary: true },
            Some(prev) => {
                let date_boundary =
                    local_date(message.timestamp, tz) != local_date(prev.timestamp, tz);
                let gap = message.timestamp.saturating_sub(prev.timestamp);
                let header_boundary =
                    date_boundary || prev.author != message.author || gap > HEADER_GAP_MS;
                Grouping { date_boundary, header_boundary }
            },
        };
        result.push(grouping);
        previous = Some(message);
    }

    result
}

/// Calendar date of a Unix-millisecond `timestamp` in `tz`.
pub fn local_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(timestamp).single().map(|dt| dt.date_naive())
}

/// Separator label: "Today", "Yesterday", or e.g. "Monday, Jan 5".
pub fn date_label<Tz: TimeZone>(timestamp: i64, today: NaiveDate, tz: &Tz) -> String {
    let Some(date) = local_date(timestamp, tz) else {
        return "Unknown date".to_owned();
    };

    if date == today {
        "Today".to_owned()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_owned()
    } else {
        date.format("%A, %b %-d").to_string()
    }
}

/// Header time, "HH:MM" in `tz`.
pub fn time_label<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    tz.timestamp_millis_opt(timestamp)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}
