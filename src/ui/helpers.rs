use chrono::{DateTime, Datelike, Days, Local, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Convert an entry timestamp (milliseconds since epoch) into local time.
/// Returns `None` for timestamps outside chrono's representable range, which
/// only happens if the stored blob was edited by hand.
pub(crate) fn local_time(ts_ms: i64) -> Option<DateTime<Local>> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms).map(|dt| dt.with_timezone(&Local))
}

/// Header line for the capture screen, e.g. `Friday, Aug 30 • 3:04 PM`.
pub(crate) fn format_header(now: DateTime<Local>) -> String {
    format!(
        "{} • {}",
        now.format("%A, %b %-d"),
        now.format("%-I:%M %p")
    )
}

/// Compact timestamp for a feed card: the clock time for entries from today,
/// `Yesterday` for the day before, otherwise a short month-and-day date.
pub(crate) fn format_relative(ts_ms: i64) -> String {
    format_relative_at(ts_ms, Local::now())
}

fn format_relative_at(ts_ms: i64, now: DateTime<Local>) -> String {
    let Some(when) = local_time(ts_ms) else {
        return "?".to_string();
    };

    let today = now.date_naive();
    let entry_day = when.date_naive();

    if entry_day == today {
        when.format("%-I:%M %p").to_string()
    } else if today
        .checked_sub_days(Days::new(1))
        .is_some_and(|yesterday| entry_day == yesterday)
    {
        "Yesterday".to_string()
    } else if entry_day.year() == today.year() {
        when.format("%b %-d").to_string()
    } else {
        when.format("%b %-d, %Y").to_string()
    }
}

/// Produce a rectangle centered within `area` that spans the requested
/// percent of the width and height. Used for the note modal.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn todays_entries_show_the_clock_time() {
        let now = Local::now();
        let ts = now.timestamp_millis();
        let rendered = format_relative_at(ts, now);
        assert!(
            rendered.contains(':'),
            "expected a clock time, got {rendered}"
        );
    }

    #[test]
    fn yesterdays_entries_say_yesterday() {
        let now = Local::now();
        let ts = (now - Duration::hours(24)).timestamp_millis();
        // Exactly 24 hours back always lands on the previous calendar day.
        assert_eq!(format_relative_at(ts, now), "Yesterday");
    }

    #[test]
    fn older_entries_show_a_short_date() {
        let now = Local::now();
        let when = now - Duration::days(10);
        let rendered = format_relative_at(when.timestamp_millis(), now);
        assert_eq!(rendered, when.format("%b %-d").to_string());
    }

    #[test]
    fn unrepresentable_timestamps_do_not_panic() {
        assert_eq!(format_relative_at(i64::MAX, Local::now()), "?");
    }

    #[test]
    fn centered_rect_stays_inside_the_area() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(60, 30, area);
        assert!(rect.x >= area.x && rect.right() <= area.right());
        assert!(rect.y >= area.y && rect.bottom() <= area.bottom());
    }
}
