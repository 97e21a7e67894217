use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Wall clock for console timestamps and the `@today` placeholder
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: UtcOffset,
    frozen: Option<OffsetDateTime>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock {
    pub fn utc() -> Self {
        Self {
            offset: UtcOffset::UTC,
            frozen: None,
        }
    }

    /// Local time. Must be called before any threads are spawned, otherwise
    /// the offset cannot be determined and UTC is used.
    pub fn local() -> Self {
        let offset = UtcOffset::current_local_offset().unwrap_or_else(|err| {
            tracing::debug!(%err, "local offset unavailable, using UTC");
            UtcOffset::UTC
        });
        Self {
            offset,
            frozen: None,
        }
    }

    /// A clock stuck at `at`
    pub fn fixed(at: OffsetDateTime) -> Self {
        Self {
            offset: at.offset(),
            frozen: Some(at),
        }
    }

    pub fn now(&self) -> OffsetDateTime {
        self.frozen
            .unwrap_or_else(|| OffsetDateTime::now_utc().to_offset(self.offset))
    }

    /// `HH:MM:SS`
    pub fn time_label(&self) -> String {
        format_with(self.now(), TIME_FORMAT)
    }

    /// `YYYY-MM-DD`
    pub fn date_label(&self) -> String {
        format_with(self.now(), DATE_FORMAT)
    }
}

fn format_with(at: OffsetDateTime, format: &[BorrowedFormatItem<'_>]) -> String {
    at.format(format).unwrap_or_else(|_| "--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_fixed_clock_labels() {
        let clock = Clock::fixed(datetime!(2024-03-09 07:05:03 UTC));
        assert_eq!(clock.time_label(), "07:05:03");
        assert_eq!(clock.date_label(), "2024-03-09");
    }

    #[test]
    fn test_fixed_clock_keeps_offset() {
        let clock = Clock::fixed(datetime!(2024-03-09 23:30:00 +02:00));
        assert_eq!(clock.time_label(), "23:30:00");
    }

    #[test]
    fn test_utc_label_shape() {
        let label = Clock::utc().time_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.as_bytes()[2], b':');
    }
}
