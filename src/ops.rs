use std::{
    fmt::{Debug, Formatter},
    iter::successors,
    ops::Sub,
};

use chrono::{DateTime, TimeDelta, Utc};

pub type TimeRange = RangeExclusive<DateTime<Utc>>;

#[must_use]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct RangeExclusive<T: Copy> {
    pub start: T,
    pub end: T,
}

impl<T: Copy + Debug> Debug for RangeExclusive<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl<T: Copy> RangeExclusive<T> {
    pub const fn with_start(mut self, start: T) -> Self {
        self.start = start;
        self
    }
}

impl<T: Copy + Sub> RangeExclusive<T> {
    #[must_use]
    pub fn len(self) -> <T as Sub>::Output {
        self.end - self.start
    }
}

impl TimeRange {
    /// Split the range into consecutive windows of the given span.
    ///
    /// Each window starts where the previous one nominally ended, and only the last window
    /// may be shorter: its end is clamped to the range end, as is a window reaching past the
    /// representable time. An empty range yields nothing.
    pub fn windows(self, span: TimeDelta) -> impl Iterator<Item = Self> {
        assert!(span > TimeDelta::zero(), "window span must be positive");
        let end = self.end;
        successors(Some(self.start), move |start| start.checked_add_signed(span))
            .take_while(move |start| *start < end)
            .map(move |start| Self {
                start,
                end: start.checked_add_signed(span).map_or(end, |window_end| window_end.min(end)),
            })
    }
}
