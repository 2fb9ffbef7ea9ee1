//! Career timeline ordering
//!
//! Oldest start first. A missing start sorts before every dated record; on
//! equal starts the earlier end wins and a missing end (still ongoing)
//! sorts last.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::{Activity, PublicOffice, TimelineEntry, Topic};

/// Anything with an open-ended date interval
pub trait Dated {
    fn start_date(&self) -> Option<NaiveDate>;
    fn end_date(&self) -> Option<NaiveDate>;
}

impl Dated for PublicOffice {
    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

impl Dated for Activity {
    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

impl Dated for Topic {
    fn start_date(&self) -> Option<NaiveDate> {
        self.date_from
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.date_to
    }
}

impl Dated for TimelineEntry {
    fn start_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Office(o) => o.start_date,
            Self::Activity(a) => a.start_date,
        }
    }

    fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Office(o) => o.end_date,
            Self::Activity(a) => a.end_date,
        }
    }
}

/// Compare two intervals by the timeline rule
pub fn compare_intervals(
    a: (Option<NaiveDate>, Option<NaiveDate>),
    b: (Option<NaiveDate>, Option<NaiveDate>),
) -> Ordering {
    // `None < Some` gives "missing start is earliest" for free.
    a.0.cmp(&b.0).then_with(|| match (a.1, b.1) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

pub fn timeline_order<A: Dated + ?Sized, B: Dated + ?Sized>(a: &A, b: &B) -> Ordering {
    compare_intervals(
        (a.start_date(), a.end_date()),
        (b.start_date(), b.end_date()),
    )
}

/// Stable in-place sort by the timeline rule
pub fn sort_timeline<T: Dated>(items: &mut [T]) {
    items.sort_by(timeline_order);
}

/// Merge a profile's offices and activities into one ordered sequence.
/// Entries that compare equal keep offices ahead of activities.
pub fn merge_timeline(offices: Vec<PublicOffice>, activities: Vec<Activity>) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = offices
        .into_iter()
        .map(TimelineEntry::Office)
        .chain(activities.into_iter().map(TimelineEntry::Activity))
        .collect();
    sort_timeline(&mut entries);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Option<NaiveDate> {
        crate::normalize::parse_date(s)
    }

    #[test]
    fn test_missing_start_sorts_first() {
        let undated = (None, None);
        let dated = (date("1950-01-01"), date("1955-01-01"));
        assert_eq!(compare_intervals(undated, dated), Ordering::Less);
    }

    #[test]
    fn test_open_end_sorts_last_on_equal_start() {
        let closed = (date("2010-01"), date("2012-01"));
        let open = (date("2010-01"), None);
        assert_eq!(compare_intervals(closed, open), Ordering::Less);
        assert_eq!(compare_intervals(open, closed), Ordering::Greater);
        assert_eq!(compare_intervals(open, open), Ordering::Equal);
    }

    #[test]
    fn test_start_dominates_end() {
        let early_open = (date("2001-05-01"), None);
        let late_closed = (date("2003-01-01"), date("2004-01-01"));
        assert_eq!(compare_intervals(early_open, late_closed), Ordering::Less);
    }
}
