//! Fixed-stride timeline generation.
//!
//! A `Timeline` is a lazy, finite, strictly increasing sequence of
//! timestamps `start, start + 15min, ...` that includes `end` when it lies
//! on the stride. Both ends are inclusive on every export path.

use chrono::{NaiveDateTime, TimeDelta};

use crate::model::{DateRange, SensorSeries};

/// Distance between two consecutive timeline rows.
pub const STRIDE_MINUTES: i64 = 15;

pub fn stride() -> TimeDelta {
    TimeDelta::minutes(STRIDE_MINUTES)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
}

impl Timeline {
    /// Timeline from `start` through `end`, inclusive. Empty when
    /// `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }

    pub fn empty() -> Self {
        Self {
            next: None,
            end: NaiveDateTime::MIN,
        }
    }

    /// Resolves the timeline for a set of deduplicated series.
    ///
    /// - With data: from the earliest reading through the latest reading.
    ///   Rows step from that first reading, so it always lands on a row.
    /// - Without data: the requested range, but only when both of its
    ///   bounds were given.
    /// - Otherwise empty. An open-ended range never produces rows.
    pub fn spanning(series: &[SensorSeries], range: &DateRange) -> Self {
        let earliest = series.iter().filter_map(SensorSeries::first_timestamp).min();
        let latest = series.iter().filter_map(SensorSeries::last_timestamp).max();

        match (earliest, latest) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => match range.bounds() {
                Some((from, to)) => Self::new(from, to),
                None => Self::empty(),
            },
        }
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.next
    }
}

impl Iterator for Timeline {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        let current = self.next?;
        self.next = current
            .checked_add_signed(stride())
            .filter(|t| *t <= self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(next) => {
                let steps = (self.end - next).num_seconds() / stride().num_seconds();
                steps as usize + 1
            }
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Timeline {}

impl std::iter::FusedIterator for Timeline {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_inclusive_of_both_ends() {
        let stamps: Vec<_> = Timeline::new(at(0, 0), at(0, 45)).collect();
        assert_eq!(stamps, vec![at(0, 0), at(0, 15), at(0, 30), at(0, 45)]);
    }

    #[test]
    fn test_end_off_grid_is_not_exceeded() {
        let stamps: Vec<_> = Timeline::new(at(0, 0), at(0, 40)).collect();
        assert_eq!(stamps, vec![at(0, 0), at(0, 15), at(0, 30)]);
    }

    #[test]
    fn test_single_point_when_start_equals_end() {
        let stamps: Vec<_> = Timeline::new(at(6, 0), at(6, 0)).collect();
        assert_eq!(stamps, vec![at(6, 0)]);
    }

    #[test]
    fn test_start_after_end_is_empty() {
        assert_eq!(Timeline::new(at(1, 0), at(0, 0)).count(), 0);
    }

    #[test]
    fn test_len_matches_floor_formula() {
        for (start, end) in [
            (at(0, 0), at(0, 0)),
            (at(0, 0), at(0, 14)),
            (at(0, 0), at(0, 15)),
            (at(0, 7), at(3, 52)),
            (at(0, 0), at(23, 45)),
        ] {
            let expected = ((end - start).num_seconds() / 900) as usize + 1;
            let timeline = Timeline::new(start, end);
            assert_eq!(timeline.len(), expected);
            assert_eq!(timeline.count(), expected);
        }
    }

    #[test]
    fn test_strictly_increasing_with_constant_stride() {
        let stamps: Vec<_> = Timeline::new(at(0, 5), at(12, 0)).collect();
        for pair in stamps.windows(2) {
            assert_eq!(pair[1] - pair[0], TimeDelta::minutes(15));
        }
    }

    #[test]
    fn test_spanning_uses_observed_data() {
        let mut a = SensorSeries::new("A");
        a.values.insert(at(0, 15), 1.0);
        let mut b = SensorSeries::new("B");
        b.values.insert(at(1, 0), 2.0);

        let range = DateRange::new(Some(at(0, 0)), Some(at(5, 0)));
        let stamps: Vec<_> = Timeline::spanning(&[a, b], &range).collect();
        assert_eq!(stamps.first(), Some(&at(0, 15)));
        assert_eq!(stamps.last(), Some(&at(1, 0)));
        assert_eq!(stamps.len(), 4);
    }

    #[test]
    fn test_spanning_starts_at_off_grid_first_reading() {
        let mut a = SensorSeries::new("A");
        a.values.insert(at(0, 7), 1.0);
        a.values.insert(at(0, 37), 3.0);

        let stamps: Vec<_> = Timeline::spanning(&[a], &DateRange::all()).collect();
        assert_eq!(stamps, vec![at(0, 7), at(0, 22), at(0, 37)]);
    }

    #[test]
    fn test_spanning_without_data_falls_back_to_closed_range() {
        let range = DateRange::new(Some(at(0, 0)), Some(at(0, 30)));
        let series = vec![SensorSeries::new("A")];
        assert_eq!(Timeline::spanning(&series, &range).count(), 3);
    }

    #[test]
    fn test_spanning_without_data_and_open_range_is_empty() {
        let series = vec![SensorSeries::new("A")];
        assert_eq!(Timeline::spanning(&series, &DateRange::all()).count(), 0);
        let half_open = DateRange::new(Some(at(0, 0)), None);
        assert_eq!(Timeline::spanning(&series, &half_open).count(), 0);
        assert_eq!(Timeline::spanning(&[], &DateRange::all()).count(), 0);
    }

    #[test]
    fn test_spanning_degenerate_range_is_empty() {
        let range = DateRange::new(Some(at(5, 0)), Some(at(1, 0)));
        assert_eq!(Timeline::spanning(&[], &range).count(), 0);
    }
}
