//! Splitting the requested pages across workers.
//!
//! Every worker gets `total / workers` consecutive page indices. What
//! happens to the `total % workers` pages left over depends on the
//! [`RemainderPolicy`].

use serde::Serialize;
use std::fmt;
use std::ops::Range;

use crate::config::RemainderPolicy;
use crate::error::{RepeatError, Result};

/// A half-open interval `[start, end)` of global page indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRange {
    /// First page index in the range.
    pub start: usize,
    /// One past the last page index in the range.
    pub end: usize,
}

impl PageRange {
    /// Create a range. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "page range start {start} > end {end}");
        Self { start, end }
    }

    /// Number of pages in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range holds no pages.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `page` falls inside the range.
    pub fn contains(&self, page: usize) -> bool {
        (self.start..self.end).contains(&page)
    }

    /// Iterate over the page indices in the range.
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The ranges handed out to workers, one per worker, ordered by start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Ranges in worker order.
    pub ranges: Vec<PageRange>,
    /// Pages the caller asked for.
    pub requested: usize,
    /// Requested pages that no range covers.
    pub dropped: usize,
}

impl Partition {
    /// Number of pages the ranges cover together.
    pub fn covered(&self) -> usize {
        self.ranges.iter().map(PageRange::len).sum()
    }

    /// Number of workers.
    pub fn workers(&self) -> usize {
        self.ranges.len()
    }
}

/// Split `total` pages into `workers` contiguous ranges.
///
/// # Errors
///
/// Returns [`RepeatError::InvalidConfig`] if `workers` is zero, or if the
/// policy is [`RemainderPolicy::Reject`] and `total` is not a multiple of
/// `workers`.
pub fn partition(total: usize, workers: usize, policy: RemainderPolicy) -> Result<Partition> {
    if workers == 0 {
        return Err(RepeatError::invalid_config(
            "Number of workers must be at least 1",
        ));
    }

    let per_worker = total / workers;
    let remainder = total % workers;

    if remainder != 0 && policy == RemainderPolicy::Reject {
        return Err(RepeatError::invalid_config(format!(
            "{total} pages cannot be split evenly across {workers} workers"
        )));
    }

    let mut ranges: Vec<PageRange> = (0..workers)
        .map(|i| PageRange::new(i * per_worker, (i + 1) * per_worker))
        .collect();

    let dropped = match policy {
        RemainderPolicy::Last => {
            if let Some(last) = ranges.last_mut() {
                last.end += remainder;
            }
            0
        }
        RemainderPolicy::Drop | RemainderPolicy::Reject => remainder,
    };

    Ok(Partition {
        ranges,
        requested: total,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Ranges are ordered, disjoint and contiguous from page 0.
    fn assert_contiguous(ranges: &[PageRange]) {
        let mut expected_start = 0;
        for range in ranges {
            assert_eq!(range.start, expected_start, "gap or overlap at {range}");
            assert!(range.start <= range.end);
            expected_start = range.end;
        }
    }

    #[rstest]
    #[case(0, 1)]
    #[case(0, 4)]
    #[case(8, 4)]
    #[case(12, 3)]
    #[case(100, 10)]
    #[case(7, 7)]
    #[case(5, 1)]
    fn test_divisible_totals_are_fully_covered(#[case] total: usize, #[case] workers: usize) {
        let p = partition(total, workers, RemainderPolicy::Drop).unwrap();

        assert_eq!(p.workers(), workers);
        assert_contiguous(&p.ranges);
        assert_eq!(p.covered(), total);
        assert_eq!(p.dropped, 0);
        assert!(p.ranges.iter().all(|r| r.len() == total / workers));
    }

    #[rstest]
    #[case(10, 4, 8, 2)]
    #[case(3, 4, 0, 3)]
    #[case(9, 2, 8, 1)]
    fn test_drop_policy_omits_remainder(
        #[case] total: usize,
        #[case] workers: usize,
        #[case] covered: usize,
        #[case] dropped: usize,
    ) {
        let p = partition(total, workers, RemainderPolicy::Drop).unwrap();

        assert_contiguous(&p.ranges);
        assert_eq!(p.covered(), covered);
        assert_eq!(p.covered(), workers * (total / workers));
        assert_eq!(p.dropped, dropped);
        assert_eq!(p.requested, total);
    }

    #[test]
    fn test_drop_policy_ranges_for_ten_pages() {
        let p = partition(10, 4, RemainderPolicy::Drop).unwrap();
        assert_eq!(
            p.ranges,
            vec![
                PageRange::new(0, 2),
                PageRange::new(2, 4),
                PageRange::new(4, 6),
                PageRange::new(6, 8),
            ]
        );
    }

    #[test]
    fn test_last_policy_extends_final_range() {
        let p = partition(10, 4, RemainderPolicy::Last).unwrap();

        assert_contiguous(&p.ranges);
        assert_eq!(p.covered(), 10);
        assert_eq!(p.dropped, 0);
        assert_eq!(p.ranges[3], PageRange::new(6, 10));
    }

    #[test]
    fn test_last_policy_with_fewer_pages_than_workers() {
        let p = partition(3, 4, RemainderPolicy::Last).unwrap();

        assert_contiguous(&p.ranges);
        assert!(p.ranges[..3].iter().all(PageRange::is_empty));
        assert_eq!(p.ranges[3], PageRange::new(0, 3));
    }

    #[test]
    fn test_reject_policy() {
        assert!(partition(10, 4, RemainderPolicy::Reject).is_err());
        assert!(partition(12, 4, RemainderPolicy::Reject).is_ok());
    }

    #[test]
    fn test_zero_workers_is_an_error() {
        let err = partition(8, 0, RemainderPolicy::Drop).unwrap_err();
        assert!(matches!(err, RepeatError::InvalidConfig { .. }));
    }

    #[test]
    fn test_page_range_helpers() {
        let r = PageRange::new(2, 5);
        assert_eq!(r.len(), 3);
        assert!(!r.is_empty());
        assert!(r.contains(2));
        assert!(r.contains(4));
        assert!(!r.contains(5));
        assert_eq!(r.indices().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(r.to_string(), "[2, 5)");
        assert!(PageRange::new(3, 3).is_empty());
    }
}
