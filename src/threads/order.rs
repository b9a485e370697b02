use std::fmt;

use super::models::Thread;

/// An adjacent pair where the later thread is newer than the one before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation {
    pub index: usize,
    pub id: String,
    pub date: i64,
    pub previous_index: usize,
    pub previous_id: String,
    pub previous_date: i64,
}

impl fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "thread {} (index {}, date {}) is newer than thread {} (index {}, date {})",
            self.id, self.index, self.date, self.previous_id, self.previous_index, self.previous_date
        )
    }
}

/// Result of scanning a listing for descending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderReport {
    pub checked: usize,
    pub violations: Vec<OrderViolation>,
}

impl OrderReport {
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check that `threads` is sorted by non-increasing latest-activity date.
///
/// Ties are allowed. Every offending adjacent pair is reported, the scan
/// does not stop at the first one.
#[must_use]
pub fn check_descending(threads: &[Thread]) -> OrderReport {
    let violations = threads
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1].date() > pair[0].date())
        .map(|(i, pair)| OrderViolation {
            index: i + 1,
            id: pair[1].id.clone(),
            date: pair[1].date(),
            previous_index: i,
            previous_id: pair[0].id.clone(),
            previous_date: pair[0].date(),
        })
        .collect();

    OrderReport {
        checked: threads.len(),
        violations,
    }
}
