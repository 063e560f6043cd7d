//! Priority board columns and counts.

use crate::model::item::{Item, Priority};

/// Items grouped into the three board columns, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorityBuckets<'a> {
    pub high: Vec<&'a Item>,
    pub medium: Vec<&'a Item>,
    pub low: Vec<&'a Item>,
}

impl<'a> PriorityBuckets<'a> {
    /// Column for `priority`; unrecognized priorities have no column.
    pub fn column(&self, priority: &Priority) -> &[&'a Item] {
        match priority {
            Priority::High => &self.high,
            Priority::Medium => &self.medium,
            Priority::Low => &self.low,
            Priority::Unrecognized(_) => &[],
        }
    }

    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }
}

/// Partitions items by priority and sorts each column by `created_at`
/// descending. Sorting is stable, so equal timestamps keep input order.
/// Items with an unrecognized priority are left out.
pub fn bucket_by_priority<'a, I>(items: I) -> PriorityBuckets<'a>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut buckets = PriorityBuckets::default();
    for item in items {
        match item.priority {
            Priority::High => buckets.high.push(item),
            Priority::Medium => buckets.medium.push(item),
            Priority::Low => buckets.low.push(item),
            Priority::Unrecognized(_) => {}
        }
    }
    for column in [&mut buckets.high, &mut buckets.medium, &mut buckets.low] {
        column.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
    buckets
}

/// Per-priority totals over a whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: &Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
            Priority::Unrecognized(_) => 0,
        }
    }
}

/// Counts items per priority. Pass the unfiltered collection; counts do not
/// follow the search box.
pub fn priority_counts(items: &[Item]) -> PriorityCounts {
    items
        .iter()
        .fold(PriorityCounts::default(), |mut counts, item| {
            match item.priority {
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
                Priority::Unrecognized(_) => {}
            }
            counts
        })
}
