//! List projection: filter, stable sort and truncate.
//!
//! Every list page (markets, traders, following) derives what it displays
//! from the same pipeline:
//!
//! ```text
//! records ──filter──▶ kept ──stable sort──▶ ordered ──take(n)──▶ view
//! ```
//!
//! The functions here borrow their input and never mutate it. Sorting is
//! stable, so records sharing a sort key keep their original relative order,
//! and the result is fully determined by `(records, predicate, compare)`.

use std::cmp::Ordering;

/// Direction applied on top of a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Largest value first.
    #[default]
    Descending,
    Ascending,
}

impl SortDirection {
    /// Flip the direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Descending => Self::Ascending,
            Self::Ascending => Self::Descending,
        }
    }

    /// Apply the direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Descending => ordering.reverse(),
            Self::Ascending => ordering,
        }
    }

    /// Arrow shown next to sort labels.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Descending => "↓",
            Self::Ascending => "↑",
        }
    }
}

/// A filter selection that decides whether a record is kept.
pub trait Selector<T> {
    /// Returns true if the record should be kept.
    fn matches(&self, record: &T) -> bool;
}

/// A sort selection that orders two records in ascending key order.
pub trait SortKey<T> {
    /// Compare two records by this key, smallest first.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Keeps every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl<T> Selector<T> for KeepAll {
    fn matches(&self, _record: &T) -> bool {
        true
    }
}

/// Filter records, then stable-sort the kept subset.
pub fn project<'a, T, P, C>(records: &'a [T], predicate: P, mut compare: C) -> Vec<&'a T>
where
    P: Fn(&T) -> bool,
    C: FnMut(&T, &T) -> Ordering,
{
    let mut kept: Vec<&T> = records.iter().filter(|&record| predicate(record)).collect();
    // `sort_by` is a stable merge sort.
    kept.sort_by(|a, b| compare(*a, *b));
    kept
}

/// Keep at most the first `n` elements.
pub fn take<T>(mut sequence: Vec<T>, n: usize) -> Vec<T> {
    sequence.truncate(n);
    sequence
}

/// Find the first record matching the predicate.
pub fn find<'a, T, P>(records: &'a [T], predicate: P) -> Option<&'a T>
where
    P: Fn(&T) -> bool,
{
    records.iter().find(|&record| predicate(record))
}

/// Comparator ordering records by a key, largest first.
pub fn descending_by<T, K, F>(key: F) -> impl Fn(&T, &T) -> Ordering
where
    K: Ord,
    F: Fn(&T) -> K,
{
    move |a, b| key(b).cmp(&key(a))
}

/// Comparator ordering records by a key, smallest first.
pub fn ascending_by<T, K, F>(key: F) -> impl Fn(&T, &T) -> Ordering
where
    K: Ord,
    F: Fn(&T) -> K,
{
    move |a, b| key(a).cmp(&key(b))
}

/// Comparator that keeps input order.
pub fn identity<T>(_a: &T, _b: &T) -> Ordering {
    Ordering::Equal
}

/// A page's filter/sort/limit selection, applied as one projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection<F, S> {
    /// Filter selection.
    pub filter: F,
    /// Sort key selection.
    pub sort: S,
    /// Direction of the sort key.
    pub direction: SortDirection,
    /// Optional truncation after sorting.
    pub limit: Option<usize>,
}

impl<F, S> Projection<F, S> {
    /// Create an unlimited, descending projection.
    pub fn new(filter: F, sort: S) -> Self {
        Self {
            filter,
            sort,
            direction: SortDirection::Descending,
            limit: None,
        }
    }

    /// Set the sort direction.
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Limit the output to the first `n` records.
    pub fn with_limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Apply the projection to a slice of records.
    pub fn apply<'a, T>(&self, records: &'a [T]) -> Vec<&'a T>
    where
        F: Selector<T>,
        S: SortKey<T>,
    {
        let ordered = project(
            records,
            |record| self.filter.matches(record),
            |a, b| self.direction.apply(self.sort.compare(a, b)),
        );
        match self.limit {
            Some(n) => take(ordered, n),
            None => ordered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: &'static str,
        win_rate: u32,
        group: &'static str,
    }

    fn row(id: &'static str, win_rate: u32, group: &'static str) -> Row {
        Row {
            id,
            win_rate,
            group,
        }
    }

    fn sample() -> Vec<Row> {
        vec![
            row("A", 70, "国际政治"),
            row("B", 90, "地缘政治"),
            row("C", 90, "国际政治"),
            row("D", 55, "地缘政治"),
            row("E", 70, "国际政治"),
        ]
    }

    fn ids(rows: &[&Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.id).collect()
    }

    #[derive(Clone)]
    struct ByWinRate;

    impl SortKey<Row> for ByWinRate {
        fn compare(&self, a: &Row, b: &Row) -> Ordering {
            a.win_rate.cmp(&b.win_rate)
        }
    }

    #[derive(Clone)]
    struct Group(&'static str);

    impl Selector<Row> for Group {
        fn matches(&self, record: &Row) -> bool {
            record.group == self.0
        }
    }

    #[test]
    fn test_stable_tie_break_descending() {
        let records = vec![row("A", 70, "x"), row("B", 90, "x"), row("C", 90, "x")];
        let out = project(&records, |_| true, descending_by(|r: &Row| r.win_rate));
        assert_eq!(ids(&out), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_keep_all_is_a_permutation() {
        let records = sample();
        let out = project(&records, |_| true, descending_by(|r: &Row| r.win_rate));
        assert_eq!(out.len(), records.len());

        let mut out_ids = ids(&out);
        let mut in_ids: Vec<_> = records.iter().map(|r| r.id).collect();
        out_ids.sort();
        in_ids.sort();
        assert_eq!(out_ids, in_ids);
    }

    #[test]
    fn test_filter_soundness_and_completeness() {
        let records = sample();
        let out = project(&records, |r| r.group == "国际政治", identity);

        assert!(out.iter().all(|r| r.group == "国际政治"));
        let expected = records.iter().filter(|r| r.group == "国际政治").count();
        assert_eq!(out.len(), expected);
        // identity comparator keeps original relative order
        assert_eq!(ids(&out), vec!["A", "C", "E"]);
    }

    #[test]
    fn test_output_is_ordered_and_stable() {
        let records = sample();
        let out = project(&records, |_| true, descending_by(|r: &Row| r.win_rate));

        for pair in out.windows(2) {
            assert!(pair[0].win_rate >= pair[1].win_rate);
        }
        // A and E share 70, B and C share 90
        assert_eq!(ids(&out), vec!["B", "C", "A", "E", "D"]);
    }

    #[test]
    fn test_ascending_is_stable_too() {
        let records = sample();
        let out = project(&records, |_| true, ascending_by(|r: &Row| r.win_rate));
        assert_eq!(ids(&out), vec!["D", "A", "E", "B", "C"]);
    }

    #[test]
    fn test_take_bounds() {
        let records = sample();
        let out = project(&records, |_| true, identity);

        assert_eq!(take(out.clone(), 10), out);
        assert_eq!(take(out.clone(), records.len()), out);
        assert!(take(out.clone(), 0).is_empty());
        assert_eq!(ids(&take(out, 2)), vec!["A", "B"]);
    }

    #[test]
    fn test_idempotent() {
        let records = sample();
        let first = project(&records, |r| r.win_rate > 60, descending_by(|r: &Row| r.win_rate));
        let second = project(&records, |r| r.win_rate > 60, descending_by(|r: &Row| r.win_rate));
        assert_eq!(first, second);
        // input untouched
        assert_eq!(records, sample());
    }

    #[test]
    fn test_find_not_found() {
        let empty: Vec<Row> = Vec::new();
        assert!(find(&empty, |r| r.id == "A").is_none());

        let records = sample();
        assert!(find(&records, |r| r.id == "Z").is_none());
        assert_eq!(find(&records, |r| r.id == "C").map(|r| r.win_rate), Some(90));
    }

    #[test]
    fn test_projection_apply() {
        let records = sample();
        let projection = Projection::new(Group("国际政治"), ByWinRate);
        assert_eq!(ids(&projection.apply(&records)), vec!["C", "A", "E"]);

        let limited = projection
            .clone()
            .with_direction(SortDirection::Ascending)
            .with_limit(2);
        assert_eq!(ids(&limited.apply(&records)), vec!["A", "E"]);
    }

    #[test]
    fn test_keep_all_selector() {
        let records = sample();
        let projection = Projection::new(KeepAll, ByWinRate).with_limit(0);
        assert!(projection.apply(&records).is_empty());
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(
            SortDirection::Descending.toggled(),
            SortDirection::Ascending
        );
        assert_eq!(
            SortDirection::Descending.apply(Ordering::Less),
            Ordering::Greater
        );
    }
}
