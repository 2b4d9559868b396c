use crate::model::RepositorySnapshot;

/// Selects the snapshots worth reporting, preserving their order.
///
/// With `skip_unchanged` set, snapshots with all six buckets empty are dropped,
/// whether or not they carry branch info.
pub fn filter_snapshots<'a, I>(snapshots: I, skip_unchanged: bool) -> Vec<&'a RepositorySnapshot>
where
    I: IntoIterator<Item = &'a RepositorySnapshot>,
{
    snapshots
        .into_iter()
        .filter(|snapshot| !skip_unchanged || !snapshot.is_unchanged())
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub shown: usize,
    pub hidden: usize,
}

impl FilterSummary {
    pub fn total(&self) -> usize {
        self.shown + self.hidden
    }
}

pub fn summarize<'a, I>(snapshots: I, skip_unchanged: bool) -> FilterSummary
where
    I: IntoIterator<Item = &'a RepositorySnapshot>,
{
    snapshots
        .into_iter()
        .fold(FilterSummary::default(), |mut summary, snapshot| {
            if skip_unchanged && snapshot.is_unchanged() {
                summary.hidden += 1;
            } else {
                summary.shown += 1;
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::{filter_snapshots, summarize, FilterSummary};
    use crate::model::{RepositorySnapshot, StatusCode};

    fn sample() -> Vec<RepositorySnapshot> {
        let mut dirty = RepositorySnapshot::new("dirty");
        dirty.record(StatusCode::Untracked, "notes.txt");
        let mut tracked = RepositorySnapshot::new("clean");
        tracked.branch.local = "main".to_string();
        vec![RepositorySnapshot::new("empty"), dirty, tracked]
    }

    #[test]
    fn show_all_keeps_everything() {
        let snapshots = sample();
        let names: Vec<_> = filter_snapshots(&snapshots, false)
            .into_iter()
            .map(|snapshot| snapshot.name.as_str())
            .collect();
        assert_eq!(names, vec!["empty", "dirty", "clean"]);
    }

    #[test]
    fn skip_unchanged_drops_clean_and_empty() {
        let snapshots = sample();
        let names: Vec<_> = filter_snapshots(&snapshots, true)
            .into_iter()
            .map(|snapshot| snapshot.name.as_str())
            .collect();
        assert_eq!(names, vec!["dirty"]);
    }

    #[test]
    fn summarize_counts_hidden() {
        let snapshots = sample();
        assert_eq!(
            summarize(&snapshots, true),
            FilterSummary {
                shown: 1,
                hidden: 2
            }
        );
        assert_eq!(summarize(&snapshots, false).hidden, 0);
        assert_eq!(summarize(&snapshots, false).total(), 3);
    }
}
