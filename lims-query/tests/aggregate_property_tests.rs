//! Property tests for the pure aggregation helpers backing the change
//! queries.

use lims_query::schema::{Process, Project};
use lims_query::{dedupe_processes, union_project_luids};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn project_batches() -> impl Strategy<Value = Vec<Vec<Project>>> {
    let project = (0i32..64, "[A-D][0-9]{2}").prop_map(|(project_id, luid)| Project {
        project_id,
        luid,
        ..Default::default()
    });
    proptest::collection::vec(proptest::collection::vec(project, 0..8), 0..8)
}

fn process_batches() -> impl Strategy<Value = Vec<Vec<Process>>> {
    let process = (0i32..64).prop_map(|process_id| Process {
        process_id,
        ..Default::default()
    });
    proptest::collection::vec(proptest::collection::vec(process, 0..8), 0..6)
}

proptest! {
    /// The union is exactly the set of input luids - nothing dropped,
    /// nothing invented, no duplicates by construction.
    #[test]
    fn luid_union_is_exact(batches in project_batches()) {
        let expected: BTreeSet<String> = batches
            .iter()
            .flatten()
            .map(|p| p.luid.clone())
            .collect();
        prop_assert_eq!(union_project_luids(batches), expected);
    }

    /// Adding more dependency paths can only grow the result: the union
    /// over a prefix of the batches is a subset of the union over all.
    #[test]
    fn luid_union_is_monotonic(batches in project_batches(), split in 0usize..8) {
        let split = split.min(batches.len());
        let partial = union_project_luids(batches[..split].to_vec());
        let full = union_project_luids(batches);
        prop_assert!(partial.is_subset(&full));
    }

    /// Merged processes carry each input process id exactly once.
    #[test]
    fn process_merge_dedupes_exactly(batches in process_batches()) {
        let expected: BTreeSet<i32> = batches
            .iter()
            .flatten()
            .map(|p| p.process_id)
            .collect();
        let merged = dedupe_processes(batches);
        let ids: Vec<i32> = merged.iter().map(|p| p.process_id).collect();
        let unique: BTreeSet<i32> = ids.iter().copied().collect();
        prop_assert_eq!(ids.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }
}
