//! Artifact ancestry edges.
//!
//! `artifact_ancestor_map` is a self-referential many-to-many relation:
//! one row says "this artifact derives from that ancestor artifact". The
//! lookups here are deliberately single-hop. Multi-hop lineage is the
//! caller walking the chain by repeated invocation; building a transitive
//! closure would change the observable query semantics.

use serde::Serialize;
use std::collections::BTreeSet;
use tokio_postgres::Row;

/// One edge of the ancestry relation: `artifact_id` derives from
/// `ancestor_artifact_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AncestorEdge {
    pub artifact_id: i32,
    pub ancestor_artifact_id: i32,
}

impl AncestorEdge {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            artifact_id: row.try_get("artifactid")?,
            ancestor_artifact_id: row.try_get("ancestorartifactid")?,
        })
    }
}

/// Direct (one-hop) ancestors of `artifact_id` within `edges`.
pub fn one_hop_ancestors(edges: &[AncestorEdge], artifact_id: i32) -> BTreeSet<i32> {
    edges
        .iter()
        .filter(|e| e.artifact_id == artifact_id)
        .map(|e| e.ancestor_artifact_id)
        .collect()
}

/// Direct (one-hop) descendants of `artifact_id` within `edges`.
pub fn one_hop_descendants(edges: &[AncestorEdge], artifact_id: i32) -> BTreeSet<i32> {
    edges
        .iter()
        .filter(|e| e.ancestor_artifact_id == artifact_id)
        .map(|e| e.artifact_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(artifact_id: i32, ancestor_artifact_id: i32) -> AncestorEdge {
        AncestorEdge {
            artifact_id,
            ancestor_artifact_id,
        }
    }

    #[test]
    fn one_hop_lookups_are_symmetric() {
        // 3 derives from 2, 2 derives from 1.
        let edges = vec![edge(3, 2), edge(2, 1), edge(3, 1)];

        assert_eq!(one_hop_ancestors(&edges, 3), BTreeSet::from([1, 2]));
        assert_eq!(one_hop_descendants(&edges, 1), BTreeSet::from([2, 3]));
        assert_eq!(one_hop_descendants(&edges, 2), BTreeSet::from([3]));
    }

    #[test]
    fn lookup_is_single_hop_not_transitive() {
        let edges = vec![edge(3, 2), edge(2, 1)];

        // 1 is a grandparent of 3; a single hop must not see it.
        assert!(!one_hop_ancestors(&edges, 3).contains(&1));
        assert!(!one_hop_descendants(&edges, 1).contains(&3));
    }

    #[test]
    fn unknown_artifact_yields_empty_set() {
        let edges = vec![edge(2, 1)];
        assert!(one_hop_ancestors(&edges, 99).is_empty());
        assert!(one_hop_descendants(&edges, 99).is_empty());
    }
}
