//! Process-type change query: which processes of the given types changed
//! in the last interval, either through their own row or through an
//! attached UDF.

use crate::client::LimsClient;
use crate::error::LimsResult;
use crate::interval::Interval;
use lims_schema::Process;
use std::collections::BTreeMap;

impl LimsClient {
    /// Processes of the given types whose row OR any attached UDF was
    /// modified within the window.
    ///
    /// The two match paths are separate queries unioned by `processid`:
    /// the direct path carries no UDF join, so a process with zero UDF
    /// rows still matches on its own modification. An empty type list
    /// matches nothing and issues no SQL.
    pub async fn last_modified_processes(
        &self,
        type_ids: &[i32],
        within: &Interval,
    ) -> LimsResult<Vec<Process>> {
        if type_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn().await?;
        let direct = self
            .query_rows(
                &conn,
                "SELECT pro.* FROM process pro \
                 WHERE pro.typeid = ANY($1) \
                 AND age(now(), pro.lastmodifieddate) < $2::text::interval",
                &[&type_ids, &within.as_pg()],
            )
            .await?;
        let via_udf = self
            .query_rows(
                &conn,
                "SELECT DISTINCT pro.* FROM process pro \
                 INNER JOIN processudfstorage pus ON pus.processid = pro.processid \
                 WHERE pro.typeid = ANY($1) \
                 AND age(now(), pus.lastmodifieddate) < $2::text::interval",
                &[&type_ids, &within.as_pg()],
            )
            .await?;

        let direct = direct
            .iter()
            .map(Process::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        let via_udf = via_udf
            .iter()
            .map(Process::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let merged = dedupe_processes([direct, via_udf]);
        tracing::debug!(
            window = %within,
            types = type_ids.len(),
            processes = merged.len(),
            "process change query done"
        );
        Ok(merged)
    }
}

/// Union process batches, collapsing duplicate `processid`s. The first
/// occurrence of a process wins; order is by process id.
pub fn dedupe_processes<I>(batches: I) -> Vec<Process>
where
    I: IntoIterator<Item = Vec<Process>>,
{
    let mut by_id = BTreeMap::new();
    for process in batches.into_iter().flatten() {
        by_id.entry(process.process_id).or_insert(process);
    }
    by_id.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(process_id: i32) -> Process {
        Process {
            process_id,
            ..Default::default()
        }
    }

    #[test]
    fn merging_both_paths_collapses_duplicates() {
        // A process matched by both its row and its UDF appears once.
        let merged = dedupe_processes([
            vec![process(10), process(11)],
            vec![process(11), process(12)],
        ]);
        let ids: Vec<i32> = merged.iter().map(|p| p.process_id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn duplicates_within_one_path_also_collapse() {
        let merged = dedupe_processes([vec![process(5), process(5)]]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn empty_batches_merge_to_empty() {
        assert!(dedupe_processes([Vec::new(), Vec::new()]).is_empty());
    }
}
