//! Lineage traversal over the artifact ancestry graph.
//!
//! Every traversal here is exactly one hop through
//! `artifact_ancestor_map`: input artifact -> ancestor/descendant ->
//! producing/consuming process. Deeper lineage is walked by the caller
//! through repeated invocation; nothing here computes a transitive
//! closure.

use crate::client::LimsClient;
use crate::error::LimsResult;
use crate::process::dedupe_processes;
use lims_schema::{AncestorEdge, Artifact, OutputMapping, Process, ProcessIoTracker};

impl LimsClient {
    /// Processes of the given types whose output artifacts are one-hop
    /// ancestors of the parent process's input artifacts.
    ///
    /// An empty type list yields an empty result, never "no filter".
    pub async fn processes_in_history(
        &self,
        parent_process_id: i32,
        type_ids: &[i32],
    ) -> LimsResult<Vec<Process>> {
        if type_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.traversal_query(
            "SELECT DISTINCT pro.* FROM process pro \
             INNER JOIN processiotracker piot ON piot.processid = pro.processid \
             INNER JOIN outputmapping om ON om.trackerid = piot.trackerid \
             INNER JOIN artifact_ancestor_map aam ON aam.ancestorartifactid = om.outputartifactid \
             INNER JOIN processiotracker piot2 ON piot2.inputartifactid = aam.artifactid \
             WHERE piot2.processid = $1 AND pro.typeid = ANY($2)",
            parent_process_id,
            type_ids,
        )
        .await
    }

    /// Processes of the given types that consume artifacts descending
    /// one hop from the parent process's output artifacts.
    pub async fn children_processes(
        &self,
        parent_process_id: i32,
        type_ids: &[i32],
    ) -> LimsResult<Vec<Process>> {
        if type_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.traversal_query(
            "SELECT DISTINCT pro.* FROM process pro \
             INNER JOIN processiotracker piot ON piot.processid = pro.processid \
             INNER JOIN artifact_ancestor_map aam ON aam.artifactid = piot.inputartifactid \
             INNER JOIN outputmapping om ON om.outputartifactid = aam.ancestorartifactid \
             INNER JOIN processiotracker piot2 ON piot2.trackerid = om.trackerid \
             WHERE piot2.processid = $1 AND pro.typeid = ANY($2)",
            parent_process_id,
            type_ids,
        )
        .await
    }

    /// One-hop ancestor artifacts of the given artifact.
    pub async fn artifact_ancestors(&self, artifact_id: i32) -> LimsResult<Vec<Artifact>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT art.* FROM artifact art \
                 INNER JOIN artifact_ancestor_map aam ON aam.ancestorartifactid = art.artifactid \
                 WHERE aam.artifactid = $1",
                &[&artifact_id],
            )
            .await?;
        rows.iter()
            .map(Artifact::from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Raw ancestry edges touching any of the given artifacts, in either
    /// direction. Callers walk multi-hop lineage by fetching edges for
    /// the frontier and invoking again.
    pub async fn ancestor_edges(&self, artifact_ids: &[i32]) -> LimsResult<Vec<AncestorEdge>> {
        if artifact_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT aam.artifactid, aam.ancestorartifactid FROM artifact_ancestor_map aam \
                 WHERE aam.artifactid = ANY($1) OR aam.ancestorartifactid = ANY($1)",
                &[&artifact_ids],
            )
            .await?;
        rows.iter()
            .map(AncestorEdge::from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Input-side I/O trackers of a process.
    pub async fn io_trackers(&self, process_id: i32) -> LimsResult<Vec<ProcessIoTracker>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT piot.* FROM processiotracker piot WHERE piot.processid = $1",
                &[&process_id],
            )
            .await?;
        rows.iter()
            .map(ProcessIoTracker::from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Output mappings hanging off one I/O tracker.
    pub async fn output_mappings(&self, tracker_id: i32) -> LimsResult<Vec<OutputMapping>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT om.* FROM outputmapping om WHERE om.trackerid = $1",
                &[&tracker_id],
            )
            .await?;
        rows.iter()
            .map(OutputMapping::from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    async fn traversal_query(
        &self,
        statement: &str,
        parent_process_id: i32,
        type_ids: &[i32],
    ) -> LimsResult<Vec<Process>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(&conn, statement, &[&parent_process_id, &type_ids])
            .await?;
        let processes = rows
            .iter()
            .map(Process::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dedupe_processes([processes]))
    }
}
