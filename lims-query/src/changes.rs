//! Change-window queries: which projects changed in the last interval.
//!
//! A project counts as changed when its own row, or any dependent row
//! (entity UDFs, sample UDFs, artifacts, artifact UDFs, containers,
//! processes, process UDFs), was modified within the window. One query per
//! dependency path, all joining back to `project` and filtering on
//! `age(now(), lastmodifieddate) < $n::text::interval`.
//!
//! The sub-queries are independent read-only statements, so the aggregate
//! issues them concurrently and unions the results by external `luid`.

use crate::client::LimsClient;
use crate::error::LimsResult;
use crate::interval::Interval;
use lims_schema::{Project, UdfOwnerClass};
use std::collections::BTreeSet;

impl LimsClient {
    /// Projects whose own row was modified within the window.
    pub async fn last_modified_projects(&self, within: &Interval) -> LimsResult<Vec<Project>> {
        self.project_query(
            "SELECT pj.* FROM project pj \
             WHERE age(now(), pj.lastmodifieddate) < $1::text::interval",
            within,
        )
        .await
    }

    /// Projects with an entity UDF modified within the window.
    pub async fn last_modified_project_udfs(&self, within: &Interval) -> LimsResult<Vec<Project>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT DISTINCT pj.* FROM project pj \
                 INNER JOIN entityudfstorage eus ON pj.projectid = eus.attachtoid \
                 WHERE eus.attachtoclassid = $2 \
                 AND age(now(), eus.lastmodifieddate) < $1::text::interval",
                &[&within.as_pg(), &UdfOwnerClass::Project.class_id()],
            )
            .await?;
        rows.iter()
            .map(Project::from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Projects with a sample-process UDF modified within the window.
    pub async fn last_modified_project_sample_udfs(
        &self,
        within: &Interval,
    ) -> LimsResult<Vec<Project>> {
        self.project_query(
            "SELECT DISTINCT pj.* FROM project pj \
             INNER JOIN sample sa ON sa.projectid = pj.projectid \
             INNER JOIN processudfstorage pus ON sa.processid = pus.processid \
             WHERE age(now(), pus.lastmodifieddate) < $1::text::interval",
            within,
        )
        .await
    }

    /// Projects with an artifact modified within the window.
    pub async fn last_modified_project_artifacts(
        &self,
        within: &Interval,
    ) -> LimsResult<Vec<Project>> {
        self.project_query(
            "SELECT DISTINCT pj.* FROM project pj \
             INNER JOIN sample sa ON sa.projectid = pj.projectid \
             INNER JOIN artifact_sample_map asm ON sa.processid = asm.processid \
             INNER JOIN artifact art ON asm.artifactid = art.artifactid \
             WHERE age(now(), art.lastmodifieddate) < $1::text::interval",
            within,
        )
        .await
    }

    /// Projects with an artifact UDF modified within the window.
    pub async fn last_modified_project_artifact_udfs(
        &self,
        within: &Interval,
    ) -> LimsResult<Vec<Project>> {
        self.project_query(
            "SELECT DISTINCT pj.* FROM project pj \
             INNER JOIN sample sa ON sa.projectid = pj.projectid \
             INNER JOIN artifact_sample_map asm ON sa.processid = asm.processid \
             INNER JOIN artifactudfstorage aus ON asm.artifactid = aus.artifactid \
             WHERE age(now(), aus.lastmodifieddate) < $1::text::interval",
            within,
        )
        .await
    }

    /// Projects with a container modified within the window.
    pub async fn last_modified_project_containers(
        &self,
        within: &Interval,
    ) -> LimsResult<Vec<Project>> {
        self.project_query(
            "SELECT DISTINCT pj.* FROM project pj \
             INNER JOIN sample sa ON sa.projectid = pj.projectid \
             INNER JOIN artifact_sample_map asm ON sa.processid = asm.processid \
             INNER JOIN containerplacement cpl ON asm.artifactid = cpl.processartifactid \
             INNER JOIN container ct ON cpl.containerid = ct.containerid \
             WHERE age(now(), ct.lastmodifieddate) < $1::text::interval",
            within,
        )
        .await
    }

    /// Projects with a consuming process modified within the window.
    pub async fn last_modified_project_processes(
        &self,
        within: &Interval,
    ) -> LimsResult<Vec<Project>> {
        self.project_query(
            "SELECT DISTINCT pj.* FROM project pj \
             INNER JOIN sample sa ON sa.projectid = pj.projectid \
             INNER JOIN artifact_sample_map asm ON sa.processid = asm.processid \
             INNER JOIN processiotracker pit ON asm.artifactid = pit.inputartifactid \
             INNER JOIN process pro ON pit.processid = pro.processid \
             WHERE age(now(), pro.lastmodifieddate) < $1::text::interval",
            within,
        )
        .await
    }

    /// Projects with a consuming process's UDF modified within the window.
    pub async fn last_modified_project_process_udfs(
        &self,
        within: &Interval,
    ) -> LimsResult<Vec<Project>> {
        self.project_query(
            "SELECT DISTINCT pj.* FROM project pj \
             INNER JOIN sample sa ON sa.projectid = pj.projectid \
             INNER JOIN artifact_sample_map asm ON sa.processid = asm.processid \
             INNER JOIN processiotracker pit ON asm.artifactid = pit.inputartifactid \
             INNER JOIN process pro ON pit.processid = pro.processid \
             INNER JOIN processudfstorage pus ON pro.processid = pus.processid \
             WHERE age(now(), pus.lastmodifieddate) < $1::text::interval",
            within,
        )
        .await
    }

    /// External ids of every project with any part modified within the
    /// window, across all eight dependency paths.
    ///
    /// The paths are issued concurrently (independent read-only queries)
    /// and unioned by `luid`, so a project reached through several paths
    /// appears exactly once.
    pub async fn last_modified_project_luids(
        &self,
        within: &Interval,
    ) -> LimsResult<BTreeSet<String>> {
        let (direct, udfs, sample_udfs, artifacts, artifact_udfs, containers, processes, process_udfs) =
            futures_util::try_join!(
                self.last_modified_projects(within),
                self.last_modified_project_udfs(within),
                self.last_modified_project_sample_udfs(within),
                self.last_modified_project_artifacts(within),
                self.last_modified_project_artifact_udfs(within),
                self.last_modified_project_containers(within),
                self.last_modified_project_processes(within),
                self.last_modified_project_process_udfs(within),
            )?;

        let luids = union_project_luids([
            direct,
            udfs,
            sample_udfs,
            artifacts,
            artifact_udfs,
            containers,
            processes,
            process_udfs,
        ]);
        tracing::debug!(window = %within, projects = luids.len(), "change-window aggregation done");
        Ok(luids)
    }

    async fn project_query(&self, statement: &str, within: &Interval) -> LimsResult<Vec<Project>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(&conn, statement, &[&within.as_pg()])
            .await?;
        rows.iter()
            .map(Project::from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }
}

/// Union project batches into a set of external ids. Deduplication is by
/// `luid`, never by internal numeric id: two internal rows carrying the
/// same external id collapse to one entry.
pub fn union_project_luids<I>(batches: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = Vec<Project>>,
{
    batches
        .into_iter()
        .flatten()
        .map(|project| project.luid)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(project_id: i32, luid: &str) -> Project {
        Project {
            project_id,
            luid: luid.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn union_dedupes_across_paths() {
        let luids = union_project_luids([
            vec![project(1, "ADM1"), project(2, "ADM2")],
            vec![project(1, "ADM1")],
            vec![],
            vec![project(3, "ADM3"), project(2, "ADM2")],
        ]);
        assert_eq!(
            luids,
            BTreeSet::from(["ADM1".to_string(), "ADM2".to_string(), "ADM3".to_string()])
        );
    }

    #[test]
    fn union_dedupes_by_external_id_not_internal_id() {
        // Two distinct internal rows sharing an external id must not
        // produce a duplicate.
        let luids = union_project_luids([vec![project(1, "ADM1"), project(7, "ADM1")]]);
        assert_eq!(luids.len(), 1);
    }

    #[test]
    fn empty_paths_contribute_nothing() {
        let luids = union_project_luids([Vec::new(), Vec::new()]);
        assert!(luids.is_empty());
    }
}
