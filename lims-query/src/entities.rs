//! Direct entity fetchers.
//!
//! Simple by-id / by-luid lookups the polling jobs use around the change
//! and lineage queries. All read-only.

use crate::client::LimsClient;
use crate::error::LimsResult;
use lims_schema::{Artifact, Container, ContainerPlacement, Process, ProcessType, Project, Sample};

impl LimsClient {
    /// Look up a project by its external id.
    pub async fn project_by_luid(&self, luid: &str) -> LimsResult<Option<Project>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT pj.* FROM project pj WHERE pj.luid = $1",
                &[&luid],
            )
            .await?;
        rows.first().map(Project::from_row).transpose().map_err(Into::into)
    }

    /// Look up a process by its external id.
    pub async fn process_by_luid(&self, luid: &str) -> LimsResult<Option<Process>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT pro.* FROM process pro WHERE pro.luid = $1",
                &[&luid],
            )
            .await?;
        rows.first().map(Process::from_row).transpose().map_err(Into::into)
    }

    /// Look up an artifact by its external id.
    pub async fn artifact_by_luid(&self, luid: &str) -> LimsResult<Option<Artifact>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT art.* FROM artifact art WHERE art.luid = $1",
                &[&luid],
            )
            .await?;
        rows.first().map(Artifact::from_row).transpose().map_err(Into::into)
    }

    /// All samples belonging to a project.
    pub async fn samples_for_project(&self, project_id: i32) -> LimsResult<Vec<Sample>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT sa.* FROM sample sa WHERE sa.projectid = $1",
                &[&project_id],
            )
            .await?;
        rows.iter()
            .map(Sample::from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Process types matching the given display names. Callers resolve
    /// names to the numeric ids the type-filtered queries take. An empty
    /// name list matches nothing.
    pub async fn process_types_by_name(&self, names: &[&str]) -> LimsResult<Vec<ProcessType>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT pt.* FROM processtype pt WHERE pt.displayname = ANY($1)",
                &[&names],
            )
            .await?;
        rows.iter()
            .map(ProcessType::from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// The container an artifact is placed in, if any.
    pub async fn artifact_container(&self, artifact_id: i32) -> LimsResult<Option<Container>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT ct.* FROM container ct \
                 INNER JOIN containerplacement cpl ON cpl.containerid = ct.containerid \
                 WHERE cpl.processartifactid = $1",
                &[&artifact_id],
            )
            .await?;
        rows.first().map(Container::from_row).transpose().map_err(Into::into)
    }

    /// All placements within a container.
    pub async fn container_placements(
        &self,
        container_id: i32,
    ) -> LimsResult<Vec<ContainerPlacement>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT cpl.* FROM containerplacement cpl WHERE cpl.containerid = $1",
                &[&container_id],
            )
            .await?;
        rows.iter()
            .map(ContainerPlacement::from_row)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }
}
