//! UDF read API.
//!
//! Reads the generic `*_udf_view` views and returns name -> typed-value
//! maps with explicit coercion. Project and container UDFs share one
//! polymorphic view disambiguated by the owner class id.

use crate::client::LimsClient;
use crate::error::LimsResult;
use lims_schema::{udf_map, UdfField, UdfOwnerClass, UdfValue};
use std::collections::BTreeMap;

impl LimsClient {
    /// UDFs attached to a project.
    pub async fn project_udfs(&self, project_id: i32) -> LimsResult<BTreeMap<String, UdfValue>> {
        self.entity_udfs(project_id, UdfOwnerClass::Project).await
    }

    /// UDFs attached to a container.
    pub async fn container_udfs(
        &self,
        container_id: i32,
    ) -> LimsResult<BTreeMap<String, UdfValue>> {
        self.entity_udfs(container_id, UdfOwnerClass::Container).await
    }

    /// UDFs attached to a sample.
    pub async fn sample_udfs(&self, sample_id: i32) -> LimsResult<BTreeMap<String, UdfValue>> {
        self.udf_view_query(
            "SELECT sus.* FROM sample_udf_view sus WHERE sus.sampleid = $1",
            sample_id,
        )
        .await
    }

    /// UDFs attached to an artifact.
    pub async fn artifact_udfs(&self, artifact_id: i32) -> LimsResult<BTreeMap<String, UdfValue>> {
        self.udf_view_query(
            "SELECT aus.* FROM artifact_udf_view aus WHERE aus.artifactid = $1",
            artifact_id,
        )
        .await
    }

    /// UDFs attached to a process.
    pub async fn process_udfs(&self, process_id: i32) -> LimsResult<BTreeMap<String, UdfValue>> {
        self.udf_view_query(
            "SELECT pus.* FROM process_udf_view pus WHERE pus.processid = $1",
            process_id,
        )
        .await
    }

    async fn entity_udfs(
        &self,
        owner_id: i32,
        owner: UdfOwnerClass,
    ) -> LimsResult<BTreeMap<String, UdfValue>> {
        let conn = self.get_conn().await?;
        let rows = self
            .query_rows(
                &conn,
                "SELECT eus.* FROM entity_udf_view eus \
                 WHERE eus.attachtoid = $1 AND eus.attachtoclassid = $2",
                &[&owner_id, &owner.class_id()],
            )
            .await?;
        let fields = rows
            .iter()
            .map(UdfField::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(udf_map(&fields))
    }

    async fn udf_view_query(
        &self,
        statement: &str,
        owner_id: i32,
    ) -> LimsResult<BTreeMap<String, UdfValue>> {
        let conn = self.get_conn().await?;
        let rows = self.query_rows(&conn, statement, &[&owner_id]).await?;
        let fields = rows
            .iter()
            .map(UdfField::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(udf_map(&fields))
    }
}
