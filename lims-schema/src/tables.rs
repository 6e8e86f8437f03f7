//! Row types for the LIMS tables the query layer touches.
//!
//! Field names are the snake_case spelling of the external column names;
//! `from_row` decodes by column name so any `SELECT alias.*` over the
//! corresponding table round-trips. Timestamps are `NaiveDateTime` because
//! the external schema stores TIMESTAMP without time zone. Decoding is
//! fallible; a schema drift surfaces as an error, never a panic.

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio_postgres::Row;

/// A research project. Owns zero or more samples.
///
/// `luid` is the stable external identifier; change-window aggregation
/// deduplicates on it, never on the internal `project_id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Project {
    pub project_id: i32,
    pub name: Option<String>,
    pub open_date: Option<NaiveDateTime>,
    pub close_date: Option<NaiveDateTime>,
    pub invoice_date: Option<NaiveDateTime>,
    pub luid: String,
    pub maximum_sample_id: Option<String>,
    pub owner_id: Option<i32>,
    pub datastore_id: Option<i32>,
    pub is_global: Option<bool>,
    pub created_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub last_modified_by: Option<i32>,
    pub researcher_id: Option<i32>,
    pub priority: Option<i32>,
}

impl Project {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            project_id: row.try_get("projectid")?,
            name: row.try_get("name")?,
            open_date: row.try_get("opendate")?,
            close_date: row.try_get("closedate")?,
            invoice_date: row.try_get("invoicedate")?,
            luid: row.try_get("luid")?,
            maximum_sample_id: row.try_get("maximumsampleid")?,
            owner_id: row.try_get("ownerid")?,
            datastore_id: row.try_get("datastoreid")?,
            is_global: row.try_get("isglobal")?,
            created_date: row.try_get("createddate")?,
            last_modified_date: row.try_get("lastmodifieddate")?,
            last_modified_by: row.try_get("lastmodifiedby")?,
            researcher_id: row.try_get("researcherid")?,
            priority: row.try_get("priority")?,
        })
    }
}

/// A sample, keyed by the process that spawned it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Sample {
    pub process_id: i32,
    pub sample_id: Option<i32>,
    pub name: Option<String>,
    pub date_received: Option<NaiveDateTime>,
    pub date_completed: Option<NaiveDateTime>,
    pub maximum_analyte_id: Option<i32>,
    pub unique_id: Option<i32>,
    pub bisource_id: Option<i32>,
    pub project_id: Option<i32>,
    pub control_type_id: Option<i32>,
}

impl Sample {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            process_id: row.try_get("processid")?,
            sample_id: row.try_get("sampleid")?,
            name: row.try_get("name")?,
            date_received: row.try_get("datereceived")?,
            date_completed: row.try_get("datecompleted")?,
            maximum_analyte_id: row.try_get("maximumanalyteid")?,
            unique_id: row.try_get("uniqueid")?,
            bisource_id: row.try_get("bisourceid")?,
            project_id: row.try_get("projectid")?,
            control_type_id: row.try_get("controltypeid")?,
        })
    }
}

/// A physical or digital unit of material flowing through processes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Artifact {
    pub artifact_id: i32,
    pub name: Option<String>,
    pub luid: String,
    pub volume: Option<f64>,
    pub concentration: Option<f64>,
    pub orig_volume: Option<f64>,
    pub orig_concentration: Option<f64>,
    pub datastore_id: Option<i32>,
    pub is_working: Option<bool>,
    pub is_original: Option<bool>,
    pub is_global: Option<bool>,
    pub is_genealogy_artifact: Option<bool>,
    pub owner_id: Option<i32>,
    pub created_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub last_modified_by: Option<i32>,
    pub artifact_type_id: Option<i32>,
    pub process_output_type_id: Option<i32>,
    pub current_state_id: Option<i32>,
    pub original_state_id: Option<i32>,
    pub compound_artifact_id: Option<i32>,
    pub output_index: Option<i32>,
}

impl Artifact {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            artifact_id: row.try_get("artifactid")?,
            name: row.try_get("name")?,
            luid: row.try_get("luid")?,
            volume: row.try_get("volume")?,
            concentration: row.try_get("concentration")?,
            orig_volume: row.try_get("origvolume")?,
            orig_concentration: row.try_get("origconcentration")?,
            datastore_id: row.try_get("datastoreid")?,
            is_working: row.try_get("isworking")?,
            is_original: row.try_get("isoriginal")?,
            is_global: row.try_get("isglobal")?,
            is_genealogy_artifact: row.try_get("isgenealogyartifact")?,
            owner_id: row.try_get("ownerid")?,
            created_date: row.try_get("createddate")?,
            last_modified_date: row.try_get("lastmodifieddate")?,
            last_modified_by: row.try_get("lastmodifiedby")?,
            artifact_type_id: row.try_get("artifacttypeid")?,
            process_output_type_id: row.try_get("processoutputtypeid")?,
            current_state_id: row.try_get("currentstateid")?,
            original_state_id: row.try_get("originalstateid")?,
            compound_artifact_id: row.try_get("compoundartifactid")?,
            output_index: row.try_get("outputindex")?,
        })
    }
}

/// An executed lab or data-handling operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Process {
    pub process_id: i32,
    pub date_run: Option<NaiveDateTime>,
    pub luid: String,
    pub is_protocol: Option<bool>,
    pub protocol_name_used: Option<String>,
    pub program_started: Option<bool>,
    pub datastore_id: Option<i32>,
    pub is_global: Option<bool>,
    pub owner_id: Option<i32>,
    pub created_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub last_modified_by: Option<i32>,
    pub installation_id: Option<i32>,
    pub tech_id: Option<i32>,
    pub type_id: Option<i32>,
    pub string_parameter_id: Option<i32>,
    pub file_parameter_id: Option<i32>,
    pub protocol_step_id: Option<i32>,
    pub work_status: Option<String>,
    pub reagent_category_id: Option<i32>,
    pub signed_by_id: Option<i32>,
    pub signed_date: Option<NaiveDateTime>,
    pub next_steps_locked: Option<bool>,
}

impl Process {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            process_id: row.try_get("processid")?,
            date_run: row.try_get("daterun")?,
            luid: row.try_get("luid")?,
            is_protocol: row.try_get("isprotocol")?,
            protocol_name_used: row.try_get("protocolnameused")?,
            program_started: row.try_get("programstarted")?,
            datastore_id: row.try_get("datastoreid")?,
            is_global: row.try_get("isglobal")?,
            owner_id: row.try_get("ownerid")?,
            created_date: row.try_get("createddate")?,
            last_modified_date: row.try_get("lastmodifieddate")?,
            last_modified_by: row.try_get("lastmodifiedby")?,
            installation_id: row.try_get("installationid")?,
            tech_id: row.try_get("techid")?,
            type_id: row.try_get("typeid")?,
            string_parameter_id: row.try_get("stringparameterid")?,
            file_parameter_id: row.try_get("fileparameterid")?,
            protocol_step_id: row.try_get("protocolstepid")?,
            work_status: row.try_get("workstatus")?,
            reagent_category_id: row.try_get("reagentcategoryid")?,
            signed_by_id: row.try_get("signedbyid")?,
            signed_date: row.try_get("signeddate")?,
            next_steps_locked: row.try_get("nextstepslocked")?,
        })
    }
}

/// A process type. Callers resolve display names to the numeric type ids
/// used by the type-filtered queries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessType {
    pub type_id: i32,
    pub display_name: Option<String>,
    pub type_name: Option<String>,
    pub is_enabled: Option<bool>,
    pub context_code: Option<String>,
    pub is_visible: Option<bool>,
    pub style: Option<i32>,
    pub owner_id: Option<i32>,
    pub datastore_id: Option<i32>,
    pub is_global: Option<bool>,
    pub created_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub last_modified_by: Option<i32>,
    pub can_edit: Option<bool>,
    pub module_name: Option<String>,
}

impl ProcessType {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            type_id: row.try_get("typeid")?,
            display_name: row.try_get("displayname")?,
            type_name: row.try_get("typename")?,
            is_enabled: row.try_get("isenabled")?,
            context_code: row.try_get("contextcode")?,
            is_visible: row.try_get("isvisible")?,
            style: row.try_get("style")?,
            owner_id: row.try_get("ownerid")?,
            datastore_id: row.try_get("datastoreid")?,
            is_global: row.try_get("isglobal")?,
            created_date: row.try_get("createddate")?,
            last_modified_date: row.try_get("lastmodifieddate")?,
            last_modified_by: row.try_get("lastmodifiedby")?,
            can_edit: row.try_get("canedit")?,
            module_name: row.try_get("modulename")?,
        })
    }
}

/// A container (plate, tube, flowcell) holding placed artifacts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Container {
    pub container_id: i32,
    pub subtype: Option<String>,
    pub luid: String,
    pub is_visible: Option<bool>,
    pub name: Option<String>,
    pub owner_id: Option<i32>,
    pub datastore_id: Option<i32>,
    pub is_global: Option<bool>,
    pub created_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub last_modified_by: Option<i32>,
    pub state_id: Option<i32>,
    pub type_id: Option<i32>,
    pub lot_number: Option<String>,
    pub expiry_date: Option<NaiveDateTime>,
}

impl Container {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            container_id: row.try_get("containerid")?,
            subtype: row.try_get("subtype")?,
            luid: row.try_get("luid")?,
            is_visible: row.try_get("isvisible")?,
            name: row.try_get("name")?,
            owner_id: row.try_get("ownerid")?,
            datastore_id: row.try_get("datastoreid")?,
            is_global: row.try_get("isglobal")?,
            created_date: row.try_get("createddate")?,
            last_modified_date: row.try_get("lastmodifieddate")?,
            last_modified_by: row.try_get("lastmodifiedby")?,
            state_id: row.try_get("stateid")?,
            type_id: row.try_get("typeid")?,
            lot_number: row.try_get("lotnumber")?,
            expiry_date: row.try_get("expirydate")?,
        })
    }
}

/// Placement of one artifact in one container well.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContainerPlacement {
    pub placement_id: i32,
    pub container_id: i32,
    pub well_x_position: Option<i32>,
    pub well_y_position: Option<i32>,
    pub date_placed: Option<NaiveDateTime>,
    pub owner_id: Option<i32>,
    pub datastore_id: Option<i32>,
    pub is_global: Option<bool>,
    pub created_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub last_modified_by: Option<i32>,
    pub reagent_id: Option<i32>,
    pub process_artifact_id: Option<i32>,
}

impl ContainerPlacement {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            placement_id: row.try_get("placementid")?,
            container_id: row.try_get("containerid")?,
            well_x_position: row.try_get("wellxposition")?,
            well_y_position: row.try_get("wellyposition")?,
            date_placed: row.try_get("dateplaced")?,
            owner_id: row.try_get("ownerid")?,
            datastore_id: row.try_get("datastoreid")?,
            is_global: row.try_get("isglobal")?,
            created_date: row.try_get("createddate")?,
            last_modified_date: row.try_get("lastmodifieddate")?,
            last_modified_by: row.try_get("lastmodifiedby")?,
            reagent_id: row.try_get("reagentid")?,
            process_artifact_id: row.try_get("processartifactid")?,
        })
    }
}

/// Input-side tracking row linking a process to one consumed artifact.
/// Outputs hang off the tracker through [`OutputMapping`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessIoTracker {
    pub tracker_id: i32,
    pub input_volume: Option<f64>,
    pub input_concentration: Option<f64>,
    pub input_state_pre_id: Option<i32>,
    pub input_state_post_id: Option<i32>,
    pub owner_id: Option<i32>,
    pub datastore_id: Option<i32>,
    pub is_global: Option<bool>,
    pub created_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub last_modified_by: Option<i32>,
    pub input_artifact_id: Option<i32>,
    pub process_id: Option<i32>,
}

impl ProcessIoTracker {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            tracker_id: row.try_get("trackerid")?,
            input_volume: row.try_get("inputvolume")?,
            input_concentration: row.try_get("inputconcentration")?,
            input_state_pre_id: row.try_get("inputstatepreid")?,
            input_state_post_id: row.try_get("inputstatepostid")?,
            owner_id: row.try_get("ownerid")?,
            datastore_id: row.try_get("datastoreid")?,
            is_global: row.try_get("isglobal")?,
            created_date: row.try_get("createddate")?,
            last_modified_date: row.try_get("lastmodifieddate")?,
            last_modified_by: row.try_get("lastmodifiedby")?,
            input_artifact_id: row.try_get("inputartifactid")?,
            process_id: row.try_get("processid")?,
        })
    }
}

/// Output artifact produced under one I/O tracker.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputMapping {
    pub mapping_id: i32,
    pub output_volume: Option<f64>,
    pub output_concentration: Option<f64>,
    pub owner_id: Option<i32>,
    pub datastore_id: Option<i32>,
    pub is_global: Option<bool>,
    pub created_date: Option<NaiveDateTime>,
    pub last_modified_date: Option<NaiveDateTime>,
    pub last_modified_by: Option<i32>,
    pub tracker_id: Option<i32>,
    pub output_artifact_id: Option<i32>,
}

impl OutputMapping {
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            mapping_id: row.try_get("mappingid")?,
            output_volume: row.try_get("outputvolume")?,
            output_concentration: row.try_get("outputconcentration")?,
            owner_id: row.try_get("ownerid")?,
            datastore_id: row.try_get("datastoreid")?,
            is_global: row.try_get("isglobal")?,
            created_date: row.try_get("createddate")?,
            last_modified_date: row.try_get("lastmodifieddate")?,
            last_modified_by: row.try_get("lastmodifiedby")?,
            tracker_id: row.try_get("trackerid")?,
            output_artifact_id: row.try_get("outputartifactid")?,
        })
    }
}
