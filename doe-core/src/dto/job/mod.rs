//! Job definition DTOs
//!
//! A DOE job is one analysis whose template files are expanded once per row
//! of a parameter file. Only the fields the workflow sets are modelled.

use serde::{Deserialize, Serialize};

/// Sizing of a DOE job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoeSettings {
    /// Number of runs executed in parallel
    pub slots: u32,
    /// Walltime limit for the whole job, in hours
    pub walltime_hours: u32,
}

impl Default for DoeSettings {
    fn default() -> Self {
        Self {
            slots: 1500,
            walltime_hours: 10,
        }
    }
}

/// Identifiers of the uploaded files a DOE job is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoeInputs {
    pub input_file_id: String,
    pub template_file_id: String,
    pub param_file_id: String,
    pub postproc_file_id: String,
}

/// Request body for `POST jobs/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinition {
    pub name: String,
    pub description: String,
    pub is_low_priority: bool,
    #[serde(rename = "jobanalyses")]
    pub job_analyses: Vec<JobAnalysis>,
    pub param_file: FileRef,
    pub is_template: bool,
    pub include_nominal_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    pub analysis: Analysis,
    pub command: String,
    pub hardware: Hardware,
    pub input_files: Vec<InputFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_process_script: Option<FileRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_process_script_command: Option<String>,
    pub template_tasks: Vec<TemplateTask>,
}

/// Software package and version to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub code: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardware {
    pub cores_per_slot: u32,
    pub slots: u32,
    pub walltime: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub core_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub id: String,
    pub decompress: bool,
}

/// Template file rendered once per parameter row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateTask {
    pub template_file: FileRef,
    pub processed_filename: String,
}

impl FileRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl JobDefinition {
    /// OpenFOAM airfoil parametric study
    ///
    /// The parameter CSV drives one run per row; each run renders the
    /// velocity template into `airfoil2D_DOE/0/U`, runs `Allrun` and then
    /// scrapes `Cd`/`Cl` from the solver log with the post-processing script.
    pub fn openfoam_airfoil(inputs: &DoeInputs, settings: &DoeSettings) -> Self {
        Self {
            name: "OpenFOAM: Airfoil Parametric Analysis - CSV params".to_string(),
            description: String::new(),
            is_low_priority: true,
            job_analyses: vec![JobAnalysis {
                analysis: Analysis {
                    code: "openfoam_plus".to_string(),
                    version: "v1706+-intelmpi".to_string(),
                },
                command: "cd airfoil2D_DOE\n./Allrun".to_string(),
                hardware: Hardware {
                    cores_per_slot: 1,
                    slots: settings.slots,
                    walltime: settings.walltime_hours,
                    kind: "compute".to_string(),
                    core_type: "emerald".to_string(),
                },
                input_files: vec![InputFile {
                    id: inputs.input_file_id.clone(),
                    decompress: true,
                }],
                post_process_script: Some(FileRef::new(&inputs.postproc_file_id)),
                post_process_script_command: Some(
                    "python extract.py airfoil2D_DOE/log.simpleFoam Cd Cl".to_string(),
                ),
                template_tasks: vec![TemplateTask {
                    template_file: FileRef::new(&inputs.template_file_id),
                    processed_filename: "airfoil2D_DOE/0/U".to_string(),
                }],
            }],
            param_file: FileRef::new(&inputs.param_file_id),
            is_template: false,
            include_nominal_run: false,
        }
    }
}
