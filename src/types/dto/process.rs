use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// A resolved reference to a content item, for display as a study-material
/// link inside a process step
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ContentRef {
    /// Content ID
    pub id: String,

    /// Title
    pub title: String,

    /// One of: video, article, instruction
    pub kind: String,

    /// Display duration
    pub duration: Option<String>,
}

/// A process step with its related content fully resolved
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProcessStepView {
    /// 1-based position; ascending order is display order
    pub step_number: i32,

    /// Step title
    pub title: String,

    /// Step description
    pub description: String,

    /// Responsible party
    pub responsible: String,

    /// Display duration
    pub duration: Option<String>,

    /// Surviving related content references, in stored order
    pub related_content: Vec<ContentRef>,
}

/// A fully materialized business process
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProcessView {
    /// Process ID (UUID)
    pub id: String,

    /// Process name
    pub name: String,

    /// Process description
    pub description: String,

    /// Departments involved
    pub departments: Vec<String>,

    /// Creation time (Unix timestamp)
    pub created_at: i64,

    /// Last update time (Unix timestamp)
    pub updated_at: i64,

    /// Steps in step_number order
    pub steps: Vec<ProcessStepView>,
}

/// A process step as it appears in list responses: related content ids are
/// decoded but not expanded into content references
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProcessStepSummary {
    /// 1-based position; ascending order is display order
    pub step_number: i32,

    /// Step title
    pub title: String,

    /// Step description
    pub description: String,

    /// Responsible party
    pub responsible: String,

    /// Display duration
    pub duration: Option<String>,

    /// Related content ids (unresolved)
    pub related_content_ids: Vec<String>,
}

/// A business process as it appears in list responses
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProcessSummary {
    /// Process ID (UUID)
    pub id: String,

    /// Process name
    pub name: String,

    /// Process description
    pub description: String,

    /// Departments involved
    pub departments: Vec<String>,

    /// Comma-separated access policy; empty or "all" means unrestricted
    pub allowed_roles: String,

    /// Creation time (Unix timestamp)
    pub created_at: i64,

    /// Last update time (Unix timestamp)
    pub updated_at: i64,

    /// Steps in step_number order
    pub steps: Vec<ProcessStepSummary>,
}

/// Response model for process listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProcessListResponse {
    /// Processes visible to the requester, newest first
    pub processes: Vec<ProcessSummary>,
}

/// Response model wrapping a single resolved process
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// The resolved process
    pub process: ProcessView,
}

/// A step as submitted on create/replace
///
/// Step order is the array position: any submitted step_number is ignored
/// and the stored numbering is the 1-based input index.
#[derive(Object, Debug, Serialize, Deserialize, Clone)]
pub struct StepInput {
    /// Ignored; stored numbering follows array position
    pub step_number: Option<i32>,

    /// Step title (required)
    pub title: String,

    /// Step description; defaults to empty
    pub description: Option<String>,

    /// Responsible party; defaults to empty
    pub responsible: Option<String>,

    /// Display duration
    pub duration: Option<String>,

    /// Related content ids; weak references, may dangle
    pub related_content_ids: Option<Vec<String>>,
}

/// Request model for process creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateProcessRequest {
    /// Process name (required)
    pub name: String,

    /// Process description; defaults to empty
    pub description: Option<String>,

    /// Departments involved; defaults to empty
    pub departments: Option<Vec<String>>,

    /// Comma-separated access policy; defaults to unrestricted
    pub allowed_roles: Option<String>,

    /// Steps in display order
    pub steps: Option<Vec<StepInput>>,
}

/// Request model for process update (replace-all step semantics)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateProcessRequest {
    /// New process name
    pub name: String,

    /// New process description; defaults to empty
    pub description: Option<String>,

    /// New departments list; defaults to empty
    pub departments: Option<Vec<String>>,

    /// New comma-separated access policy; unchanged when omitted
    pub allowed_roles: Option<String>,

    /// Replacement steps in display order; the previous steps are discarded
    pub steps: Vec<StepInput>,
}
