use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::portal::PortalError;
use crate::services::access_filter;
use crate::stores::{ContentStore, ProcessRecord, ProcessStore, StepRecord};
use crate::types::dto::process::{
    ContentRef, ProcessStepSummary, ProcessStepView, ProcessSummary, ProcessView,
};
use crate::types::internal::auth::RequesterIdentity;

/// Assembles materialized views of business processes for an authorized
/// requester: access check, ordered steps, and per-step related content.
pub struct ProcessResolver {
    process_store: Arc<ProcessStore>,
    content_store: Arc<ContentStore>,
}

impl ProcessResolver {
    /// Create a new ProcessResolver over the given stores
    pub fn new(process_store: Arc<ProcessStore>, content_store: Arc<ContentStore>) -> Self {
        Self {
            process_store,
            content_store,
        }
    }

    /// Produce the fully materialized view of one process.
    ///
    /// NotFound and Forbidden short-circuit before any step processing.
    /// Related content ids that no longer resolve are dropped silently; the
    /// surviving references keep the stored order.
    pub async fn resolve_process(
        &self,
        process_id: &str,
        requester: &RequesterIdentity,
    ) -> Result<ProcessView, PortalError> {
        let process = self
            .process_store
            .find_by_id(process_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Process not found"))?;

        if !access_filter::is_visible(&process.allowed_roles, &requester.role) {
            return Err(PortalError::forbidden());
        }

        // One lookup for every id referenced by any step; reassembly below
        // restores the per-step stored order
        let all_ids: Vec<String> = process
            .steps
            .iter()
            .flat_map(|step| step.related_content_ids.iter().cloned())
            .collect();
        let existing = self.content_store.find_existing(&all_ids).await?;
        let by_id: HashMap<&str, &crate::types::db::content::Model> =
            existing.iter().map(|c| (c.id.as_str(), c)).collect();

        let steps = process
            .steps
            .iter()
            .map(|step| resolve_step(step, &by_id))
            .collect();

        Ok(ProcessView {
            id: process.id,
            name: process.name,
            description: process.description,
            departments: process.departments,
            created_at: process.created_at,
            updated_at: process.updated_at,
            steps,
        })
    }

    /// List all processes visible to the requester, newest first.
    ///
    /// Cheaper than single-process resolution: related content ids stay
    /// unresolved in the summaries.
    pub async fn list_processes(
        &self,
        requester: &RequesterIdentity,
    ) -> Result<Vec<ProcessSummary>, PortalError> {
        let processes = self.process_store.list_all().await?;

        Ok(processes
            .into_iter()
            .filter(|p| access_filter::is_visible(&p.allowed_roles, &requester.role))
            .map(summarize)
            .collect())
    }
}

fn resolve_step(
    step: &StepRecord,
    by_id: &HashMap<&str, &crate::types::db::content::Model>,
) -> ProcessStepView {
    let related_content = step
        .related_content_ids
        .iter()
        .filter_map(|id| by_id.get(id.as_str()))
        .map(|content| ContentRef {
            id: content.id.clone(),
            title: content.title.clone(),
            kind: content.kind.clone(),
            duration: content.duration.clone(),
        })
        .collect();

    ProcessStepView {
        step_number: step.step_number,
        title: step.title.clone(),
        description: step.description.clone(),
        responsible: step.responsible.clone(),
        duration: step.duration.clone(),
        related_content,
    }
}

fn summarize(process: ProcessRecord) -> ProcessSummary {
    ProcessSummary {
        id: process.id,
        name: process.name,
        description: process.description,
        departments: process.departments,
        allowed_roles: process.allowed_roles,
        created_at: process.created_at,
        updated_at: process.updated_at,
        steps: process
            .steps
            .into_iter()
            .map(|step| ProcessStepSummary {
                step_number: step.step_number,
                title: step.title,
                description: step.description,
                responsible: step.responsible,
                duration: step.duration,
                related_content_ids: step.related_content_ids,
            })
            .collect(),
    }
}
