use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::errors::portal::PortalError;
use crate::services::{ProcessResolver, TokenService};
use crate::stores::{NewStep, ProcessStore};
use crate::types::dto::common::DeleteResponse;
use crate::types::dto::process::{
    CreateProcessRequest, ProcessListResponse, ProcessResponse, StepInput, UpdateProcessRequest,
};

/// Business process API endpoints
pub struct ProcessesApi {
    process_store: Arc<ProcessStore>,
    resolver: Arc<ProcessResolver>,
    token_service: Arc<TokenService>,
}

impl ProcessesApi {
    /// Create a new ProcessesApi with the given store, resolver and TokenService
    pub fn new(
        process_store: Arc<ProcessStore>,
        resolver: Arc<ProcessResolver>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            process_store,
            resolver,
            token_service,
        }
    }
}

/// API tags for process endpoints
#[derive(Tags)]
enum ProcessTags {
    /// Business process endpoints
    Processes,
}

#[OpenApi]
impl ProcessesApi {
    /// List processes visible to the requester, newest first
    #[oai(path = "/processes", method = "get", tag = "ProcessTags::Processes")]
    pub async fn list(&self, auth: BearerAuth) -> Result<Json<ProcessListResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;

        let processes = self.resolver.list_processes(&requester).await?;

        Ok(Json(ProcessListResponse { processes }))
    }

    /// Fetch a single process, fully resolved: ordered steps with their
    /// surviving related content references
    #[oai(path = "/processes/:id", method = "get", tag = "ProcessTags::Processes")]
    pub async fn get(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<ProcessResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;

        let process = self.resolver.resolve_process(&id.0, &requester).await?;

        Ok(Json(ProcessResponse { process }))
    }

    /// Create a new process (admin only). Steps are numbered by their
    /// position in the submitted array.
    #[oai(path = "/processes", method = "post", tag = "ProcessTags::Processes")]
    pub async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateProcessRequest>,
    ) -> Result<Json<ProcessResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;
        if !requester.role.is_admin() {
            return Err(PortalError::forbidden());
        }

        if body.name.trim().is_empty() {
            return Err(PortalError::validation("Name is required"));
        }

        let created = self
            .process_store
            .create(
                body.name.clone(),
                body.description.clone().unwrap_or_default(),
                body.departments.clone().unwrap_or_default(),
                body.allowed_roles.clone().unwrap_or_default(),
                to_new_steps(body.steps.clone().unwrap_or_default()),
            )
            .await?;

        let process = self.resolver.resolve_process(&created.id, &requester).await?;

        Ok(Json(ProcessResponse { process }))
    }

    /// Update a process (admin only). The submitted steps replace all
    /// existing ones; any step numbers in the input are ignored in favor of
    /// array position.
    #[oai(path = "/processes/:id", method = "put", tag = "ProcessTags::Processes")]
    pub async fn update(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateProcessRequest>,
    ) -> Result<Json<ProcessResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;
        if !requester.role.is_admin() {
            return Err(PortalError::forbidden());
        }

        if body.name.trim().is_empty() {
            return Err(PortalError::validation("Name is required"));
        }

        self.process_store
            .update(
                &id.0,
                body.name.clone(),
                body.description.clone().unwrap_or_default(),
                body.departments.clone().unwrap_or_default(),
                body.allowed_roles.clone(),
                to_new_steps(body.steps.clone()),
            )
            .await?;

        let process = self.resolver.resolve_process(&id.0, &requester).await?;

        Ok(Json(ProcessResponse { process }))
    }

    /// Delete a process and its steps (admin only)
    #[oai(path = "/processes/:id", method = "delete", tag = "ProcessTags::Processes")]
    pub async fn delete(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<DeleteResponse>, PortalError> {
        let requester = super::authenticate(&self.token_service, &auth)?;
        if !requester.role.is_admin() {
            return Err(PortalError::forbidden());
        }

        self.process_store.delete(&id.0).await?;

        Ok(Json(DeleteResponse {
            success: true,
            message: "Process deleted".to_string(),
        }))
    }
}

// Submitted step numbers are dropped here: storage order is array order
fn to_new_steps(steps: Vec<StepInput>) -> Vec<NewStep> {
    steps
        .into_iter()
        .map(|step| NewStep {
            title: step.title,
            description: step.description.unwrap_or_default(),
            responsible: step.responsible.unwrap_or_default(),
            duration: step.duration,
            related_content_ids: step.related_content_ids.unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use sea_orm::Database;

    use crate::stores::{ContentStore, CredentialStore};
    use crate::types::internal::role::Role;

    struct Fixture {
        api: ProcessesApi,
        credential_store: Arc<CredentialStore>,
        token_service: Arc<TokenService>,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let process_store = Arc::new(ProcessStore::new(db.clone()));
        let content_store = Arc::new(ContentStore::new(db.clone()));
        let resolver = Arc::new(ProcessResolver::new(process_store.clone(), content_store));
        let credential_store = Arc::new(CredentialStore::new(db.clone(), "test-pepper".to_string()));
        let token_service = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
        ));

        Fixture {
            api: ProcessesApi::new(process_store, resolver, token_service.clone()),
            credential_store,
            token_service,
        }
    }

    async fn bearer_for(f: &Fixture, email: &str, role: Role) -> BearerAuth {
        let user = f
            .credential_store
            .register_user(email.to_string(), "password".to_string(), None, &role)
            .await
            .expect("Failed to register user");
        let token = f.token_service.issue_token(&user).expect("Failed to issue token");
        BearerAuth(Bearer { token })
    }

    fn clone_auth(auth: &BearerAuth) -> BearerAuth {
        BearerAuth(Bearer {
            token: auth.0.token.clone(),
        })
    }

    fn step_input(title: &str, step_number: Option<i32>) -> StepInput {
        StepInput {
            step_number,
            title: title.to_string(),
            description: None,
            responsible: Some("Ops".to_string()),
            duration: None,
            related_content_ids: None,
        }
    }

    fn create_request(name: &str, allowed_roles: &str, steps: Vec<StepInput>) -> Json<CreateProcessRequest> {
        Json(CreateProcessRequest {
            name: name.to_string(),
            description: None,
            departments: Some(vec!["ops".to_string()]),
            allowed_roles: if allowed_roles.is_empty() {
                None
            } else {
                Some(allowed_roles.to_string())
            },
            steps: Some(steps),
        })
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let f = setup().await;
        let user_auth = bearer_for(&f, "user@example.com", Role::User).await;

        let result = f.api.create(user_auth, create_request("Flow", "", vec![])).await;

        assert!(result.is_err());
        match result {
            Err(PortalError::Forbidden(_)) => {
                // Expected error type
            }
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn test_create_ignores_submitted_step_numbers() {
        let f = setup().await;
        let admin_auth = bearer_for(&f, "admin@example.com", Role::Admin).await;

        let created = f
            .api
            .create(
                admin_auth,
                create_request(
                    "Ordering",
                    "",
                    vec![
                        step_input("C", Some(7)),
                        step_input("A", Some(2)),
                        step_input("B", None),
                    ],
                ),
            )
            .await
            .expect("Create failed");

        let numbering: Vec<_> = created
            .process
            .steps
            .iter()
            .map(|s| (s.step_number, s.title.as_str()))
            .collect();
        assert_eq!(numbering, vec![(1, "C"), (2, "A"), (3, "B")]);
    }

    #[tokio::test]
    async fn test_update_replaces_steps_with_submitted_order() {
        let f = setup().await;
        let admin_auth = bearer_for(&f, "admin@example.com", Role::Admin).await;

        let created = f
            .api
            .create(
                clone_auth(&admin_auth),
                create_request("Flow", "", vec![step_input("Old", None)]),
            )
            .await
            .expect("Create failed");

        let updated = f
            .api
            .update(
                admin_auth,
                Path(created.process.id.clone()),
                Json(UpdateProcessRequest {
                    name: "Flow v2".to_string(),
                    description: Some("Updated".to_string()),
                    departments: Some(vec!["ops".to_string(), "qa".to_string()]),
                    allowed_roles: None,
                    steps: vec![step_input("New 1", Some(99)), step_input("New 2", Some(1))],
                }),
            )
            .await
            .expect("Update failed");

        assert_eq!(updated.process.name, "Flow v2");
        assert_eq!(updated.process.departments, vec!["ops", "qa"]);
        let numbering: Vec<_> = updated
            .process
            .steps
            .iter()
            .map(|s| (s.step_number, s.title.as_str()))
            .collect();
        assert_eq!(numbering, vec![(1, "New 1"), (2, "New 2")]);
    }

    #[tokio::test]
    async fn test_list_is_role_filtered() {
        let f = setup().await;
        let admin_auth = bearer_for(&f, "admin@example.com", Role::Admin).await;

        f.api
            .create(clone_auth(&admin_auth), create_request("Admin only", "admin", vec![]))
            .await
            .expect("Create failed");
        f.api
            .create(clone_auth(&admin_auth), create_request("Buyer flow", "buyer,admin", vec![]))
            .await
            .expect("Create failed");

        let buyer_auth = bearer_for(&f, "buyer@example.com", Role::Buyer).await;
        let listed = f.api.list(buyer_auth).await.expect("List failed");

        assert_eq!(listed.processes.len(), 1);
        assert_eq!(listed.processes[0].name, "Buyer flow");
    }

    #[tokio::test]
    async fn test_get_forbidden_outside_policy() {
        let f = setup().await;
        let admin_auth = bearer_for(&f, "admin@example.com", Role::Admin).await;

        let created = f
            .api
            .create(
                clone_auth(&admin_auth),
                create_request("Restricted", "logistics,admin", vec![]),
            )
            .await
            .expect("Create failed");

        let manager_auth = bearer_for(&f, "manager@example.com", Role::Manager).await;
        let result = f.api.get(manager_auth, Path(created.process.id.clone())).await;

        assert!(result.is_err());
        match result {
            Err(PortalError::Forbidden(_)) => {
                // Expected error type
            }
            _ => panic!("Expected Forbidden error"),
        }
    }

    #[tokio::test]
    async fn test_get_unknown_process_is_not_found() {
        let f = setup().await;
        let admin_auth = bearer_for(&f, "admin@example.com", Role::Admin).await;

        let result = f.api.get(admin_auth, Path("ghost".to_string())).await;

        assert!(result.is_err());
        match result {
            Err(PortalError::NotFound(_)) => {
                // Expected error type
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_delete_round_trip() {
        let f = setup().await;
        let admin_auth = bearer_for(&f, "admin@example.com", Role::Admin).await;

        let created = f
            .api
            .create(clone_auth(&admin_auth), create_request("Doomed", "", vec![]))
            .await
            .expect("Create failed");

        let deleted = f
            .api
            .delete(clone_auth(&admin_auth), Path(created.process.id.clone()))
            .await
            .expect("Delete failed");
        assert!(deleted.success);

        let result = f.api.get(admin_auth, Path(created.process.id.clone())).await;
        assert!(result.is_err());
        match result {
            Err(PortalError::NotFound(_)) => {
                // Expected error type
            }
            _ => panic!("Expected NotFound error"),
        }
    }
}
