use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::portal::PortalError;
use crate::types::db::business_process::{self, Entity as BusinessProcess};
use crate::types::db::process_step::{self, Entity as ProcessStep};

/// A process step with its JSON-text columns decoded.
///
/// The stores are the only layer that sees the serialized list form;
/// everything above works with plain vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub step_number: i32,
    pub title: String,
    pub description: String,
    pub responsible: String,
    pub duration: Option<String>,
    pub related_content_ids: Vec<String>,
}

/// A business process with decoded departments and ordered steps
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub departments: Vec<String>,
    pub allowed_roles: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub steps: Vec<StepRecord>,
}

/// A step as submitted for create/replace. Step numbers are assigned from
/// array position, never taken from the caller.
#[derive(Debug, Clone)]
pub struct NewStep {
    pub title: String,
    pub description: String,
    pub responsible: String,
    pub duration: Option<String>,
    pub related_content_ids: Vec<String>,
}

/// ProcessStore manages business processes and their ordered steps
pub struct ProcessStore {
    db: DatabaseConnection,
}

impl ProcessStore {
    /// Create a new ProcessStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// List all processes, newest first, steps in step_number order.
    /// Access filtering happens above this layer; the store returns every row.
    pub async fn list_all(&self) -> Result<Vec<ProcessRecord>, PortalError> {
        let processes = BusinessProcess::find()
            .order_by_desc(business_process::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))?;

        let mut records = Vec::with_capacity(processes.len());
        for process in processes {
            let steps = self.load_steps(&process.id).await?;
            records.push(to_record(process, steps));
        }

        Ok(records)
    }

    /// Find a process by id, with its ordered steps
    pub async fn find_by_id(&self, id: &str) -> Result<Option<ProcessRecord>, PortalError> {
        let process = BusinessProcess::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))?;

        match process {
            Some(process) => {
                let steps = self.load_steps(&process.id).await?;
                Ok(Some(to_record(process, steps)))
            }
            None => Ok(None),
        }
    }

    /// Create a new process with its steps
    pub async fn create(
        &self,
        name: String,
        description: String,
        departments: Vec<String>,
        allowed_roles: String,
        steps: Vec<NewStep>,
    ) -> Result<ProcessRecord, PortalError> {
        let now = Utc::now().timestamp();
        let process_id = Uuid::new_v4().to_string();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to start transaction: {}", e)))?;

        let row = business_process::ActiveModel {
            id: Set(process_id.clone()),
            name: Set(name),
            description: Set(description),
            departments: Set(encode_list(&departments)),
            allowed_roles: Set(allowed_roles),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = row
            .insert(&txn)
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to insert process: {}", e)))?;

        insert_steps(&txn, &process_id, &steps).await?;

        txn.commit()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to commit transaction: {}", e)))?;

        let steps = self.load_steps(&inserted.id).await?;
        Ok(to_record(inserted, steps))
    }

    /// Update a process and replace all of its steps.
    ///
    /// The replace-all protocol: existing step rows are deleted, then the
    /// submitted steps are inserted with step_number = 1-based array
    /// position. Runs in one transaction so a concurrent reader never sees a
    /// process with zero steps mid-replace.
    pub async fn update(
        &self,
        id: &str,
        name: String,
        description: String,
        departments: Vec<String>,
        allowed_roles: Option<String>,
        steps: Vec<NewStep>,
    ) -> Result<ProcessRecord, PortalError> {
        let existing = BusinessProcess::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))?
            .ok_or_else(|| PortalError::not_found("Process not found"))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to start transaction: {}", e)))?;

        let mut active: business_process::ActiveModel = existing.into();
        active.name = Set(name);
        active.description = Set(description);
        active.departments = Set(encode_list(&departments));
        if let Some(allowed_roles) = allowed_roles {
            active.allowed_roles = Set(allowed_roles);
        }
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to update process: {}", e)))?;

        delete_steps(&txn, id).await?;
        insert_steps(&txn, id, &steps).await?;

        txn.commit()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to commit transaction: {}", e)))?;

        let steps = self.load_steps(id).await?;
        Ok(to_record(updated, steps))
    }

    /// Replace all steps of a process without touching its other fields.
    /// Same delete-then-insert protocol as `update`, in one transaction.
    pub async fn replace_steps(
        &self,
        process_id: &str,
        steps: Vec<NewStep>,
    ) -> Result<Vec<StepRecord>, PortalError> {
        let exists = BusinessProcess::find_by_id(process_id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))?;
        if exists.is_none() {
            return Err(PortalError::not_found("Process not found"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to start transaction: {}", e)))?;

        delete_steps(&txn, process_id).await?;
        insert_steps(&txn, process_id, &steps).await?;

        txn.commit()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to commit transaction: {}", e)))?;

        self.load_steps(process_id).await
    }

    /// Delete a process and its steps
    pub async fn delete(&self, id: &str) -> Result<(), PortalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to start transaction: {}", e)))?;

        delete_steps(&txn, id).await?;

        let result = BusinessProcess::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to delete process: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to commit transaction: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(PortalError::not_found("Process not found"));
        }

        Ok(())
    }

    async fn load_steps(&self, process_id: &str) -> Result<Vec<StepRecord>, PortalError> {
        let steps = ProcessStep::find()
            .filter(process_step::Column::ProcessId.eq(process_id))
            .order_by_asc(process_step::Column::StepNumber)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::internal_error(format!("Database error: {}", e)))?;

        Ok(steps.into_iter().map(step_to_record).collect())
    }
}

impl std::fmt::Debug for ProcessStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessStore")
            .field("db", &"<connection>")
            .finish()
    }
}

async fn delete_steps<C: ConnectionTrait>(conn: &C, process_id: &str) -> Result<(), PortalError> {
    ProcessStep::delete_many()
        .filter(process_step::Column::ProcessId.eq(process_id))
        .exec(conn)
        .await
        .map_err(|e| PortalError::internal_error(format!("Failed to delete steps: {}", e)))?;
    Ok(())
}

async fn insert_steps<C: ConnectionTrait>(
    conn: &C,
    process_id: &str,
    steps: &[NewStep],
) -> Result<(), PortalError> {
    for (index, step) in steps.iter().enumerate() {
        let row = process_step::ActiveModel {
            process_id: Set(process_id.to_string()),
            // Input order is authoritative: 1-based position
            step_number: Set(index as i32 + 1),
            title: Set(step.title.clone()),
            description: Set(step.description.clone()),
            responsible: Set(step.responsible.clone()),
            duration: Set(step.duration.clone()),
            related_content_ids: Set(encode_list(&step.related_content_ids)),
        };
        row.insert(conn)
            .await
            .map_err(|e| PortalError::internal_error(format!("Failed to insert step: {}", e)))?;
    }
    Ok(())
}

fn to_record(process: business_process::Model, steps: Vec<StepRecord>) -> ProcessRecord {
    ProcessRecord {
        id: process.id,
        name: process.name,
        description: process.description,
        departments: decode_list(&process.departments),
        allowed_roles: process.allowed_roles,
        created_at: process.created_at,
        updated_at: process.updated_at,
        steps,
    }
}

fn step_to_record(step: process_step::Model) -> StepRecord {
    StepRecord {
        step_number: step.step_number,
        title: step.title,
        description: step.description,
        responsible: step.responsible,
        duration: step.duration,
        related_content_ids: decode_list(&step.related_content_ids),
    }
}

// Malformed stored JSON degrades to an empty list, never an error
fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    async fn setup_test_db() -> (DatabaseConnection, ProcessStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let store = ProcessStore::new(db.clone());
        (db, store)
    }

    fn step(title: &str, related: &[&str]) -> NewStep {
        NewStep {
            title: title.to_string(),
            description: format!("{} description", title),
            responsible: "Warehouse lead".to_string(),
            duration: Some("1 day".to_string()),
            related_content_ids: related.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_round_trips_decoded_fields() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .create(
                "Goods receiving".to_string(),
                "Inbound flow".to_string(),
                vec!["logistics".to_string(), "warehouse".to_string()],
                "logistics,admin".to_string(),
                vec![step("Unload", &["c1"]), step("Inspect", &[])],
            )
            .await
            .expect("Failed to create process");

        assert_eq!(created.departments, vec!["logistics", "warehouse"]);
        assert_eq!(created.steps.len(), 2);
        assert_eq!(created.steps[0].step_number, 1);
        assert_eq!(created.steps[0].related_content_ids, vec!["c1"]);
        assert_eq!(created.steps[1].step_number, 2);

        let fetched = store
            .find_by_id(&created.id)
            .await
            .expect("Query failed")
            .expect("Process not found");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_replace_steps_numbering_follows_array_position() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .create(
                "Ordering".to_string(),
                String::new(),
                vec![],
                String::new(),
                vec![step("Old 1", &[]), step("Old 2", &[]), step("Old 3", &[]), step("Old 4", &[])],
            )
            .await
            .unwrap();

        // Replacement order C, A, B becomes numbering 1, 2, 3
        let replaced = store
            .replace_steps(
                &created.id,
                vec![step("C", &[]), step("A", &[]), step("B", &[])],
            )
            .await
            .expect("Replace failed");

        assert_eq!(replaced.len(), 3);
        assert_eq!(
            replaced
                .iter()
                .map(|s| (s.step_number, s.title.as_str()))
                .collect::<Vec<_>>(),
            vec![(1, "C"), (2, "A"), (3, "B")]
        );

        // Next fetch sees the same canonical order
        let fetched = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.steps, replaced);
    }

    #[tokio::test]
    async fn test_replace_steps_unknown_process_is_not_found() {
        let (_db, store) = setup_test_db().await;

        let result = store.replace_steps("ghost", vec![step("A", &[])]).await;

        assert!(result.is_err());
        match result {
            Err(PortalError::NotFound(_)) => {
                // Expected error type
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_steps() {
        let (_db, store) = setup_test_db().await;

        let created = store
            .create(
                "Draft".to_string(),
                String::new(),
                vec!["sales".to_string()],
                "manager".to_string(),
                vec![step("Only", &[])],
            )
            .await
            .unwrap();

        let updated = store
            .update(
                &created.id,
                "Final".to_string(),
                "Approved".to_string(),
                vec!["sales".to_string(), "legal".to_string()],
                None,
                vec![step("First", &[]), step("Second", &[])],
            )
            .await
            .expect("Update failed");

        assert_eq!(updated.name, "Final");
        assert_eq!(updated.departments, vec!["sales", "legal"]);
        // Omitted policy stays unchanged
        assert_eq!(updated.allowed_roles, "manager");
        assert_eq!(updated.steps.len(), 2);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_list_all_orders_by_created_at_descending() {
        let (db, store) = setup_test_db().await;

        // Insert rows directly with distinct timestamps
        for (name, created_at) in [("Oldest", 100), ("Newest", 300), ("Middle", 200)] {
            let row = business_process::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                name: Set(name.to_string()),
                description: Set(String::new()),
                departments: Set("[]".to_string()),
                allowed_roles: Set(String::new()),
                created_at: Set(created_at),
                updated_at: Set(created_at),
            };
            row.insert(&db).await.expect("Failed to insert process");
        }

        let listed = store.list_all().await.expect("List failed");
        let names: Vec<_> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
    }

    #[tokio::test]
    async fn test_malformed_stored_json_degrades_to_empty_lists() {
        let (db, store) = setup_test_db().await;

        let row = business_process::ActiveModel {
            id: Set("broken".to_string()),
            name: Set("Broken".to_string()),
            description: Set(String::new()),
            departments: Set("not json".to_string()),
            allowed_roles: Set(String::new()),
            created_at: Set(1),
            updated_at: Set(1),
        };
        row.insert(&db).await.expect("Failed to insert process");

        let step_row = process_step::ActiveModel {
            process_id: Set("broken".to_string()),
            step_number: Set(1),
            title: Set("Step".to_string()),
            description: Set(String::new()),
            responsible: Set(String::new()),
            duration: Set(None),
            related_content_ids: Set("{oops".to_string()),
        };
        step_row.insert(&db).await.expect("Failed to insert step");

        let fetched = store.find_by_id("broken").await.unwrap().unwrap();
        assert!(fetched.departments.is_empty());
        assert!(fetched.steps[0].related_content_ids.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_process_and_steps() {
        let (db, store) = setup_test_db().await;

        let created = store
            .create(
                "Doomed".to_string(),
                String::new(),
                vec![],
                String::new(),
                vec![step("A", &[]), step("B", &[])],
            )
            .await
            .unwrap();

        store.delete(&created.id).await.expect("Delete failed");

        assert!(store.find_by_id(&created.id).await.unwrap().is_none());
        let orphans = ProcessStep::find()
            .filter(process_step::Column::ProcessId.eq(&created.id))
            .all(&db)
            .await
            .expect("Query failed");
        assert!(orphans.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_process_is_not_found() {
        let (_db, store) = setup_test_db().await;

        let result = store.delete("ghost").await;

        assert!(result.is_err());
        match result {
            Err(PortalError::NotFound(_)) => {
                // Expected error type
            }
            _ => panic!("Expected NotFound error"),
        }
    }
}
