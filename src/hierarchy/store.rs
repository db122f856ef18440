//! Department store
//!
//! Sole owner of the `org_department.path` column. Every mutation runs in
//! a transaction; `move_subtree` and `delete_subtree` lock the affected
//! rows (`SELECT ... FOR UPDATE`) before reading the descendant set, so
//! concurrent moves of overlapping subtrees serialize while disjoint
//! subtrees proceed in parallel.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};

use crate::entity::department;
use crate::error::{AppError, AppResult, OptionExt};
use crate::hierarchy::path::DeptPath;
use crate::hierarchy::query;

/// SQL-side descendant predicate: `path = P OR path LIKE 'P.%'`.
/// Dot-terminated prefix keeps this segment-wise ("1" never matches "12");
/// paths contain only digits and dots, so no LIKE escaping is needed.
pub fn descendant_predicate(path: &DeptPath) -> Condition {
    let encoded = path.to_string();
    Condition::any()
        .add(department::Column::Path.eq(encoded.clone()))
        .add(department::Column::Path.like(&format!("{}.%", encoded)))
}

/// Repository for department records and their materialized paths.
#[derive(Clone)]
pub struct DepartmentStore {
    db: DatabaseConnection,
}

impl DepartmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch a single department.
    pub async fn get(&self, department_id: i64) -> AppResult<department::Model> {
        department::Entity::find_by_id(department_id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Department not found")
    }

    /// Create a department, optionally under a parent. The row is inserted
    /// first to obtain its identity, then the id-derived path is written
    /// back inside the same transaction, so no department is ever visible
    /// with a path inconsistent with its id chain.
    pub async fn create(
        &self,
        name: &str,
        company_id: i64,
        parent_id: Option<i64>,
    ) -> AppResult<i64> {
        let txn = self.db.begin().await?;

        // Lock the parent row so a concurrent move cannot change its path
        // between our read and the child's commit.
        let parent = match parent_id {
            Some(pid) => {
                let parent = department::Entity::find_by_id(pid)
                    .filter(department::Column::CompanyId.eq(company_id))
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or_not_found("Parent department not found")?;
                if parent.path.is_empty() {
                    return Err(AppError::InvalidState(
                        "parent department has no committed path".into(),
                    ));
                }
                Some(parent)
            }
            None => None,
        };

        let inserted = department::ActiveModel {
            name: Set(name.to_string()),
            path: Set(String::new()),
            company_id: Set(company_id),
            manager_id: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let path = match &parent {
            Some(parent) => parent
                .dept_path()?
                .child(inserted.id)
                .map_err(|e| AppError::Validation(e.to_string()))?,
            None => DeptPath::root(inserted.id)
                .map_err(|e| AppError::InvalidState(e.to_string()))?,
        };

        let id = inserted.id;
        let mut active: department::ActiveModel = inserted.into();
        active.path = Set(path.to_string());
        active.update(&txn).await?;

        txn.commit().await?;
        tracing::debug!(department_id = id, path = %path, "department created");
        Ok(id)
    }

    /// All departments whose path has this department's path as a prefix,
    /// including the department itself.
    pub async fn get_descendants(&self, department_id: i64) -> AppResult<Vec<department::Model>> {
        let dept = self.get(department_id).await?;
        let path = dept.dept_path()?;
        let rows = department::Entity::find()
            .filter(department::Column::CompanyId.eq(dept.company_id))
            .filter(descendant_predicate(&path))
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// The chain from the root ancestor down to this department, inclusive.
    /// Each prefix of the stored path names one ancestor.
    pub async fn get_ancestors(&self, department_id: i64) -> AppResult<Vec<department::Model>> {
        let dept = self.get(department_id).await?;
        let path = dept.dept_path()?;
        let prefixes: Vec<String> = path
            .ancestor_paths()
            .into_iter()
            .map(|p| p.to_string())
            .collect();
        let mut rows = department::Entity::find()
            .filter(department::Column::CompanyId.eq(dept.company_id))
            .filter(department::Column::Path.is_in(prefixes))
            .all(&self.db)
            .await?;
        // root first
        rows.sort_by_key(|d| d.path.len());
        Ok(rows)
    }

    /// Relocate a whole subtree under a new parent. The moved department's
    /// path becomes `new_parent.path + own id`; every descendant keeps its
    /// suffix relative to the old root. One transaction, row locks on the
    /// entire old subtree.
    pub async fn move_subtree(&self, department_id: i64, new_parent_id: i64) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let dept = department::Entity::find_by_id(department_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Department not found")?;
        let old_path = dept.dept_path()?;

        let new_parent = department::Entity::find_by_id(new_parent_id)
            .filter(department::Column::CompanyId.eq(dept.company_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Target department not found")?;
        if new_parent.path.is_empty() {
            return Err(AppError::InvalidState(
                "target department has no committed path".into(),
            ));
        }
        let parent_path = new_parent.dept_path()?;

        // The new parent must not be the department itself or anything
        // below it; path rewriting alone would silently detach the subtree.
        if query::would_create_cycle(&old_path, &parent_path) {
            return Err(AppError::CycleDetected(format!(
                "cannot move department {} under {}",
                department_id, new_parent_id
            )));
        }

        let new_path = parent_path
            .child(department_id)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // Lock and read the full old subtree (root included), then rewrite
        // each row's prefix. Overlapping moves contend on these row locks.
        let subtree = department::Entity::find()
            .filter(department::Column::CompanyId.eq(dept.company_id))
            .filter(descendant_predicate(&old_path))
            .lock_exclusive()
            .all(&txn)
            .await?;

        for row in subtree {
            let row_path = row.dept_path()?;
            let rebased = row_path.rebase(&old_path, &new_path).ok_or_else(|| {
                AppError::InvalidState(format!(
                    "department {} matched subtree query but is not under {}",
                    row.id, old_path
                ))
            })?;
            let mut active: department::ActiveModel = row.into();
            active.path = Set(rebased.to_string());
            active.update(&txn).await?;
        }

        txn.commit().await?;
        tracing::info!(
            department_id,
            new_parent_id,
            old_path = %old_path,
            new_path = %new_path,
            "subtree moved"
        );
        Ok(())
    }

    /// Delete a department and its whole subtree. Returns the number of
    /// departments removed.
    pub async fn delete_subtree(&self, department_id: i64) -> AppResult<u64> {
        let txn = self.db.begin().await?;

        let dept = department::Entity::find_by_id(department_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found("Department not found")?;
        let path = dept.dept_path()?;

        let result = department::Entity::delete_many()
            .filter(department::Column::CompanyId.eq(dept.company_id))
            .filter(descendant_predicate(&path))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        tracing::info!(
            department_id,
            removed = result.rows_affected,
            "subtree deleted"
        );
        Ok(result.rows_affected)
    }

    /// Rename a department. Does not touch `path`.
    pub async fn rename(&self, department_id: i64, name: &str) -> AppResult<department::Model> {
        let dept = self.get(department_id).await?;
        let mut active: department::ActiveModel = dept.into();
        active.name = Set(name.to_string());
        Ok(active.update(&self.db).await?)
    }

    /// Assign or clear the department manager. Does not touch `path`.
    pub async fn set_manager(
        &self,
        department_id: i64,
        manager_id: Option<i64>,
    ) -> AppResult<department::Model> {
        let dept = self.get(department_id).await?;
        let mut active: department::ActiveModel = dept.into();
        active.manager_id = Set(manager_id);
        Ok(active.update(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_descendant_predicate_sql() {
        let path: DeptPath = "1.2".parse().unwrap();
        let sql = department::Entity::find()
            .filter(descendant_predicate(&path))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""path" = '1.2'"#), "{sql}");
        assert!(sql.contains(r#""path" LIKE '1.2.%'"#), "{sql}");
    }
}
