//! Organization service
//!
//! Admin-gated orchestration of department, position, and role mutations.
//! Structural department work is delegated to the department store; this
//! layer adds the caller checks and tenant scoping.

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entity::{department, position, role_assignment, user};
use crate::error::{AppError, AppResult, OptionExt};
use crate::hierarchy::DepartmentStore;
use crate::middleware::CurrentUser;

/// Everyone below `root` in the manager tree, in breadth-first order. The
/// visited set guards against manager cycles in dirty data.
pub fn collect_subordinates(users: &[user::Model], root: i64) -> Vec<user::Model> {
    let mut by_manager: HashMap<i64, Vec<&user::Model>> = HashMap::new();
    for u in users {
        if let Some(mid) = u.manager_id {
            by_manager.entry(mid).or_default().push(u);
        }
    }

    let mut result = Vec::new();
    let mut visited = HashSet::from([root]);
    let mut queue = vec![root];
    while let Some(id) = queue.pop() {
        if let Some(reports) = by_manager.get(&id) {
            for report in reports {
                if visited.insert(report.id) {
                    result.push((*report).clone());
                    queue.push(report.id);
                }
            }
        }
    }
    result
}

pub struct OrganizationService {
    db: DatabaseConnection,
    store: DepartmentStore,
}

impl OrganizationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            store: DepartmentStore::new(db.clone()),
            db,
        }
    }

    fn require_admin(caller: &CurrentUser) -> AppResult<()> {
        if caller.is_admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Fetch a department and hide it from callers of other companies.
    async fn owned_department(
        &self,
        caller: &CurrentUser,
        department_id: i64,
    ) -> AppResult<department::Model> {
        let dept = self.store.get(department_id).await?;
        if dept.company_id != caller.company_id {
            return Err(AppError::NotFound("Department not found".into()));
        }
        Ok(dept)
    }

    async fn owned_user(&self, caller: &CurrentUser, user_id: i64) -> AppResult<user::Model> {
        let target = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User not found")?;
        if target.company_id != caller.company_id {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(target)
    }

    // ---- departments ----

    pub async fn create_department(
        &self,
        caller: &CurrentUser,
        name: &str,
        parent_id: Option<i64>,
    ) -> AppResult<i64> {
        Self::require_admin(caller)?;
        if name.trim().is_empty() {
            return Err(AppError::Validation("Department name must not be empty".into()));
        }
        self.store.create(name, caller.company_id, parent_id).await
    }

    pub async fn get_department(
        &self,
        caller: &CurrentUser,
        department_id: i64,
    ) -> AppResult<department::Model> {
        Self::require_admin(caller)?;
        self.owned_department(caller, department_id).await
    }

    pub async fn get_descendants(
        &self,
        caller: &CurrentUser,
        department_id: i64,
    ) -> AppResult<Vec<department::Model>> {
        Self::require_admin(caller)?;
        self.owned_department(caller, department_id).await?;
        self.store.get_descendants(department_id).await
    }

    pub async fn get_ancestors(
        &self,
        caller: &CurrentUser,
        department_id: i64,
    ) -> AppResult<Vec<department::Model>> {
        Self::require_admin(caller)?;
        self.owned_department(caller, department_id).await?;
        self.store.get_ancestors(department_id).await
    }

    pub async fn move_department(
        &self,
        caller: &CurrentUser,
        department_id: i64,
        new_parent_id: i64,
    ) -> AppResult<()> {
        Self::require_admin(caller)?;
        self.owned_department(caller, department_id).await?;
        self.owned_department(caller, new_parent_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound("Target department not found".into()),
                other => other,
            })?;
        self.store.move_subtree(department_id, new_parent_id).await
    }

    pub async fn update_department(
        &self,
        caller: &CurrentUser,
        department_id: i64,
        name: Option<String>,
    ) -> AppResult<department::Model> {
        Self::require_admin(caller)?;
        self.owned_department(caller, department_id).await?;
        let name = name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("No fields to update".into()))?;
        self.store.rename(department_id, &name).await
    }

    pub async fn delete_department(
        &self,
        caller: &CurrentUser,
        department_id: i64,
    ) -> AppResult<u64> {
        Self::require_admin(caller)?;
        self.owned_department(caller, department_id).await?;
        self.store.delete_subtree(department_id).await
    }

    pub async fn assign_manager(
        &self,
        caller: &CurrentUser,
        department_id: i64,
        user_id: i64,
    ) -> AppResult<department::Model> {
        Self::require_admin(caller)?;
        self.owned_department(caller, department_id).await?;
        self.owned_user(caller, user_id).await?;
        self.store.set_manager(department_id, Some(user_id)).await
    }

    // ---- positions ----

    pub async fn create_position(
        &self,
        caller: &CurrentUser,
        name: &str,
        description: Option<String>,
    ) -> AppResult<i64> {
        Self::require_admin(caller)?;
        let existing = position::Entity::find()
            .filter(position::Column::CompanyId.eq(caller.company_id))
            .filter(position::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Position name already in use".into()));
        }

        let inserted = position::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            company_id: Set(caller.company_id),
            department_id: Set(None),
            user_id: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(inserted.id)
    }

    async fn owned_position(
        &self,
        caller: &CurrentUser,
        position_id: i64,
    ) -> AppResult<position::Model> {
        let pos = position::Entity::find_by_id(position_id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Position not found")?;
        if pos.company_id != caller.company_id {
            return Err(AppError::NotFound("Position not found".into()));
        }
        Ok(pos)
    }

    pub async fn update_position(
        &self,
        caller: &CurrentUser,
        position_id: i64,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<position::Model> {
        Self::require_admin(caller)?;
        let pos = self.owned_position(caller, position_id).await?;
        if name.is_none() && description.is_none() {
            return Err(AppError::BadRequest("No fields to update".into()));
        }

        let mut active: position::ActiveModel = pos.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(Some(description));
        }
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_position(&self, caller: &CurrentUser, position_id: i64) -> AppResult<()> {
        Self::require_admin(caller)?;
        self.owned_position(caller, position_id).await?;
        position::Entity::delete_by_id(position_id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn assign_position_to_department(
        &self,
        caller: &CurrentUser,
        position_id: i64,
        department_id: i64,
    ) -> AppResult<position::Model> {
        Self::require_admin(caller)?;
        let pos = self.owned_position(caller, position_id).await?;
        self.owned_department(caller, department_id).await?;

        let mut active: position::ActiveModel = pos.into();
        active.department_id = Set(Some(department_id));
        Ok(active.update(&self.db).await?)
    }

    pub async fn assign_position_to_user(
        &self,
        caller: &CurrentUser,
        position_id: i64,
        user_id: i64,
    ) -> AppResult<position::Model> {
        Self::require_admin(caller)?;
        let pos = self.owned_position(caller, position_id).await?;
        let target = self.owned_user(caller, user_id).await?;
        if pos.company_id != target.company_id {
            return Err(AppError::Validation(
                "Position and user must belong to the same company".into(),
            ));
        }

        let mut active: position::ActiveModel = pos.into();
        active.user_id = Set(Some(user_id));
        let updated = active.update(&self.db).await?;

        let mut user_active: user::ActiveModel = target.into();
        user_active.position_id = Set(Some(position_id));
        user_active.update(&self.db).await?;

        Ok(updated)
    }

    // ---- roles ----

    /// Assign a role to a user within a department. Duplicate triples are
    /// allowed; the caller gets a fresh assignment row each time.
    pub async fn assign_role(
        &self,
        caller: &CurrentUser,
        user_id: i64,
        department_id: i64,
        role_name: &str,
    ) -> AppResult<i64> {
        Self::require_admin(caller)?;
        if role_name.trim().is_empty() {
            return Err(AppError::Validation("Role name must not be empty".into()));
        }
        self.owned_user(caller, user_id).await?;
        self.owned_department(caller, department_id).await?;

        let inserted = role_assignment::ActiveModel {
            user_id: Set(user_id),
            department_id: Set(department_id),
            role_name: Set(role_name.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(inserted.id)
    }

    /// Roles may be listed by the user themselves or by an admin.
    pub async fn get_roles(
        &self,
        caller: &CurrentUser,
        user_id: i64,
    ) -> AppResult<Vec<role_assignment::Model>> {
        if !caller.is_admin && caller.id != user_id {
            return Err(AppError::PermissionDenied);
        }
        self.owned_user(caller, user_id).await?;
        Ok(role_assignment::Entity::find()
            .filter(role_assignment::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?)
    }

    // ---- manager tree ----

    /// Transitive reports of a user via the `manager_id` tree. One
    /// company-scoped query, closure computed in memory.
    pub async fn get_subordinates(
        &self,
        caller: &CurrentUser,
        user_id: i64,
    ) -> AppResult<Vec<user::Model>> {
        if !caller.is_admin && caller.id != user_id {
            return Err(AppError::PermissionDenied);
        }
        let target = self.owned_user(caller, user_id).await?;

        let company_users = user::Entity::find()
            .filter(user::Column::CompanyId.eq(target.company_id))
            .all(&self.db)
            .await?;
        Ok(collect_subordinates(&company_users, user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(id: i64, manager_id: Option<i64>) -> user::Model {
        user::Model {
            id,
            email: format!("u{id}@example.com"),
            hashed_password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            is_admin: false,
            company_id: 1,
            position_id: None,
            department_id: None,
            manager_id,
        }
    }

    #[test]
    fn test_collect_subordinates_transitive() {
        // 1 manages 2 and 3; 3 manages 4; 5 is unrelated
        let users = vec![u(1, None), u(2, Some(1)), u(3, Some(1)), u(4, Some(3)), u(5, None)];
        let mut ids: Vec<i64> = collect_subordinates(&users, 1).iter().map(|m| m.id).collect();
        ids.sort();
        assert_eq!(ids, vec![2, 3, 4]);
        assert!(collect_subordinates(&users, 5).is_empty());
    }

    #[test]
    fn test_collect_subordinates_survives_manager_cycle() {
        let users = vec![u(1, Some(2)), u(2, Some(1))];
        let got = collect_subordinates(&users, 1);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, 2);
    }
}
