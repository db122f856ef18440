//! Task assignment service
//!
//! Tasks carry an author, one responsible user, and many-to-many observer
//! and executor sets. Participant wiring shares the department store's
//! transactional discipline but is independent of the hierarchy.

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};

use crate::entity::task::TaskStatus;
use crate::entity::{task, task_executor, task_observer, user};
use crate::error::{AppError, AppResult, OptionExt};
use crate::middleware::CurrentUser;

/// New-task input
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub responsible_id: i64,
    pub observer_ids: Vec<i64>,
    pub executor_ids: Vec<i64>,
    pub deadline: Option<String>,
    pub estimated_time: Option<f64>,
    pub status: Option<String>,
}

/// Field updates for an existing task
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<String>,
    pub estimated_time: Option<f64>,
}

fn parse_status(value: &str) -> AppResult<TaskStatus> {
    value
        .parse()
        .map_err(|bad| AppError::Validation(format!("Invalid status: {bad}")))
}

pub struct TaskAssignmentService {
    db: DatabaseConnection,
}

impl TaskAssignmentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch a task, hiding tasks authored in other companies.
    async fn owned_task<C: ConnectionTrait>(
        &self,
        conn: &C,
        caller: &CurrentUser,
        task_id: i64,
    ) -> AppResult<task::Model> {
        let task = task::Entity::find_by_id(task_id)
            .one(conn)
            .await?
            .ok_or_not_found("Task not found")?;
        let author = user::Entity::find_by_id(task.author_id).one(conn).await?;
        if author.map(|a| a.company_id) != Some(caller.company_id) {
            return Err(AppError::NotFound("Task not found".into()));
        }
        Ok(task)
    }

    /// Every observer/executor/responsible id must resolve to a user in the
    /// caller's company before anything is linked.
    async fn resolve_participants(
        &self,
        txn: &DatabaseTransaction,
        caller: &CurrentUser,
        ids: impl IntoIterator<Item = i64>,
    ) -> AppResult<()> {
        let wanted: HashSet<i64> = ids.into_iter().collect();
        if wanted.is_empty() {
            return Ok(());
        }
        let found: HashSet<i64> = user::Entity::find()
            .filter(user::Column::Id.is_in(wanted.iter().copied()))
            .filter(user::Column::CompanyId.eq(caller.company_id))
            .all(txn)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        if let Some(missing) = wanted.difference(&found).next() {
            return Err(AppError::NotFound(format!(
                "Participant with id {missing} not found"
            )));
        }
        Ok(())
    }

    pub async fn create_task(
        &self,
        caller: &CurrentUser,
        input: NewTask,
    ) -> AppResult<task::Model> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("Task title must not be empty".into()));
        }
        let status = match &input.status {
            Some(s) => parse_status(s)?,
            None => TaskStatus::New,
        };

        let txn = self.db.begin().await?;

        let all_ids = input
            .observer_ids
            .iter()
            .chain(&input.executor_ids)
            .chain(std::iter::once(&input.responsible_id))
            .copied();
        self.resolve_participants(&txn, caller, all_ids).await?;

        let inserted = task::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            author_id: Set(caller.id),
            responsible_id: Set(input.responsible_id),
            deadline: Set(input.deadline),
            status: Set(status),
            estimated_time: Set(input.estimated_time),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let observers: Vec<task_observer::ActiveModel> = dedup(&input.observer_ids)
            .into_iter()
            .map(|uid| task_observer::ActiveModel {
                task_id: Set(inserted.id),
                user_id: Set(uid),
            })
            .collect();
        if !observers.is_empty() {
            task_observer::Entity::insert_many(observers)
                .exec(&txn)
                .await?;
        }

        let executors: Vec<task_executor::ActiveModel> = dedup(&input.executor_ids)
            .into_iter()
            .map(|uid| task_executor::ActiveModel {
                task_id: Set(inserted.id),
                user_id: Set(uid),
            })
            .collect();
        if !executors.is_empty() {
            task_executor::Entity::insert_many(executors)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        tracing::debug!(task_id = inserted.id, "task created");
        Ok(inserted)
    }

    pub async fn get_task(
        &self,
        caller: &CurrentUser,
        task_id: i64,
    ) -> AppResult<(task::Model, Vec<i64>, Vec<i64>)> {
        let task = self.owned_task(&self.db, caller, task_id).await?;

        let observer_ids = task_observer::Entity::find()
            .filter(task_observer::Column::TaskId.eq(task_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|l| l.user_id)
            .collect();
        let executor_ids = task_executor::Entity::find()
            .filter(task_executor::Column::TaskId.eq(task_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|l| l.user_id)
            .collect();

        Ok((task, observer_ids, executor_ids))
    }

    pub async fn update_task(
        &self,
        caller: &CurrentUser,
        task_id: i64,
        updates: TaskUpdate,
    ) -> AppResult<task::Model> {
        let task = self.owned_task(&self.db, caller, task_id).await?;

        // Validate before writing anything
        let status = updates.status.as_deref().map(parse_status).transpose()?;

        let mut active: task::ActiveModel = task.into();
        if let Some(title) = updates.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("Task title must not be empty".into()));
            }
            active.title = Set(title);
        }
        if let Some(description) = updates.description {
            active.description = Set(Some(description));
        }
        if let Some(status) = status {
            active.status = Set(status);
        }
        if let Some(deadline) = updates.deadline {
            active.deadline = Set(Some(deadline));
        }
        if let Some(estimated_time) = updates.estimated_time {
            active.estimated_time = Set(Some(estimated_time));
        }
        Ok(active.update(&self.db).await?)
    }

    /// Delete a task and its participant links in one transaction.
    pub async fn delete_task(&self, caller: &CurrentUser, task_id: i64) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let task = self.owned_task(&txn, caller, task_id).await?;

        task_observer::Entity::delete_many()
            .filter(task_observer::Column::TaskId.eq(task.id))
            .exec(&txn)
            .await?;
        task_executor::Entity::delete_many()
            .filter(task_executor::Column::TaskId.eq(task.id))
            .exec(&txn)
            .await?;
        task::Entity::delete_by_id(task.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}

/// Order-preserving dedup; the join tables key on `(task_id, user_id)`.
fn dedup(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert!(parse_status("New").is_ok());
        assert!(parse_status("in progress").is_ok());
        let err = parse_status("Blocked").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Blocked")));
    }

    #[test]
    fn test_dedup_preserves_order() {
        assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(dedup(&[]).is_empty());
    }
}
