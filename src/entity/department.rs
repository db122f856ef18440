//! Department entity
//!
//! Table: org_department
//!
//! The `path` column is the dot-separated materialized path ("1.2.3") and
//! is written exclusively by `hierarchy::store::DepartmentStore`. Path
//! values are unique per company; segments are department ids, so every
//! prefix of a stored path identifies an existing ancestor.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::hierarchy::path::{DeptPath, PathError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "org_department")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Department name
    #[sea_orm(column_type = "String(Some(128))")]
    pub name: String,

    /// Materialized path. Empty only inside the creating transaction,
    /// before the id-derived path is written back.
    #[sea_orm(column_type = "String(Some(512))", indexed)]
    pub path: String,

    /// Owning company (tenant)
    pub company_id: i64,

    /// Managing user, if assigned
    pub manager_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

// Cross-module relations are resolved with explicit queries.

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decode the stored path column. Fails on the empty placeholder or a
    /// corrupted value; callers treat that as an inconsistent-state error.
    pub fn dept_path(&self) -> Result<DeptPath, PathError> {
        self.path.parse()
    }
}

/// Department response shape used by handlers
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DepartmentResponse {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub company_id: i64,
    pub manager_id: Option<i64>,
}

impl From<Model> for DepartmentResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            path: model.path,
            company_id: model.company_id,
            manager_id: model.manager_id,
        }
    }
}
