//! User entity
//!
//! Table: org_user
//!
//! `manager_id` forms a separate self-referencing tree over users (not the
//! department path hierarchy); subordinate lookup walks it in memory.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "org_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Email (unique, doubles as the login account)
    #[sea_orm(column_type = "String(Some(128))", unique)]
    pub email: String,

    /// bcrypt hash
    #[sea_orm(column_type = "String(Some(128))")]
    #[serde(skip_serializing)]
    pub hashed_password: String,

    #[sea_orm(column_type = "String(Some(64))")]
    pub first_name: String,

    #[sea_orm(column_type = "String(Some(64))")]
    pub last_name: String,

    /// Inactive accounts cannot sign in (invite not confirmed yet)
    pub is_active: bool,

    /// Company administrator flag; gates every structural mutation
    pub is_admin: bool,

    /// Owning company (tenant)
    pub company_id: i64,

    /// Position held, if any
    pub position_id: Option<i64>,

    /// Department membership, if any
    pub department_id: Option<i64>,

    /// Direct manager in the user tree
    pub manager_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// User response (no password hash)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub company_id: i64,
    pub position_id: Option<i64>,
    pub department_id: Option<i64>,
    pub manager_id: Option<i64>,
}

impl From<Model> for UserResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            is_active: model.is_active,
            is_admin: model.is_admin,
            company_id: model.company_id,
            position_id: model.position_id,
            department_id: model.department_id,
            manager_id: model.manager_id,
        }
    }
}
