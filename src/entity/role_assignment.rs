//! RoleAssignment entity - `(user, department, role_name)` relation
//!
//! Table: org_role_assignment
//!
//! No uniqueness constraint on the triple: a user may be assigned the same
//! role in the same department more than once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "org_role_assignment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub user_id: i64,

    pub department_id: i64,

    #[sea_orm(column_type = "String(Some(64))")]
    pub role_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Role listing response item
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleResponse {
    pub department_id: i64,
    pub role_name: String,
}

impl From<Model> for RoleResponse {
    fn from(model: Model) -> Self {
        Self {
            department_id: model.department_id,
            role_name: model.role_name,
        }
    }
}
