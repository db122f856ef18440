//! Invite entity - email verification tokens for signup
//!
//! Table: org_invite

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "org_invite")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "String(Some(128))", unique)]
    pub email: String,

    /// Verification token sent to the address
    #[sea_orm(column_type = "String(Some(64))")]
    pub token: String,

    pub is_verified: bool,

    pub company_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
