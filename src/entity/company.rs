//! Company entity - tenant root
//!
//! Table: org_company

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Name of the company new sign-ups are parked under until they complete
/// registration with a company of their own.
pub const DEFAULT_COMPANY_NAME: &str = "Default Company";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "org_company")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Company name (unique across tenants)
    #[sea_orm(column_type = "String(Some(128))", unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
