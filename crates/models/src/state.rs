use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::timestamp;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "states")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
