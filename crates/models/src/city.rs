use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{state, timestamp};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime,
    pub state_id: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    State,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::State => Entity::belongs_to(state::Entity).from(Column::StateId).to(state::Column::Id).into(),
        }
    }
}

impl Related<state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::State.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
