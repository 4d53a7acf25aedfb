//! Closed enumeration of the six entity kinds and a tagged wrapper over their models.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ModelError;
use crate::{amenity, city, place, review, state, user};

/// Every entity type the API exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Amenity,
    City,
    Place,
    Review,
    State,
    User,
}

/// A child kind's reference to its owning parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentLink {
    pub kind: EntityKind,
    pub field: &'static str,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Amenity,
        EntityKind::City,
        EntityKind::Place,
        EntityKind::Review,
        EntityKind::State,
        EntityKind::User,
    ];

    /// Type discriminator written to `__class__` and used as file-store key prefix.
    pub fn class_name(self) -> &'static str {
        match self {
            EntityKind::Amenity => "Amenity",
            EntityKind::City => "City",
            EntityKind::Place => "Place",
            EntityKind::Review => "Review",
            EntityKind::State => "State",
            EntityKind::User => "User",
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Amenity => "amenities",
            EntityKind::City => "cities",
            EntityKind::Place => "places",
            EntityKind::Review => "reviews",
            EntityKind::State => "states",
            EntityKind::User => "users",
        }
    }

    /// Parent collection this kind is created under, if any.
    pub fn parent(self) -> Option<ParentLink> {
        match self {
            EntityKind::City => Some(ParentLink { kind: EntityKind::State, field: "state_id" }),
            EntityKind::Place => Some(ParentLink { kind: EntityKind::City, field: "city_id" }),
            EntityKind::Review => Some(ParentLink { kind: EntityKind::Place, field: "place_id" }),
            EntityKind::Amenity | EntityKind::State | EntityKind::User => None,
        }
    }

    pub fn from_class_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.class_name() == name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// One stored object of any kind.
///
/// Serializes as the model's fields plus a `__class__` discriminator, which is
/// also the on-disk format of the file store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Record {
    Amenity(amenity::Model),
    City(city::Model),
    Place(place::Model),
    Review(review::Model),
    State(state::Model),
    User(user::Model),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Amenity(_) => EntityKind::Amenity,
            Record::City(_) => EntityKind::City,
            Record::Place(_) => EntityKind::Place,
            Record::Review(_) => EntityKind::Review,
            Record::State(_) => EntityKind::State,
            Record::User(_) => EntityKind::User,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Amenity(m) => &m.id,
            Record::City(m) => &m.id,
            Record::Place(m) => &m.id,
            Record::Review(m) => &m.id,
            Record::State(m) => &m.id,
            Record::User(m) => &m.id,
        }
    }

    /// Id of the owning parent for kinds that have one (see [`EntityKind::parent`]).
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Record::City(m) => Some(&m.state_id),
            Record::Place(m) => Some(&m.city_id),
            Record::Review(m) => Some(&m.place_id),
            Record::Amenity(_) | Record::State(_) | Record::User(_) => None,
        }
    }

    pub fn created_at(&self) -> chrono::NaiveDateTime {
        match self {
            Record::Amenity(m) => m.created_at,
            Record::City(m) => m.created_at,
            Record::Place(m) => m.created_at,
            Record::Review(m) => m.created_at,
            Record::State(m) => m.created_at,
            Record::User(m) => m.created_at,
        }
    }

    /// `"<Class>.<id>"`, the key used by the file store.
    pub fn storage_key(&self) -> String {
        storage_key(self.kind(), self.id())
    }

    /// Public dictionary representation: every attribute, `__class__`, ISO-8601
    /// timestamps; a user's password hash is never exposed.
    pub fn to_dict(&self) -> Result<Value, ModelError> {
        let mut value = serde_json::to_value(self)?;
        if let (Record::User(_), Value::Object(map)) = (self, &mut value) {
            map.remove("password");
        }
        Ok(value)
    }
}

pub fn storage_key(kind: EntityKind, id: &str) -> String {
    format!("{}.{}", kind.class_name(), id)
}

macro_rules! record_conversions {
    ($($variant:ident => $module:ident),* $(,)?) => {
        $(
            impl From<$module::Model> for Record {
                fn from(model: $module::Model) -> Self {
                    Record::$variant(model)
                }
            }

            impl TryFrom<Record> for $module::Model {
                type Error = Record;

                fn try_from(record: Record) -> Result<Self, Self::Error> {
                    match record {
                        Record::$variant(model) => Ok(model),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

record_conversions! {
    Amenity => amenity,
    City => city,
    Place => place,
    Review => review,
    State => state,
    User => user,
}
