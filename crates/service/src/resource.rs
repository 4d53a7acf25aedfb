//! Per-entity field tables and typed setters for the generic CRUD contract.
//!
//! Each kind declares which body fields create requires (in check order), which
//! fields update must leave alone, and how a JSON value maps onto each mutable
//! attribute. Unknown keys are ignored. Values are coerced onto the column type
//! (see [`crate::payload`]); one the column cannot hold leaves the attribute as it was.

use chrono::NaiveDateTime;
use models::{amenity, city, place, review, state, user, EntityKind, Record};
use serde_json::Value;

use crate::{
    errors::ServiceError,
    password,
    payload::{self, Payload},
};

const BASE_IMMUTABLE: [&str; 3] = ["id", "created_at", "updated_at"];

pub trait Resource: Clone + Send + Sync + 'static + Into<Record> + TryFrom<Record, Error = Record> {
    const KIND: EntityKind;
    /// Fields create insists on, in the order they are checked.
    const REQUIRED: &'static [&'static str];
    /// Fields update silently skips.
    const IMMUTABLE: &'static [&'static str];
    /// Body field naming a user that must exist when the object is created.
    const OWNER: Option<&'static str> = None;

    /// Build a fresh object from a body that already carries every required field
    /// (and the parent reference, for nested kinds).
    fn build(id: String, now: NaiveDateTime, body: &Payload) -> Result<Self, ServiceError>;

    /// Overwrite one mutable attribute.
    fn assign(&mut self, field: &str, value: &Value) -> Result<(), ServiceError>;

    fn touch(&mut self, now: NaiveDateTime);
}

impl Resource for state::Model {
    const KIND: EntityKind = EntityKind::State;
    const REQUIRED: &'static [&'static str] = &["name"];
    const IMMUTABLE: &'static [&'static str] = &BASE_IMMUTABLE;

    fn build(id: String, now: NaiveDateTime, body: &Payload) -> Result<Self, ServiceError> {
        Ok(Self { id, created_at: now, updated_at: now, name: body.text("name")? })
    }

    fn assign(&mut self, field: &str, value: &Value) -> Result<(), ServiceError> {
        if field == "name" {
            if let Some(v) = payload::text(value) {
                self.name = v;
            }
        }
        Ok(())
    }

    fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = now;
    }
}

impl Resource for amenity::Model {
    const KIND: EntityKind = EntityKind::Amenity;
    const REQUIRED: &'static [&'static str] = &["name"];
    const IMMUTABLE: &'static [&'static str] = &BASE_IMMUTABLE;

    fn build(id: String, now: NaiveDateTime, body: &Payload) -> Result<Self, ServiceError> {
        Ok(Self { id, created_at: now, updated_at: now, name: body.text("name")? })
    }

    fn assign(&mut self, field: &str, value: &Value) -> Result<(), ServiceError> {
        if field == "name" {
            if let Some(v) = payload::text(value) {
                self.name = v;
            }
        }
        Ok(())
    }

    fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = now;
    }
}

impl Resource for city::Model {
    const KIND: EntityKind = EntityKind::City;
    const REQUIRED: &'static [&'static str] = &["name"];
    const IMMUTABLE: &'static [&'static str] = &["id", "created_at", "updated_at", "state_id"];

    fn build(id: String, now: NaiveDateTime, body: &Payload) -> Result<Self, ServiceError> {
        Ok(Self {
            id,
            created_at: now,
            updated_at: now,
            state_id: body.text("state_id")?,
            name: body.text("name")?,
        })
    }

    fn assign(&mut self, field: &str, value: &Value) -> Result<(), ServiceError> {
        if field == "name" {
            if let Some(v) = payload::text(value) {
                self.name = v;
            }
        }
        Ok(())
    }

    fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = now;
    }
}

/// The clear-text password never reaches the model; both create and update store its hash.
impl Resource for user::Model {
    const KIND: EntityKind = EntityKind::User;
    const REQUIRED: &'static [&'static str] = &["email", "password"];
    const IMMUTABLE: &'static [&'static str] = &["id", "created_at", "updated_at", "email"];

    fn build(id: String, now: NaiveDateTime, body: &Payload) -> Result<Self, ServiceError> {
        let plain = body.text("password")?;
        Ok(Self {
            id,
            created_at: now,
            updated_at: now,
            email: body.text("email")?,
            password: password::hash(&plain)?,
            first_name: None,
            last_name: None,
        })
    }

    fn assign(&mut self, field: &str, value: &Value) -> Result<(), ServiceError> {
        match field {
            "password" => {
                if let Some(plain) = payload::text(value) {
                    self.password = password::hash(&plain)?;
                }
            }
            "first_name" => self.first_name = payload::text(value),
            "last_name" => self.last_name = payload::text(value),
            _ => {}
        }
        Ok(())
    }

    fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = now;
    }
}

impl Resource for place::Model {
    const KIND: EntityKind = EntityKind::Place;
    const REQUIRED: &'static [&'static str] = &["user_id", "name"];
    const IMMUTABLE: &'static [&'static str] = &["id", "created_at", "updated_at", "city_id", "user_id"];
    const OWNER: Option<&'static str> = Some("user_id");

    fn build(id: String, now: NaiveDateTime, body: &Payload) -> Result<Self, ServiceError> {
        Ok(Self {
            id,
            created_at: now,
            updated_at: now,
            city_id: body.text("city_id")?,
            user_id: body.text("user_id")?,
            name: body.text("name")?,
            description: None,
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: None,
            longitude: None,
        })
    }

    fn assign(&mut self, field: &str, value: &Value) -> Result<(), ServiceError> {
        match field {
            "name" => {
                if let Some(v) = payload::text(value) {
                    self.name = v;
                }
            }
            "description" => self.description = payload::text(value),
            "number_rooms" => {
                if let Some(n) = payload::int(value) {
                    self.number_rooms = n;
                }
            }
            "number_bathrooms" => {
                if let Some(n) = payload::int(value) {
                    self.number_bathrooms = n;
                }
            }
            "max_guest" => {
                if let Some(n) = payload::int(value) {
                    self.max_guest = n;
                }
            }
            "price_by_night" => {
                if let Some(n) = payload::int(value) {
                    self.price_by_night = n;
                }
            }
            "latitude" => {
                if let Some(f) = payload::opt_float(value) {
                    self.latitude = f;
                }
            }
            "longitude" => {
                if let Some(f) = payload::opt_float(value) {
                    self.longitude = f;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = now;
    }
}

impl Resource for review::Model {
    const KIND: EntityKind = EntityKind::Review;
    const REQUIRED: &'static [&'static str] = &["user_id", "text"];
    const IMMUTABLE: &'static [&'static str] = &["id", "created_at", "updated_at", "place_id", "user_id"];
    const OWNER: Option<&'static str> = Some("user_id");

    fn build(id: String, now: NaiveDateTime, body: &Payload) -> Result<Self, ServiceError> {
        Ok(Self {
            id,
            created_at: now,
            updated_at: now,
            place_id: body.text("place_id")?,
            user_id: body.text("user_id")?,
            text: body.text("text")?,
        })
    }

    fn assign(&mut self, field: &str, value: &Value) -> Result<(), ServiceError> {
        if field == "text" {
            if let Some(v) = payload::text(value) {
                self.text = v;
            }
        }
        Ok(())
    }

    fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = now;
    }
}
