// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::entity::EntityType;
use crate::error::DomainError;
use crate::timestamp::{ServerTimestamp, parse_date, parse_server_timestamp};
use serde_json::{Map, Value};
use time::{Date, OffsetDateTime};

/// A business record as listed by one of the domain collections.
///
/// Every collection has its own payload shape. The fields the audit core
/// needs (`id`, `branch_id`, and for stock entries `date` and `created_at`)
/// are lifted out; everything else is kept verbatim in `fields` for
/// presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainRecord {
    entity_type: EntityType,
    id: i64,
    branch_id: i64,
    date: Option<Date>,
    created_at: Option<ServerTimestamp>,
    fields: Map<String, Value>,
}

impl DomainRecord {
    /// Creates a record with no optional attributes.
    #[must_use]
    pub fn new(entity_type: EntityType, id: i64, branch_id: i64) -> Self {
        Self {
            entity_type,
            id,
            branch_id,
            date: None,
            created_at: None,
            fields: Map::new(),
        }
    }

    /// Sets the business date.
    #[must_use]
    pub const fn with_date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: impl Into<ServerTimestamp>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Adds a presentation field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Reads a record from a collection payload element.
    ///
    /// # Arguments
    ///
    /// * `entity_type` - The entity type of the collection the value came from
    /// * `value` - One element of the collection's JSON array
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The value is not a JSON object
    /// - `id` or `branch_id` is missing or not an integer
    /// - `date` or `created_at` is present but unparseable
    pub fn from_json(entity_type: EntityType, value: Value) -> Result<Self, DomainError> {
        let fields: Map<String, Value> = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(DomainError::InvalidRecord {
                    entity_type: entity_type.to_string(),
                    reason: format!("expected a JSON object, got {}", json_kind(&other)),
                });
            }
        };

        let id: i64 = required_integer(&entity_type, &fields, "id")?;
        let branch_id: i64 = required_integer(&entity_type, &fields, "branch_id")?;

        let date: Option<Date> = optional_string(&entity_type, &fields, "date")?
            .map(|text| {
                parse_date(text).map_err(|err| DomainError::InvalidField {
                    entity_type: entity_type.to_string(),
                    field: "date",
                    message: err.to_string(),
                })
            })
            .transpose()?;

        let created_at: Option<ServerTimestamp> =
            optional_string(&entity_type, &fields, "created_at")?
                .map(|text| {
                    parse_server_timestamp(text).map_err(|err| DomainError::InvalidField {
                        entity_type: entity_type.to_string(),
                        field: "created_at",
                        message: err.to_string(),
                    })
                })
                .transpose()?;

        Ok(Self {
            entity_type,
            id,
            branch_id,
            date,
            created_at,
            fields,
        })
    }

    /// The entity type of this record.
    #[must_use]
    pub const fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// The record id within its entity type.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// The branch this record belongs to.
    #[must_use]
    pub const fn branch_id(&self) -> i64 {
        self.branch_id
    }

    /// The business date, if the collection carries one.
    #[must_use]
    pub const fn date(&self) -> Option<Date> {
        self.date
    }

    /// The server-side creation timestamp, if the collection carries one.
    #[must_use]
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_at.map(ServerTimestamp::instant)
    }

    /// The creation timestamp as written, with or without an offset.
    #[must_use]
    pub const fn server_created_at(&self) -> Option<ServerTimestamp> {
        self.created_at
    }

    /// Looks up a raw payload field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// All raw payload fields, including the ones lifted into attributes.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn required_integer(
    entity_type: &EntityType,
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<i64, DomainError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(DomainError::MissingField {
            entity_type: entity_type.to_string(),
            field,
        }),
        Some(value) => value.as_i64().ok_or_else(|| DomainError::InvalidField {
            entity_type: entity_type.to_string(),
            field,
            message: format!("expected an integer, got {}", json_kind(value)),
        }),
    }
}

fn optional_string<'a>(
    entity_type: &EntityType,
    fields: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, DomainError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(DomainError::InvalidField {
            entity_type: entity_type.to_string(),
            field,
            message: format!("expected a string, got {}", json_kind(other)),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
