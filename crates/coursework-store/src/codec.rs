//! Conversion between tagged structs and vector-store records
//!
//! A record type lists its fields once through [`Tagged::fields`]. Each field
//! has a role (identifier, vector or payload key) and a typed accessor. The
//! table is checked by [`Schema::of`] before anything is encoded or decoded,
//! so a validated schema converts without further type checks.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("field `{field}` has role {role} which requires {expected}")]
    TypeMismatch {
        field: &'static str,
        role: &'static str,
        expected: &'static str,
    },

    #[error("invalid record shape: {0}")]
    InvalidShape(String),
}

/// Generic vector-store entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: HashMap<String, String>,
}

/// Where a field lands in a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Id,
    Vector,
    Payload(&'static str),
}

impl Role {
    fn describe(&self) -> &'static str {
        match self {
            Role::Id => "identifier",
            Role::Vector => "vector",
            Role::Payload(_) => "payload",
        }
    }
}

enum Accessor<T> {
    Text {
        get: fn(&T) -> &str,
        set: fn(&mut T, String),
    },
    Floats {
        get: fn(&T) -> &[f32],
        set: fn(&mut T, Vec<f32>),
    },
}

/// One entry of a record type's descriptor table
pub struct Field<T> {
    name: &'static str,
    role: Role,
    accessor: Accessor<T>,
}

impl<T> Field<T> {
    /// A string-valued field
    pub fn text(
        name: &'static str,
        role: Role,
        get: fn(&T) -> &str,
        set: fn(&mut T, String),
    ) -> Self {
        Self {
            name,
            role,
            accessor: Accessor::Text { get, set },
        }
    }

    /// A float-sequence field
    pub fn floats(
        name: &'static str,
        role: Role,
        get: fn(&T) -> &[f32],
        set: fn(&mut T, Vec<f32>),
    ) -> Self {
        Self {
            name,
            role,
            accessor: Accessor::Floats { get, set },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Types that can be stored as a [`Record`]
pub trait Tagged: Default + Sized {
    /// Descriptor table in declaration order; untagged fields are left out
    fn fields() -> Vec<Field<Self>>;
}

/// A validated descriptor table
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T: Tagged> Schema<T> {
    pub fn of() -> Result<Self, CodecError> {
        Self::validate(T::fields())
    }

    fn validate(fields: Vec<Field<T>>) -> Result<Self, CodecError> {
        let mut ids = 0;
        let mut vectors = 0;
        let mut keys = HashSet::new();

        for field in &fields {
            let text = matches!(field.accessor, Accessor::Text { .. });
            let expected = match field.role {
                Role::Id => {
                    ids += 1;
                    "text"
                }
                Role::Vector => {
                    vectors += 1;
                    "a float sequence"
                }
                Role::Payload(key) => {
                    if !keys.insert(key) {
                        return Err(CodecError::InvalidShape(format!(
                            "payload key `{key}` is used twice"
                        )));
                    }
                    "text"
                }
            };
            if text != (expected == "text") {
                return Err(CodecError::TypeMismatch {
                    field: field.name,
                    role: field.role.describe(),
                    expected,
                });
            }
        }

        if ids != 1 || vectors != 1 {
            return Err(CodecError::InvalidShape(format!(
                "expected exactly one identifier and one vector field, found {ids} and {vectors}"
            )));
        }
        Ok(Self { fields })
    }

    pub fn encode(&self, value: &T) -> Record {
        let mut record = Record::default();
        for field in &self.fields {
            match (&field.accessor, field.role) {
                (Accessor::Text { get, .. }, Role::Id) => record.id = get(value).to_string(),
                (Accessor::Text { get, .. }, Role::Payload(key)) => {
                    record
                        .payload
                        .insert(key.to_string(), get(value).to_string());
                }
                (Accessor::Floats { get, .. }, _) => record.vector = get(value).to_vec(),
                (Accessor::Text { .. }, Role::Vector) => {}
            }
        }
        record
    }

    /// Payload keys missing from the record leave the field at its default
    pub fn decode(&self, record: &Record) -> T {
        let mut value = T::default();
        for field in &self.fields {
            match (&field.accessor, field.role) {
                (Accessor::Text { set, .. }, Role::Id) => set(&mut value, record.id.clone()),
                (Accessor::Text { set, .. }, Role::Payload(key)) => {
                    if let Some(text) = record.payload.get(key) {
                        set(&mut value, text.clone());
                    }
                }
                (Accessor::Floats { set, .. }, _) => set(&mut value, record.vector.clone()),
                (Accessor::Text { .. }, Role::Vector) => {}
            }
        }
        value
    }

    pub fn decode_many(&self, records: &[Record]) -> Vec<T> {
        let mut values = Vec::with_capacity(records.len());
        for record in records {
            values.push(self.decode(record));
        }
        values
    }
}

pub fn encode<T: Tagged>(value: &T) -> Result<Record, CodecError> {
    Ok(Schema::<T>::of()?.encode(value))
}

pub fn decode<T: Tagged>(record: &Record) -> Result<T, CodecError> {
    Ok(Schema::<T>::of()?.decode(record))
}

pub fn decode_many<T: Tagged>(records: &[Record]) -> Result<Vec<T>, CodecError> {
    Ok(Schema::<T>::of()?.decode_many(records))
}
