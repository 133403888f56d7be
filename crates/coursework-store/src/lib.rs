//! Record codec plus vector and document store adapters

pub mod codec;
mod document;
mod error;
mod vector;

pub use codec::{CodecError, Field, Record, Role, Schema, Tagged};
pub use document::{DocumentStore, Filter};
pub use error::StoreError;
pub use vector::{SearchOptions, VectorStore, VECTOR_SIZE};
