//! Rule-based extraction of structured lab records from pasted text and tables.
//!
//! Two independent pipelines live here:
//!
//! - [`protocol::parse`] turns a free-text protocol into [`model::ProtocolFormData`]:
//!   day/stage buckets, discrete steps, materials, safety notes and tags.
//! - [`materials::parse`] turns a 2-D cell matrix (a storage-box grid or a named-column
//!   table) into [`model::ParseResult`] placement records.
//!
//! Both are pure functions of their input. Nothing is cached between calls.

pub mod error;
pub mod materials;
pub mod model;
pub mod protocol;

pub use error::InputError;
