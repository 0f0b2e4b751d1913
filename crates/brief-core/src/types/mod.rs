//! Core data types for entity briefs.

mod key;
mod kind;
mod mention;

pub use key::{CanonicalKey, IdentityToken};
pub use kind::EntityKind;
pub use mention::{DocId, DocumentEntities, DocumentMeta, Occurrence, RawEntityMention};
