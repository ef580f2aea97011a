pub mod alias;
pub mod builtins;
pub mod constant;
pub mod context;
pub mod ctype;
pub mod diag;
pub mod document;
pub mod enumeration;
pub mod error;
pub mod gname;
pub mod method;
pub mod named_type;
pub mod record;
pub mod registry;
pub mod thing;
pub mod typeref;

pub use alias::Alias;
pub use constant::Constant;
pub use context::ParseContext;
pub use ctype::CType;
pub use diag::{Diagnostic, Diagnostics};
pub use document::Namespace;
pub use enumeration::{Enumeration, Member};
pub use error::GirError;
pub use gname::GName;
pub use method::{Argument, Direction, Method, MethodRole, Ownership};
pub use named_type::{NamedType, TypeCategory};
pub use record::{Field, Property, Record, RecordKind};
pub use registry::{Registration, Registry, RegistrySnapshot};
pub use thing::Thing;
pub use typeref::{cast, decode_indirection, TypeReference};

/// Reads one GIR document into the entity model, populating `registry` with
/// everything the document declares.
///
/// Dependency documents are read the same way first (the preload phase); the
/// registry is frozen only after the last document, and emission starts only
/// after that barrier.
pub fn read_gir(
    text: &str,
    registry: &mut Registry,
    diags: &Diagnostics,
) -> Result<Namespace, GirError> {
    let document = roxmltree::Document::parse(text)?;
    document::read_document(&document, registry, diags)
}
