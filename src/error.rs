//! Error taxonomy of the generator.
//!
//! Generated containers have no errors of their own; everything here is about
//! turning a schema into source text.
use std::path::PathBuf;

/// A schema that cannot be turned into a container.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("at JSON path {path} → {message}")]
    Parse { path: String, message: String },

    #[error("{what} `{name}` is not a valid identifier")]
    InvalidIdentifier { what: &'static str, name: String },

    #[error("{what} `{name}` is a reserved Rust keyword")]
    Keyword { what: &'static str, name: String },

    #[error("union `{union}`: variant name `{name}` is reserved for the empty state")]
    ReservedName { union: String, name: String },

    #[error("union `{union}` declares no variants")]
    EmptyUnion { union: String },

    #[error("union `{union}`: variant `{name}` is declared more than once")]
    DuplicateVariant { union: String, name: String },

    #[error("type `{name}` would be generated more than once")]
    DuplicateType { name: String },

    #[error("union `{union}`: generated method `{method}` collides with another method")]
    MethodCollision { union: String, method: String },

    #[error("union `{union}`: variant `{variant}` has an invalid payload type `{ty}`: {message}")]
    InvalidPayloadType {
        union: String,
        variant: String,
        ty: String,
        message: String,
    },

    #[error("union `{union}`: invalid derive `{derive}`")]
    InvalidDerive { union: String, derive: String },

    #[error("union `{union}`: member #{index} is not a valid impl item: {message}")]
    InvalidMember {
        union: String,
        index: usize,
        message: String,
    },
}

/// Anything that can go wrong between reading a schema and holding source text.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generated tokens did not parse back as a Rust file. Always a bug in codegen.
    #[error("generated code is not valid Rust: {0}")]
    Syntax(#[from] syn::Error),
}
