//! Declarative input: which unions exist, their slots, and how the emitted file is wrapped.
//!
//! This is the raw, user-facing shape. Nothing here is validated beyond what serde checks;
//! see `lower` for the rules.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenerateError, SchemaError};

/// Payload type string that marks a slot as carrying no value.
pub const UNIT: &str = "unit";

fn default_derives() -> Vec<String> {
    vec!["Debug".to_string(), "Clone".to_string()]
}

fn default_true() -> bool {
    true
}

/// One schema file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// License or banner lines, emitted as `//` comments.
    #[serde(default)]
    pub header: Vec<String>,
    /// Nested `pub mod` wrapping, outermost first.
    #[serde(default)]
    pub modules: Vec<String>,
    pub unions: Vec<UnionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnionSpec {
    pub name: String,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default = "default_derives")]
    pub derives: Vec<String>,
    /// Emit `From<Payload>` for payload types that are unique within the union.
    #[serde(default = "default_true")]
    pub from_impls: bool,
    pub variants: Vec<VariantSpec>,
    /// Extra items spliced verbatim into the container's inherent `impl` block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantSpec {
    pub name: String,
    /// Rust type of the payload; absent or `"unit"` for a unit slot.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl VariantSpec {
    /// The payload type, or `None` for unit slots.
    pub fn payload(&self) -> Option<&str> {
        match self.ty.as_deref().map(str::trim) {
            None | Some(UNIT) | Some("") => None,
            Some(ty) => Some(ty),
        }
    }
}

impl Document {
    pub fn from_json_str(src: &str) -> Result<Self, SchemaError> {
        crate::path_de::from_str_with_path(src)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        crate::path_de::from_slice_with_path(bytes)
    }

    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        let bytes = std::fs::read(path).map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json_slice(&bytes)?)
    }
}
