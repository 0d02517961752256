//! Generator for tagged-union containers.
//!
//! A schema names an ordered list of slots, each either a unit slot or one carrying a
//! payload type. For every union the generator emits a Rust enum whose first variant is
//! the empty state, a fieldless discriminant enum, and a uniform operation set
//! (construct-as, visit-if, try-get, get-with-default, set, take, assign, swap).
//!
//! Pipeline: `schema` (serde) → `lower` (validation) → `ir` → `codegen` (quote + prettyplease).
//!
//! Build scripts usually call [`generate_to_file`]:
//!
//! ```no_run
//! let out = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());
//! union_gen::generate_to_file("schemas/json_value.json".as_ref(), &out.join("json_value.rs")).unwrap();
//! ```
pub mod codegen;
pub mod error;
pub mod ident;
pub mod ir;
pub mod lower;
pub mod path_de;
pub mod schema;

use std::path::Path;

use tracing::info;

pub use codegen::{Codegen, Options};
pub use error::{GenerateError, SchemaError};

/// Schema text → formatted Rust source.
pub fn generate_from_str(src: &str, options: Options) -> Result<String, GenerateError> {
    let doc = schema::Document::from_json_str(src)?;
    generate_document(&doc, options)
}

pub fn generate_document(doc: &schema::Document, options: Options) -> Result<String, GenerateError> {
    let doc = lower::lower_document(doc)?;
    let mut cg = Codegen::with_options(options);
    cg.emit_document(&doc);
    cg.into_string()
}

/// Reads and generates one schema file. The banner names the file unless
/// `options.source_name` is already set.
pub fn generate_file(path: &Path, mut options: Options) -> Result<String, GenerateError> {
    let doc = schema::Document::load(path)?;
    if options.source_name.is_none() {
        options.source_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    }
    generate_document(&doc, options)
}

/// Build-script entry point: generate `input` into `output`, creating parent directories.
pub fn generate_to_file(input: &Path, output: &Path) -> Result<(), GenerateError> {
    let src = generate_file(input, Options::default())?;
    write_output(output, &src)?;
    info!(input = %input.display(), output = %output.display(), "generated");
    Ok(())
}

pub fn write_output(path: &Path, src: &str) -> Result<(), GenerateError> {
    let io = |source: std::io::Error| GenerateError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
    }
    std::fs::write(path, src).map_err(io)
}
