//! Minimal CLI: schema → (rust | check)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::{Value, json};
use tracing::{debug, info};

use union_gen::{Options, ir, lower, schema};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate tagged-union containers from JSON schemas
#[derive(Parser, Debug)]
#[command(name = "union-gen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit Rust source for every union in the given schemas
    Generate(GenerateOut),
    /// validate schemas and print a JSON summary of the resolved unions
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more schema files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .rs file for a single input (stdout if omitted)
    #[arg(short, long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// write `<schema stem>.rs` per input into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// add a generation timestamp to the banner
    #[arg(long)]
    timestamp: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn resolve(&self) -> Result<Vec<PathBuf>> {
        let paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        debug!(count = paths.len(), "resolved inputs");
        Ok(paths)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                target.run()
            }
            Command::Check(target) => {
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                target.run()
            }
        }
    }
}

impl GenerateOut {
    fn run(&self) -> Result<()> {
        let paths = self.input_settings.resolve()?;
        if self.out.is_some() && paths.len() != 1 {
            bail!("--out takes exactly one input, got {}; use --out-dir instead", paths.len());
        }

        let options = Options { source_name: None, timestamp: self.timestamp };
        // independent files; collect keeps input order
        let generated = paths
            .par_iter()
            .map(|path| {
                union_gen::generate_file(path, options.clone())
                    .with_context(|| format!("failed to generate {}", path.display()))
            })
            .collect::<Vec<_>>();

        for (path, src) in paths.iter().zip(generated) {
            let src = src?;
            match (&self.out, &self.out_dir) {
                (Some(out), _) => write_reported(path, out, &src)?,
                (None, Some(dir)) => write_reported(path, &dir.join(output_file_name(path)), &src)?,
                (None, None) => println!("{src}"),
            }
        }
        Ok(())
    }
}

impl CheckOut {
    fn run(&self) -> Result<()> {
        let paths = self.input_settings.resolve()?;
        let mut files = Vec::with_capacity(paths.len());
        for path in &paths {
            let doc = schema::Document::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let doc = lower::lower_document(&doc)
                .with_context(|| format!("invalid schema {}", path.display()))?;
            files.push(json!({
                "file": path.display().to_string(),
                "modules": doc.modules,
                "unions": doc.unions.iter().map(summarize_union).collect::<Vec<_>>(),
            }));
        }

        let summary = serde_json::to_string_pretty(&Value::Array(files))?;
        match self.out.as_ref() {
            Some(out) => {
                union_gen::write_output(out, &summary)?;
                eprintln!("{} {}", "checked".green().bold(), out.display());
            }
            None => println!("{summary}"),
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn summarize_union(u: &ir::Union) -> Value {
    let mut slots = vec![json!({ "index": 0, "name": ir::EMPTY_VALUE, "type": null })];
    for (i, s) in u.slots.iter().enumerate() {
        let ty = match &s.payload {
            ir::Payload::Unit => Value::Null,
            ir::Payload::Typed { text, .. } => Value::from(text.clone()),
        };
        slots.push(json!({ "index": i + 1, "name": s.stem, "type": ty }));
    }
    json!({
        "name": u.type_name,
        "kind": u.kind_name,
        "cloneable": u.cloneable,
        "slots": slots,
    })
}

fn output_file_name(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "unions".into());
    PathBuf::from(format!("{stem}.rs"))
}

fn write_reported(input: &Path, out: &Path, src: &str) -> Result<()> {
    union_gen::write_output(out, src)?;
    info!(input = %input.display(), output = %out.display(), "wrote");
    eprintln!("{} {} → {}", "wrote".green().bold(), input.display(), out.display());
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_paths_pass_through() {
        let out = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(out, [PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(err.to_string().contains("matched no files"));
    }

    #[test]
    fn output_names_follow_schema_stem() {
        assert_eq!(output_file_name(Path::new("schemas/json_value.json")), PathBuf::from("json_value.rs"));
    }

    #[test]
    fn summary_lists_empty_slot_first() {
        let doc = schema::Document::from_json_str(r#"{ "unions": [{ "name": "shape", "variants": [
            { "name": "none" }, { "name": "circle", "type": "f64" }
        ]}] }"#).unwrap();
        let doc = lower::lower_document(&doc).unwrap();
        let summary = summarize_union(&doc.unions[0]);
        assert_eq!(summary["name"], "Shape");
        assert_eq!(summary["kind"], "ShapeKind");
        assert_eq!(summary["slots"][0]["name"], "empty_value");
        assert_eq!(summary["slots"][1]["type"], Value::Null);
        assert_eq!(summary["slots"][2], json!({ "index": 2, "name": "circle", "type": "f64" }));
    }

    fn write_schema(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(format!("{name}.json"));
        let src = format!(r#"{{ "unions": [{{ "name": "{name}", "variants": [{{ "name": "on" }}, {{ "name": "level", "type": "u8" }}] }}] }}"#);
        std::fs::write(&path, src).unwrap();
        path
    }

    fn generate_out(input: Vec<String>, out: Option<PathBuf>, out_dir: Option<PathBuf>) -> GenerateOut {
        GenerateOut {
            input_settings: InputSettings { input },
            out,
            out_dir,
            timestamp: false,
            no_op: false,
        }
    }

    fn enum_names(src: &str) -> Vec<String> {
        syn::parse_file(src).unwrap().items.iter().filter_map(|item| match item {
            syn::Item::Enum(e) => Some(e.ident.to_string()),
            _ => None,
        }).collect()
    }

    #[test]
    fn out_dir_writes_one_file_per_input() {
        let schemas = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        write_schema(schemas.path(), "first");
        write_schema(schemas.path(), "second");

        let pattern = schemas.path().join("*.json").display().to_string();
        generate_out(vec![pattern], None, Some(out_dir.path().to_path_buf())).run().unwrap();

        for (stem, expected) in [("first", ["FirstKind", "First"]), ("second", ["SecondKind", "Second"])] {
            let src = std::fs::read_to_string(out_dir.path().join(format!("{stem}.rs"))).unwrap();
            assert!(src.contains("DO NOT EDIT"), "{src}");
            assert_eq!(enum_names(&src), expected);
        }
    }

    #[test]
    fn out_writes_a_single_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_schema(dir.path(), "only");
        let out = dir.path().join("nested").join("only.rs");

        generate_out(vec![input.display().to_string()], Some(out.clone()), None).run().unwrap();

        let src = std::fs::read_to_string(&out).unwrap();
        assert!(src.starts_with("// Code generated by union-gen from only.json. DO NOT EDIT."));
        assert_eq!(enum_names(&src), ["OnlyKind", "Only"]);
    }

    #[test]
    fn out_rejects_several_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![
            write_schema(dir.path(), "a").display().to_string(),
            write_schema(dir.path(), "b").display().to_string(),
        ];
        let out = dir.path().join("both.rs");

        let err = generate_out(inputs, Some(out.clone()), None).run().unwrap_err();
        assert!(err.to_string().contains("exactly one input"), "{err}");
        assert!(!out.exists());
    }

    #[test]
    fn invalid_schema_fails_the_run_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_schema(dir.path(), "good");
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{ "unions": [{ "name": "bad", "variants": [] }] }"#).unwrap();
        let out_dir = dir.path().join("out");

        let inputs = vec![good.display().to_string(), bad.display().to_string()];
        let err = generate_out(inputs, None, Some(out_dir.clone())).run().unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"), "{err:#}");
        // inputs are written in order, so the file before the failure is already on disk
        assert!(out_dir.join("good.rs").exists());
        assert!(!out_dir.join("bad.rs").exists());
    }

    #[test]
    fn cli_parses_generate_flags() {
        let cli = CommandLineInterface::try_parse_from([
            "union-gen", "generate", "-i", "a.json", "b.json", "--out-dir", "gen", "--timestamp",
        ]).unwrap();
        match cli.cmd {
            Command::Generate(g) => {
                assert_eq!(g.input_settings.input, ["a.json", "b.json"]);
                assert_eq!(g.out_dir, Some(PathBuf::from("gen")));
                assert!(g.timestamp);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(CommandLineInterface::try_parse_from([
            "union-gen", "generate", "-i", "a.json", "-o", "x.rs", "--out-dir", "gen",
        ]).is_err());
    }
}
