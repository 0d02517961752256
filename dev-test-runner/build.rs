use std::path::PathBuf;

const SCHEMAS: &[&str] = &["json_value", "tracked", "resource"];

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    for name in SCHEMAS {
        let input = PathBuf::from("schemas").join(format!("{name}.json"));
        println!("cargo:rerun-if-changed={}", input.display());
        let output = out_dir.join(format!("{name}.rs"));
        if let Err(error) = union_gen::generate_to_file(&input, &output) {
            panic!("failed to generate {}: {error}", input.display());
        }
    }
}
