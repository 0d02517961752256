//! Containers generated at build time from `schemas/`, and the code that exercises them.
pub mod json;
pub mod probe;

pub mod tracked {
    include!(concat!(env!("OUT_DIR"), "/tracked.rs"));
}

pub mod resource {
    include!(concat!(env!("OUT_DIR"), "/resource.rs"));
}
