//! Shared utility code throughout the varbits project.

#![deny(rust_2018_idioms, rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod align;
pub mod bits;
pub mod hints;
