//! Normalized document types shared by the corpus and search layers.

pub mod types;
