//! Data models

pub mod download;

pub use download::*;
