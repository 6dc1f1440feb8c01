//! File import and export.

pub mod export;
