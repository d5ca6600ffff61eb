//! 🔌 Sources: where raw rows come from before the pipeline gets its hands on them.
//!
//! 🚰 A source hands over one batch of [`RawRow`]s. It doesn't normalize, doesn't
//! filter, doesn't judge. Parsing the spreadsheet into rows is somebody else's
//! job; we accept JSON that already looks like rows and call it a day.
//!
//! 🎭 Same casting-agency setup as always: a trait, a couple of concrete
//! implementations, and an enum that dispatches so callers never care which one
//! they got. 🦆

use anyhow::Result;
use serde::Deserialize;

use crate::common::RawRow;

pub mod file_source;
pub mod in_mem_source;

pub use file_source::{FileSource, FileSourceConfig, RowFormat};
pub use in_mem_source::InMemorySource;

/// 🚰 Something that produces raw rows.
///
/// # Contract
/// - `load_rows` returns the whole batch, in source order.
/// - Entries that aren't row-shaped are skipped, not fatal. I/O problems are fatal.
pub trait RowSource: std::fmt::Debug {
    /// 📦 Fetch the batch.
    fn load_rows(&mut self) -> Result<Vec<RawRow>>;
}

/// 🔧 Which source to read rows from.
///
/// ```toml
/// [source.File]
/// file_name = "tickets.json"
/// format = "ndjson"
/// ```
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub enum SourceConfig {
    File(FileSourceConfig),
    /// The built-in demo batch. Handy when you just want to see the thing run.
    #[default]
    InMemory,
}

/// 🎭 The many faces of a row source.
#[derive(Debug)]
pub enum SourceBackend {
    InMemory(InMemorySource),
    File(FileSource),
}

impl SourceBackend {
    /// 🏗️ Build the backend a config asks for.
    pub fn from_config(config: &SourceConfig) -> Self {
        match config {
            SourceConfig::File(file_config) => SourceBackend::File(FileSource::new(file_config.clone())),
            SourceConfig::InMemory => SourceBackend::InMemory(InMemorySource::new()),
        }
    }
}

impl RowSource for SourceBackend {
    fn load_rows(&mut self) -> Result<Vec<RawRow>> {
        match self {
            SourceBackend::InMemory(source) => source.load_rows(),
            SourceBackend::File(source) => source.load_rows(),
        }
    }
}
