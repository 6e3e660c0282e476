//! Bundle classification
//!
//! Partitions the output files into static entries and dynamic entries, keyed
//! by file stem so a JS entry and the CSS emitted next to it are correlated.

use rustc_hash::FxHashMap;
use std::path::Path;

/// Kind of an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Code chunk, carries entry classification
    Chunk,
    /// Plain asset
    Asset,
}

/// One file of the bundle output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub kind: OutputKind,
    pub is_entry: bool,
    pub is_dynamic_entry: bool,
    /// Name of the entry group the chunk belongs to
    pub logical_name: String,
}

impl OutputFile {
    /// Static entry chunk
    pub fn entry(file_name: impl Into<String>, logical_name: impl Into<String>) -> Self {
        Self::chunk(file_name, logical_name, true, false)
    }

    /// Chunk only reachable through a dynamic import
    pub fn dynamic_entry(file_name: impl Into<String>, logical_name: impl Into<String>) -> Self {
        Self::chunk(file_name, logical_name, false, true)
    }

    pub fn chunk(
        file_name: impl Into<String>,
        logical_name: impl Into<String>,
        is_entry: bool,
        is_dynamic_entry: bool,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            kind: OutputKind::Chunk,
            is_entry,
            is_dynamic_entry,
            logical_name: logical_name.into(),
        }
    }

    pub fn asset(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        Self {
            logical_name: file_stem(&file_name).to_string(),
            file_name,
            kind: OutputKind::Asset,
            is_entry: false,
            is_dynamic_entry: false,
        }
    }

    pub fn stem(&self) -> &str {
        file_stem(&self.file_name)
    }

    pub fn extension(&self) -> &str {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    }
}

/// File name without its directory and its last extension
///
/// Hash segments are kept: `app.a1b2.js` has the stem `app.a1b2`.
pub fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}

/// Stem to logical name mappings of the entry chunks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    pub entries: FxHashMap<String, String>,
    pub dynamic_entries: FxHashMap<String, String>,
}

impl NameIndex {
    pub fn entry(&self, stem: &str) -> Option<&str> {
        self.entries.get(stem).map(String::as_str)
    }

    pub fn dynamic_entry(&self, stem: &str) -> Option<&str> {
        self.dynamic_entries.get(stem).map(String::as_str)
    }
}

/// Build the [`NameIndex`] of a bundle
///
/// Assets never contribute. A chunk flagged as both entry and dynamic entry is
/// recorded as an entry only.
pub fn classify(outputs: &[OutputFile]) -> NameIndex {
    outputs
        .iter()
        .filter(|output| output.kind == OutputKind::Chunk)
        .fold(NameIndex::default(), |mut index, output| {
            let stem = output.stem().to_string();
            if output.is_entry {
                index.entries.insert(stem, output.logical_name.clone());
            } else if output.is_dynamic_entry {
                index
                    .dynamic_entries
                    .insert(stem, output.logical_name.clone());
            }
            index
        })
}
