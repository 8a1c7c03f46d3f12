//! Character and class tables
//!
//! A [`Dataset`] holds everything the calculators look up by name: personal
//! growth rates, class growth/base/cap lines and optional recruitment stats.
//! Tables are read from CSV sheets (see [`sheet`]) or built in code.

pub mod sheet;

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::consts::UNCAPPED;
use crate::stats::StatLine;

pub use sheet::TableSources;

/// Which sheet a row or error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TableKind {
    Characters,
    Classes,
    ClassBases,
    ClassCaps,
    CharacterBases,
}

impl TableKind {
    /// File name inside a data directory
    pub const fn file_name(&self) -> &'static str {
        match self {
            TableKind::Characters => "characters.csv",
            TableKind::Classes => "classes.csv",
            TableKind::ClassBases => "class_bases.csv",
            TableKind::ClassCaps => "class_caps.csv",
            TableKind::CharacterBases => "character_bases.csv",
        }
    }
}

/// Errors raised while loading or querying tables
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {table}: {source}")]
    Csv {
        table: TableKind,
        #[source]
        source: csv::Error,
    },

    #[error("{table}: missing column '{column}'")]
    MissingColumn { table: TableKind, column: String },

    #[error("{table} line {line}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        table: TableKind,
        line: u64,
        column: String,
        value: String,
    },

    #[error("{table}: duplicate entry '{name}'")]
    Duplicate { table: TableKind, name: String },

    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// A playable unit and its personal growth rates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub name: String,
    pub category: String,
    pub growth: StatLine,
}

/// A class: growth bonus, base offsets applied on class change, and caps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub growth: StatLine,
    pub base: StatLine,
    pub cap: StatLine,
}

impl ClassEntry {
    /// A class with only growth rates known (zero base, no caps)
    pub fn with_growth(name: impl Into<String>, growth: StatLine) -> Self {
        Self {
            name: name.into(),
            growth,
            base: StatLine::zero(),
            cap: StatLine::splat(UNCAPPED),
        }
    }
}

/// Stats a unit joins with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterBaseEntry {
    pub name: String,
    pub class: String,
    pub level: u32,
    pub stats: StatLine,
}

/// All lookup tables, keyed by name, in sheet order
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    characters: Vec<CharacterEntry>,
    classes: Vec<ClassEntry>,
    starts: Vec<CharacterBaseEntry>,
    character_index: HashMap<String, usize>,
    class_index: HashMap<String, usize>,
    start_index: HashMap<String, usize>,
    categories: Vec<(String, Vec<String>)>,
}

impl Dataset {
    /// Empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a dataset from in-memory CSV sheets
    pub fn from_sources(sources: &TableSources<'_>) -> Result<Self, DataError> {
        sheet::build_dataset(sources)
    }

    /// Load a dataset from a directory of CSV sheets.
    ///
    /// `characters.csv` and `classes.csv` are required; `class_bases.csv`,
    /// `class_caps.csv` and `character_bases.csv` are read when present.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        let read = |kind: TableKind| -> Result<String, DataError> {
            let path = dir.join(kind.file_name());
            std::fs::read_to_string(&path).map_err(|source| DataError::Io {
                path: path.display().to_string(),
                source,
            })
        };
        let read_optional = |kind: TableKind| -> Result<Option<String>, DataError> {
            if dir.join(kind.file_name()).exists() {
                read(kind).map(Some)
            } else {
                Ok(None)
            }
        };

        let characters = read(TableKind::Characters)?;
        let classes = read(TableKind::Classes)?;
        let class_bases = read_optional(TableKind::ClassBases)?;
        let class_caps = read_optional(TableKind::ClassCaps)?;
        let character_bases = read_optional(TableKind::CharacterBases)?;

        let dataset = Self::from_sources(&TableSources {
            characters: &characters,
            classes: &classes,
            class_bases: class_bases.as_deref(),
            class_caps: class_caps.as_deref(),
            character_bases: character_bases.as_deref(),
        })?;
        tracing::info!(
            dir = %dir.display(),
            characters = dataset.characters.len(),
            classes = dataset.classes.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Add a character; names must be unique
    pub fn add_character(&mut self, entry: CharacterEntry) -> Result<(), DataError> {
        if self.character_index.contains_key(&entry.name) {
            return Err(DataError::Duplicate {
                table: TableKind::Characters,
                name: entry.name,
            });
        }

        match self
            .categories
            .iter_mut()
            .find(|(category, _)| *category == entry.category)
        {
            Some((_, names)) => names.push(entry.name.clone()),
            None => self
                .categories
                .push((entry.category.clone(), vec![entry.name.clone()])),
        }

        self.character_index
            .insert(entry.name.clone(), self.characters.len());
        self.characters.push(entry);
        Ok(())
    }

    /// Add a class; names must be unique
    pub fn add_class(&mut self, entry: ClassEntry) -> Result<(), DataError> {
        if self.class_index.contains_key(&entry.name) {
            return Err(DataError::Duplicate {
                table: TableKind::Classes,
                name: entry.name,
            });
        }
        self.class_index.insert(entry.name.clone(), self.classes.len());
        self.classes.push(entry);
        Ok(())
    }

    /// Add recruitment stats for a known character in a known class
    pub fn add_start(&mut self, entry: CharacterBaseEntry) -> Result<(), DataError> {
        self.character(&entry.name)?;
        self.class(&entry.class)?;
        if self.start_index.contains_key(&entry.name) {
            return Err(DataError::Duplicate {
                table: TableKind::CharacterBases,
                name: entry.name,
            });
        }
        self.start_index.insert(entry.name.clone(), self.starts.len());
        self.starts.push(entry);
        Ok(())
    }

    pub(crate) fn class_mut(&mut self, name: &str) -> Option<&mut ClassEntry> {
        let idx = *self.class_index.get(name)?;
        self.classes.get_mut(idx)
    }

    pub fn character(&self, name: &str) -> Result<&CharacterEntry, DataError> {
        self.character_index
            .get(name)
            .map(|&idx| &self.characters[idx])
            .ok_or_else(|| DataError::UnknownCharacter(name.to_string()))
    }

    pub fn class(&self, name: &str) -> Result<&ClassEntry, DataError> {
        self.class_index
            .get(name)
            .map(|&idx| &self.classes[idx])
            .ok_or_else(|| DataError::UnknownClass(name.to_string()))
    }

    /// Recruitment stats, if the sheet had a row for this character
    pub fn base_stats(&self, name: &str) -> Option<&CharacterBaseEntry> {
        self.start_index.get(name).map(|&idx| &self.starts[idx])
    }

    pub fn characters(&self) -> &[CharacterEntry] {
        &self.characters
    }

    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }

    /// Category names in order of first appearance
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(category, _)| category.as_str())
    }

    /// Character names of one category, in sheet order
    pub fn characters_in(&self, category: &str) -> Result<&[String], DataError> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, names)| names.as_slice())
            .ok_or_else(|| DataError::UnknownCategory(category.to_string()))
    }

    pub fn character_names(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(|c| c.name.as_str())
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.name.as_str())
    }
}
