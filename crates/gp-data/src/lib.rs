//! gp-data: Default tables shipped with the growth planner
//!
//! The sheets under `data/` are compiled into the binary so the planner works
//! without any files on disk. They use the Japanese column labels of the fan
//! sheets the planner was first written against.

use gp_core::data::{DataError, Dataset, TableKind, TableSources};

pub const CHARACTERS: &str = include_str!("../data/characters.csv");
pub const CLASSES: &str = include_str!("../data/classes.csv");
pub const CLASS_BASES: &str = include_str!("../data/class_bases.csv");
pub const CLASS_CAPS: &str = include_str!("../data/class_caps.csv");
pub const CHARACTER_BASES: &str = include_str!("../data/character_bases.csv");

/// Sheet text for every table
pub fn bundled_sources() -> TableSources<'static> {
    TableSources {
        characters: CHARACTERS,
        classes: CLASSES,
        class_bases: Some(CLASS_BASES),
        class_caps: Some(CLASS_CAPS),
        character_bases: Some(CHARACTER_BASES),
    }
}

/// Parse the bundled tables
pub fn bundled_dataset() -> Result<Dataset, DataError> {
    let dataset = Dataset::from_sources(&bundled_sources())?;
    tracing::debug!(
        characters = dataset.characters().len(),
        classes = dataset.classes().len(),
        "loaded bundled dataset"
    );
    Ok(dataset)
}

/// Raw text of one bundled sheet
pub const fn sheet(kind: TableKind) -> &'static str {
    match kind {
        TableKind::Characters => CHARACTERS,
        TableKind::Classes => CLASSES,
        TableKind::ClassBases => CLASS_BASES,
        TableKind::ClassCaps => CLASS_CAPS,
        TableKind::CharacterBases => CHARACTER_BASES,
    }
}
