//! CSV sheet loading
//!
//! Sheets have a header row. Columns are matched by label, so order does not
//! matter and both the Japanese labels of the game's fan sheets (`キャラ名`,
//! `カテゴリ`, `クラス名`, `力`, `魔力`, ...) and English ones (`name`,
//! `category`, `class`, `Str`, `Mag`, ...) are accepted. Every stat column
//! must be present.

use csv::{ReaderBuilder, StringRecord, Trim};
use hashbrown::HashSet;

use super::{CharacterBaseEntry, CharacterEntry, ClassEntry, DataError, Dataset, TableKind};
use crate::consts::NUM_STATS;
use crate::stats::{Stat, StatLine};

const CHARACTER_NAME: &[&str] = &["キャラ名", "name", "character"];
const CATEGORY: &[&str] = &["カテゴリ", "category"];
const CLASS_NAME: &[&str] = &["クラス名", "class", "name"];
const CLASS_COLUMN: &[&str] = &["クラス名", "class"];
const LEVEL: &[&str] = &["レベル", "level", "lv"];

/// Raw sheet text for each table; the optional ones may be absent
#[derive(Debug, Clone, Copy)]
pub struct TableSources<'a> {
    pub characters: &'a str,
    pub classes: &'a str,
    pub class_bases: Option<&'a str>,
    pub class_caps: Option<&'a str>,
    pub character_bases: Option<&'a str>,
}

/// One parsed data row
#[derive(Debug, Clone)]
struct Row {
    name: String,
    category: Option<String>,
    class: Option<String>,
    level: Option<u32>,
    stats: StatLine,
}

/// Column positions resolved from a header row
struct Layout {
    name: usize,
    category: Option<usize>,
    class: Option<usize>,
    level: Option<usize>,
    stats: [usize; NUM_STATS],
}

impl Layout {
    fn resolve(kind: TableKind, headers: &StringRecord) -> Result<Self, DataError> {
        let missing = |column: &str| DataError::MissingColumn {
            table: kind,
            column: column.to_string(),
        };

        let name_labels = match kind {
            TableKind::Characters | TableKind::CharacterBases => CHARACTER_NAME,
            _ => CLASS_NAME,
        };
        let name = find_column(headers, name_labels).ok_or_else(|| missing(name_labels[0]))?;

        let category = match kind {
            TableKind::Characters => {
                Some(find_column(headers, CATEGORY).ok_or_else(|| missing(CATEGORY[0]))?)
            }
            _ => None,
        };
        let (class, level) = match kind {
            TableKind::CharacterBases => (
                Some(find_column(headers, CLASS_COLUMN).ok_or_else(|| missing(CLASS_COLUMN[0]))?),
                find_column(headers, LEVEL),
            ),
            _ => (None, None),
        };

        let mut stats = [0; NUM_STATS];
        for stat in Stat::ALL {
            stats[stat.index()] = headers
                .iter()
                .position(|header| Stat::parse(header) == Some(stat))
                .ok_or_else(|| missing(stat.short_name()))?;
        }

        Ok(Self {
            name,
            category,
            class,
            level,
            stats,
        })
    }
}

fn find_column(headers: &StringRecord, labels: &[&str]) -> Option<usize> {
    labels.iter().find_map(|label| {
        headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(label))
    })
}

/// Parse one sheet into rows
fn read_table(kind: TableKind, text: &str) -> Result<Vec<Row>, DataError> {
    // Spreadsheet exports often start with a byte-order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|source| DataError::Csv { table: kind, source })?
        .clone();
    let layout = Layout::resolve(kind, &headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| DataError::Csv { table: kind, source })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |pos| pos.line());
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let invalid = |idx: usize, value: &str| DataError::InvalidValue {
            table: kind,
            line,
            column: headers.get(idx).unwrap_or("?").to_string(),
            value: value.to_string(),
        };

        let name = cell(layout.name);
        if name.is_empty() {
            return Err(invalid(layout.name, name));
        }

        let mut stats = StatLine::zero();
        for stat in Stat::ALL {
            let idx = layout.stats[stat.index()];
            let value = cell(idx);
            let parsed = value.parse::<i32>().map_err(|_| invalid(idx, value))?;
            stats.set(stat, parsed);
        }

        let level = match layout.level {
            Some(idx) => {
                let value = cell(idx);
                Some(value.parse::<u32>().map_err(|_| invalid(idx, value))?)
            }
            None => None,
        };

        rows.push(Row {
            name: name.to_string(),
            category: layout.category.map(|idx| cell(idx).to_string()),
            class: layout.class.map(|idx| cell(idx).to_string()),
            level,
            stats,
        });
    }

    tracing::debug!(table = %kind, rows = rows.len(), "parsed sheet");
    Ok(rows)
}

/// Fill one per-class line (base or caps) from a sheet
fn apply_class_lines(
    dataset: &mut Dataset,
    kind: TableKind,
    text: &str,
    apply: impl Fn(&mut ClassEntry, StatLine),
) -> Result<(), DataError> {
    let mut seen = HashSet::new();
    for row in read_table(kind, text)? {
        if !seen.insert(row.name.clone()) {
            return Err(DataError::Duplicate {
                table: kind,
                name: row.name,
            });
        }
        match dataset.class_mut(&row.name) {
            Some(class) => apply(class, row.stats),
            None => {
                tracing::warn!(table = %kind, class = %row.name, "row for unknown class ignored")
            }
        }
    }
    Ok(())
}

pub(super) fn build_dataset(sources: &TableSources<'_>) -> Result<Dataset, DataError> {
    let mut dataset = Dataset::new();

    for row in read_table(TableKind::Characters, sources.characters)? {
        dataset.add_character(CharacterEntry {
            name: row.name,
            category: row.category.unwrap_or_default(),
            growth: row.stats,
        })?;
    }

    for row in read_table(TableKind::Classes, sources.classes)? {
        dataset.add_class(ClassEntry::with_growth(row.name, row.stats))?;
    }

    if let Some(text) = sources.class_bases {
        apply_class_lines(&mut dataset, TableKind::ClassBases, text, |class, line| {
            class.base = line;
        })?;
    }
    if let Some(text) = sources.class_caps {
        apply_class_lines(&mut dataset, TableKind::ClassCaps, text, |class, line| {
            class.cap = line;
        })?;
    }

    if let Some(text) = sources.character_bases {
        for row in read_table(TableKind::CharacterBases, text)? {
            let entry = CharacterBaseEntry {
                name: row.name,
                class: row.class.unwrap_or_default(),
                level: row.level.unwrap_or(1),
                stats: row.stats,
            };
            match dataset.add_start(entry) {
                Ok(()) => {}
                Err(err @ (DataError::UnknownCharacter(_) | DataError::UnknownClass(_))) => {
                    tracing::warn!(table = %TableKind::CharacterBases, "row ignored: {err}");
                }
                Err(err) => return Err(err),
            }
        }
    }

    Ok(dataset)
}
