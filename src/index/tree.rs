//! index::tree
//!
//! Sort-then-group construction of a directory view.

use tracing::debug;

use super::{DirectoryAggregate, DocumentRecord, IndexEntry, IndexMode, Leaf};
use crate::core::types::{check_canonical, IndexPrefix, TypeError};

/// Build the directory view of `records` under `prefix`.
///
/// Records outside `prefix` are dropped. In [`IndexMode::Tree`] the rest
/// are sorted by path and grouped by the segment following the prefix;
/// sorting is what makes every subdirectory's records adjacent, so the
/// grouping pass is a single scan. [`IndexMode::Flat`] returns the
/// matching records as leaves, in input order.
///
/// # Errors
///
/// Returns `TypeError::InvalidPath` if any record path is not canonical.
/// No entries are returned in that case.
pub fn index(
    records: &[DocumentRecord],
    prefix: &IndexPrefix,
    mode: IndexMode,
) -> Result<Vec<IndexEntry>, TypeError> {
    for record in records {
        if record.path.is_empty() {
            return Err(TypeError::InvalidPath {
                path: String::new(),
                reason: "path cannot be empty".into(),
            });
        }
        check_canonical(&record.path)?;
    }

    let matching: Vec<&DocumentRecord> = records
        .iter()
        .filter(|record| prefix.matches(&record.path))
        .collect();

    let entries = match mode {
        IndexMode::Flat => matching
            .into_iter()
            .map(|record| IndexEntry::Leaf(Leaf::from(record)))
            .collect(),
        IndexMode::Tree => group(matching, prefix),
    };

    debug!(
        prefix = %prefix,
        depth = prefix.depth(),
        records = records.len(),
        entries = entries.len(),
        ?mode,
        "built index"
    );
    Ok(entries)
}

/// Sort records by path and fold each run of a shared subdirectory.
fn group(mut records: Vec<&DocumentRecord>, prefix: &IndexPrefix) -> Vec<IndexEntry> {
    records.sort_by(|a, b| {
        (a.path.as_str(), a.created_at, a.modified_at, a.size).cmp(&(
            b.path.as_str(),
            b.created_at,
            b.modified_at,
            b.size,
        ))
    });

    let mut entries = Vec::new();
    let mut open: Option<(&str, DirectoryAggregate)> = None;

    for record in records {
        let rest = &record.path[prefix.as_str().len()..];

        match rest.split_once('/') {
            None => {
                if let Some((_, dir)) = open.take() {
                    entries.push(IndexEntry::Directory(dir));
                }
                entries.push(IndexEntry::Leaf(Leaf::from(record)));
            }
            Some((segment, _)) => match open.as_mut() {
                Some((current, dir)) if *current == segment => dir.absorb(record),
                _ => {
                    if let Some((_, dir)) = open.take() {
                        entries.push(IndexEntry::Directory(dir));
                    }
                    let path = format!("{prefix}{segment}/");
                    open = Some((segment, DirectoryAggregate::start(path, record)));
                }
            },
        }
    }

    if let Some((_, dir)) = open {
        entries.push(IndexEntry::Directory(dir));
    }
    entries
}
