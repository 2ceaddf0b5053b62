//! Migration model
//!
//! A [`Migration`] is one parsed migration file. Its version is its identity
//! and the only key used for ordering.

use serde::Serialize;
use std::path::PathBuf;
use tm_sql::StatementKind;

/// A parsed migration file, e.g. `000042_add_singers.sql`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Migration {
    /// Version parsed from the filename prefix (always >= 1)
    pub version: u64,

    /// Optional name following the version
    pub name: Option<String>,

    /// Comment-free statements in file order
    pub statements: Vec<String>,

    /// Execution mode shared by every statement
    pub kind: StatementKind,

    /// File the migration was loaded from
    pub path: PathBuf,
}

impl Migration {
    /// Label used in progress output, see [`migration_label`]
    pub fn label(&self) -> String {
        migration_label(self.version, self.name.as_deref())
    }
}

/// `"<version>/up <name>"`, or `"<version>/up"` for unnamed migrations
pub fn migration_label(version: u64, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{version}/up {name}"),
        None => format!("{version}/up"),
    }
}

/// Migrations ordered by ascending version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Migrations(Vec<Migration>);

impl Migrations {
    /// Build a set from any order; the result is sorted by version.
    ///
    /// Duplicate versions must be rejected before this point.
    pub fn new(mut migrations: Vec<Migration>) -> Self {
        migrations.sort_by_key(|m| m.version);
        Self(migrations)
    }

    /// Iterate in ascending version order
    pub fn iter(&self) -> std::slice::Iter<'_, Migration> {
        self.0.iter()
    }

    /// Number of migrations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no migrations were found
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a migration by version
    pub fn get(&self, version: u64) -> Option<&Migration> {
        self.0
            .binary_search_by_key(&version, |m| m.version)
            .ok()
            .map(|idx| &self.0[idx])
    }

    /// Migrations with a version strictly greater than `version`
    pub fn pending_after(&self, version: u64) -> impl Iterator<Item = &Migration> {
        self.0.iter().filter(move |m| m.version > version)
    }

    /// Highest known version
    pub fn latest_version(&self) -> Option<u64> {
        self.0.last().map(|m| m.version)
    }

    /// Versions in ascending order
    pub fn versions(&self) -> Vec<u64> {
        self.0.iter().map(|m| m.version).collect()
    }
}

impl FromIterator<Migration> for Migrations {
    fn from_iter<I: IntoIterator<Item = Migration>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Migrations {
    type Item = &'a Migration;
    type IntoIter = std::slice::Iter<'a, Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Migrations {
    type Item = Migration;
    type IntoIter = std::vec::IntoIter<Migration>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
