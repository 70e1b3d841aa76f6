// src/discover/filter.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Decides which files count as bundler entry points.
///
/// Paths are matched relative to the project directory with forward slashes,
/// e.g. `"operations/users/get.ts"`.
#[derive(Clone)]
pub struct EntryFilter {
    include: GlobSet,
    ignore: Option<GlobSet>,
}

impl fmt::Debug for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryFilter")
            .field("include", &self.include.len())
            .field("ignore", &self.ignore.as_ref().map(GlobSet::len))
            .finish()
    }
}

impl EntryFilter {
    /// `extensions` are bare (`"ts"`), `ignore` entries are project-relative
    /// paths; an ignored directory hides everything below it.
    pub fn new(extensions: &[String], ignore: &[String]) -> Result<Self> {
        let mut include = GlobSetBuilder::new();
        for ext in extensions.iter().map(|e| e.trim().trim_start_matches('.')) {
            if ext.is_empty() {
                continue;
            }
            let pattern = format!("**/*.{ext}");
            include.add(
                Glob::new(&pattern)
                    .with_context(|| format!("invalid extension pattern '{pattern}'"))?,
            );
        }
        let include = include.build().context("building extension glob set")?;

        let ignore = ignore_set(ignore)?;

        Ok(Self { include, ignore })
    }

    /// A filter that accepts every path not covered by `ignore`.
    pub fn ignore_only(ignore: &[String]) -> Result<Self> {
        let include = GlobSetBuilder::new()
            .add(Glob::new("**").context("building match-all glob")?)
            .build()
            .context("building match-all glob set")?;
        Ok(Self {
            include,
            ignore: ignore_set(ignore)?,
        })
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        self.include.is_match(rel_path) && !self.is_ignored(rel_path)
    }

    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.ignore
            .as_ref()
            .is_some_and(|set| set.is_match(rel_path))
    }
}

fn ignore_set(ignore: &[String]) -> Result<Option<GlobSet>> {
    let entries: Vec<&str> = ignore
        .iter()
        .map(|p| p.trim().trim_end_matches('/'))
        .filter(|p| !p.is_empty())
        .collect();
    if entries.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for entry in entries {
        for pattern in [entry.to_string(), format!("{entry}/**")] {
            builder.add(
                Glob::new(&pattern)
                    .with_context(|| format!("invalid ignore pattern '{pattern}'"))?,
            );
        }
    }
    Ok(Some(builder.build().context("building ignore glob set")?))
}
