//! Species catalog: TOML loading, validation, and common-name lookup.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::profile::PlantProfile;

/// Catalog compiled into the crate.
const BUILTIN_PROFILES: &str = include_str!("profiles.toml");

// ---------------------------------------------------------------------------
// Catalog file structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    plants: Vec<PlantProfile>,
}

/// Read-only table of plant profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: Vec<PlantProfile>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ProfileCatalog {
    /// Build a catalog from already-constructed profiles, validating them.
    pub fn new(profiles: Vec<PlantProfile>) -> Result<Self> {
        let catalog = Self { profiles };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a TOML document of `[[plants]]` tables.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents).context("failed to parse catalog")?;
        Self::new(file.plants)
    }

    /// Read, parse, and validate a TOML catalog file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog: {path}"))?;
        let catalog = Self::from_toml_str(&contents)
            .with_context(|| format!("invalid catalog: {path}"))?;
        info!(path, profiles = catalog.len(), "profile catalog loaded");
        Ok(catalog)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_PROFILES).context("built-in catalog is invalid")
    }

    /// Validate every profile plus catalog-wide uniqueness of common names.
    /// All violations are reported together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (i, p) in self.profiles.iter().enumerate() {
            p.collect_errors(&mut errors);

            let key = normalize(&p.common_name);
            if !key.is_empty() && !seen.insert(key) {
                errors.push(format!(
                    "plants[{i}]: duplicate common_name '{}'",
                    p.common_name
                ));
            }

            if p.sensor_threshold > p.field_capacity {
                warn!(
                    plant = %p.common_name,
                    sensor_threshold = p.sensor_threshold,
                    field_capacity = p.field_capacity,
                    "sensor threshold above field capacity: pump can run on saturated soil"
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "catalog validation failed ({} error{}):\n  - {}",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" },
                errors.join("\n  - ")
            );
        }
    }

    /// Exact common-name lookup, case-insensitive after trimming.
    pub fn find_by_common_name(&self, name: &str) -> Option<&PlantProfile> {
        let wanted = normalize(name);
        self.profiles
            .iter()
            .find(|p| normalize(&p.common_name) == wanted)
    }

    /// Substring search over common names for autocomplete.  An empty query
    /// returns every profile.  Results keep catalog order.
    pub fn search(&self, query: &str) -> Vec<&PlantProfile> {
        let needle = normalize(query);
        self.profiles
            .iter()
            .filter(|p| needle.is_empty() || p.common_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Common names sorted case-insensitively, for species pickers.
    pub fn species_list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.iter().map(|p| p.common_name.as_str()).collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
