//! Dig-site description loader.
//!
//! Reads a TOML file with a `[site]` table and `[[treasure]]` entries, or the built-in
//! description when no path is given.

use anyhow::{Context, Result};
use digsite_core::{Score, SiteConfig, TreasurePool, TreasureShape};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_SITE: &str = include_str!("../default_site.toml");

#[derive(Clone, Debug)]
pub struct LoadedSite {
    pub config: SiteConfig,
    pub pool: TreasurePool,
}

#[derive(Deserialize, Debug)]
struct SiteFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default, rename = "treasure")]
    treasures: Vec<TreasureEntry>,
}

#[derive(Deserialize, Debug)]
struct TreasureEntry {
    name: String,
    score: Score,
    rows: Vec<String>,
}

pub fn load(path: Option<&Path>) -> Result<LoadedSite> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            parse(&text).with_context(|| format!("Invalid site file {}", path.display()))
        }
        None => parse(DEFAULT_SITE).context("Invalid built-in site"),
    }
}

pub fn parse(text: &str) -> Result<LoadedSite> {
    let file: SiteFile = toml::from_str(text)?;
    file.site.validate()?;

    let pool = file
        .treasures
        .into_iter()
        .map(|entry| {
            TreasureShape::from_rows(entry.name.as_str(), &entry.rows, entry.score)
                .with_context(|| format!("Treasure {:?}", entry.name))
        })
        .collect::<Result<Vec<_>>>()?;
    log::debug!("Loaded {} treasure shapes", pool.len());

    Ok(LoadedSite {
        config: file.site,
        pool: TreasurePool::new(pool),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_site_parses() {
        let site = load(None).unwrap();

        assert_eq!(site.config.size, (13, 10));
        assert_eq!(site.config.score_budget, 20);
        assert_eq!(site.pool.len(), 5);
        assert_eq!(site.pool.shapes()[4].name(), "fossil");
        assert_eq!(site.pool.shapes()[4].solid_count(), 5);
    }

    #[test]
    fn missing_site_table_uses_defaults() {
        let site = parse(
            r##"
            [[treasure]]
            name = "pebble"
            score = 1
            rows = ["#"]
            "##,
        )
        .unwrap();

        assert_eq!(site.config, SiteConfig::default());
        assert_eq!(site.pool.len(), 1);
    }

    #[test]
    fn bad_treasure_rows_are_rejected() {
        let err = parse(
            r###"
            [[treasure]]
            name = "broken"
            score = 2
            rows = ["##", "#"]
            "###,
        )
        .unwrap_err();

        assert!(format!("{err:#}").contains("broken"));
    }

    #[test]
    fn invalid_grid_is_rejected() {
        assert!(parse("[site]\nsize = [0, 4]\n").is_err());
    }
}
