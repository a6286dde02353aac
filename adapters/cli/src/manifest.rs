use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use wayfarer_core::{FloorTiles, LocationId, LocationSource};
use wayfarer_world::{Assets, Config};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const MANIFEST_FILE: &str = "manifest.toml";

/// Asset context and settings decoded from an asset directory.
#[derive(Debug)]
pub(crate) struct Bundle {
    /// Location sources and tilesets available to the engine.
    pub(crate) assets: Assets,
    /// Location the player starts in.
    pub(crate) start: LocationId,
    /// Tile ids the player can walk on.
    pub(crate) floor_tiles: FloorTiles,
    /// Seed declared by the manifest, if any.
    pub(crate) seed: Option<u64>,
    /// Maximum hit points declared by the manifest, if any.
    pub(crate) player_max_hp: Option<u32>,
}

impl Bundle {
    /// Builds the world configuration, preferring `seed_override` over the manifest seed.
    pub(crate) fn config(&self, seed_override: Option<u64>) -> Config {
        let mut config = Config::default().with_floor_tiles(self.floor_tiles.clone());
        if let Some(seed) = seed_override.or(self.seed) {
            config = config.with_rng_seed(seed);
        }
        if let Some(player_max_hp) = self.player_max_hp {
            config = config.with_player_max_hp(player_max_hp);
        }
        config
    }
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    start: String,
    #[serde(default)]
    floor_tiles: Option<Vec<i32>>,
    tilesets: Vec<String>,
    locations: BTreeMap<String, String>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    player_max_hp: Option<u32>,
}

/// Loads `manifest.toml` and every location document it lists from `directory`.
pub(crate) fn load(directory: impl AsRef<Path>) -> Result<Bundle> {
    let directory = directory.as_ref();
    let manifest_path = directory.join(MANIFEST_FILE);
    let contents = fs::read_to_string(&manifest_path).with_context(|| {
        format!(
            "failed to read asset manifest at {}",
            manifest_path.display()
        )
    })?;
    let entries = parse_manifest(&contents, directory)?;

    let mut assets = Assets::new();
    for tileset in entries.tilesets {
        assets.register_tileset(tileset);
    }
    for (location, path) in entries.locations {
        let document = fs::read_to_string(&path).with_context(|| {
            format!("failed to read location `{location}` at {}", path.display())
        })?;
        let source: LocationSource = serde_json::from_str(&document).with_context(|| {
            format!("failed to decode location `{location}` at {}", path.display())
        })?;
        tracing::debug!(%location, path = %path.display(), "location source decoded");
        let _ = assets.insert_location(location, source);
    }

    Ok(Bundle {
        assets,
        start: entries.start,
        floor_tiles: entries.floor_tiles,
        seed: entries.seed,
        player_max_hp: entries.player_max_hp,
    })
}

#[derive(Debug)]
struct Entries {
    start: LocationId,
    floor_tiles: FloorTiles,
    tilesets: Vec<String>,
    locations: Vec<(LocationId, PathBuf)>,
    seed: Option<u64>,
    player_max_hp: Option<u32>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Entries> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported asset manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    if manifest.tilesets.is_empty() {
        bail!("asset manifest declares no tilesets");
    }
    if !manifest.locations.contains_key(&manifest.start) {
        bail!(
            "asset manifest start location `{}` is not listed under [locations]",
            manifest.start
        );
    }

    let floor_tiles = manifest
        .floor_tiles
        .map_or_else(FloorTiles::default, FloorTiles::new);
    let locations = manifest
        .locations
        .into_iter()
        .map(|(location, relative_path)| {
            (LocationId::new(location), base_path.join(relative_path))
        })
        .collect();

    Ok(Entries {
        start: LocationId::new(manifest.start),
        floor_tiles,
        tilesets: manifest.tilesets,
        locations,
        seed: manifest.seed,
        player_max_hp: manifest.player_max_hp,
    })
}
