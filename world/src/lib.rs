#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Wayfarer.

mod assets;
pub mod items;
pub mod map;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wayfarer_core::{
    Command, Event, FloorTiles, LocationId, PixelPosition, TargetClass, TransitionPhase,
    UseContext, Vitals,
};

pub use assets::Assets;
pub use items::Inventory;
pub use map::{MapError, RuntimeMap};

const DEFAULT_RNG_SEED: u64 = 0x5741_5946_4152_4552;
const DEFAULT_PLAYER_MAX_HP: u32 = 50;

/// Errors surfaced while applying commands to the world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The location source could not be turned into a map; the live map is untouched.
    #[error("location `{location}` could not be built: {source}")]
    InvalidSource {
        /// Location that failed to build.
        location: LocationId,
        /// Reason the build failed.
        source: MapError,
    },
    /// The command requires a live map but no location has been loaded yet.
    #[error("no location has been loaded")]
    NoLocationLoaded,
    /// The inventory slot does not hold an item.
    #[error("inventory slot {slot} is empty")]
    UnknownInventorySlot {
        /// Requested slot.
        slot: usize,
    },
}

/// Configuration parameters required to construct the world.
#[derive(Clone, Debug)]
pub struct Config {
    floor_tiles: FloorTiles,
    rng_seed: u64,
    player_max_hp: u32,
}

impl Config {
    /// Creates a new configuration using the provided floor tiles and seed.
    #[must_use]
    pub const fn new(floor_tiles: FloorTiles, rng_seed: u64) -> Self {
        Self {
            floor_tiles,
            rng_seed,
            player_max_hp: DEFAULT_PLAYER_MAX_HP,
        }
    }

    /// Replaces the set of walkable tile ids.
    #[must_use]
    pub fn with_floor_tiles(mut self, floor_tiles: FloorTiles) -> Self {
        self.floor_tiles = floor_tiles;
        self
    }

    /// Replaces the seed driving item placement and effect rolls.
    #[must_use]
    pub fn with_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Overrides the player's maximum hit points.
    #[must_use]
    pub fn with_player_max_hp(mut self, player_max_hp: u32) -> Self {
        self.player_max_hp = player_max_hp;
        self
    }

    /// Tile ids the player can walk on.
    #[must_use]
    pub fn floor_tiles(&self) -> &FloorTiles {
        &self.floor_tiles
    }

    /// Seed driving item placement and effect rolls.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(FloorTiles::default(), DEFAULT_RNG_SEED)
    }
}

/// Player entity walking the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    position: PixelPosition,
    has_spawned: bool,
    vitals: Vitals,
}

impl Player {
    /// Creates a player that has not spawned yet.
    #[must_use]
    pub const fn new(vitals: Vitals) -> Self {
        Self {
            position: PixelPosition::new(0, 0),
            has_spawned: false,
            vitals,
        }
    }

    /// Grid-aligned pixel position of the player.
    #[must_use]
    pub const fn position(&self) -> PixelPosition {
        self.position
    }

    /// Reports whether the player was ever placed on a start point.
    #[must_use]
    pub const fn has_spawned(&self) -> bool {
        self.has_spawned
    }

    /// Current health of the player.
    #[must_use]
    pub const fn vitals(&self) -> Vitals {
        self.vitals
    }

    pub(crate) fn set_position(&mut self, position: PixelPosition) {
        self.position = position;
    }

    pub(crate) fn spawn_at(&mut self, position: PixelPosition) {
        self.position = position;
        self.has_spawned = true;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vitals::full(DEFAULT_PLAYER_MAX_HP))
    }
}

/// Represents the authoritative Wayfarer world state.
#[derive(Debug)]
pub struct World {
    assets: Assets,
    floor_tiles: FloorTiles,
    map: Option<RuntimeMap>,
    player: Player,
    inventory: Inventory,
    transition_phase: TransitionPhase,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world with no live location; the first `LoadLocation` builds one.
    #[must_use]
    pub fn new(assets: Assets, config: Config) -> Self {
        Self {
            assets,
            floor_tiles: config.floor_tiles,
            map: None,
            player: Player::new(Vitals::full(config.player_max_hp)),
            inventory: Inventory::new(),
            transition_phase: TransitionPhase::Idle,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    fn load_location(
        &mut self,
        location: LocationId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), WorldError> {
        let was_spawned = self.player.has_spawned();
        let (map, player) = map::build(&location, &self.assets, &self.floor_tiles, self.player)
            .map_err(|source| {
                tracing::warn!(location = %location, error = %source, "location failed to build");
                WorldError::InvalidSource {
                    location: location.clone(),
                    source,
                }
            })?;

        let (columns, rows) = map.dimensions();
        tracing::info!(
            location = %location,
            tileset = map.tileset(),
            columns,
            rows,
            "location loaded"
        );
        self.map = Some(map);
        self.player = player;
        out_events.push(Event::LocationLoaded {
            location,
            columns,
            rows,
        });

        if !was_spawned && self.player.has_spawned() {
            out_events.push(Event::PlayerSpawned {
                at: self.player.position(),
            });
        }
        Ok(())
    }

    fn populate_items(&mut self, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        let map = self.map.as_mut().ok_or(WorldError::NoLocationLoaded)?;
        let items = items::populate(map, &mut self.rng);
        let count = items.len();
        map.replace_items(items);
        tracing::info!(location = %map.location(), count, "items populated");
        out_events.push(Event::ItemsPopulated {
            location: map.location().clone(),
            count,
        });
        Ok(())
    }

    fn move_player(&mut self, to: PixelPosition, out_events: &mut Vec<Event>) {
        if !self.transition_phase.is_idle() {
            tracing::warn!(phase = ?self.transition_phase, "movement suppressed mid-transition");
            out_events.push(Event::InputSuppressed {
                phase: self.transition_phase,
            });
            return;
        }

        let from = self.player.position();
        let walkable = self.map.as_ref().map_or(false, |map| {
            map.is_walkable(to) && to.is_aligned_to(map.tile_size())
        });
        if to == from || !walkable {
            out_events.push(Event::PlayerBlocked { at: from });
            return;
        }

        self.player.set_position(to);
        out_events.push(Event::PlayerMoved { from, to });
    }

    fn pick_up(&mut self, out_events: &mut Vec<Event>) {
        let at = self.player.position();
        let picked = self
            .map
            .as_mut()
            .and_then(|map| items::pick_up(map, &mut self.inventory, at));
        match picked {
            Some((kind, slot)) => {
                tracing::info!(item = kind.name(), slot, "item picked up");
                out_events.push(Event::ItemPickedUp { kind, slot });
            }
            None => out_events.push(Event::NothingToPickUp { at }),
        }
    }

    fn use_item(&mut self, slot: usize, out_events: &mut Vec<Event>) -> Result<(), WorldError> {
        let record = *self
            .inventory
            .get(slot)
            .ok_or(WorldError::UnknownInventorySlot { slot })?;
        let kind = record.kind;

        if !kind.usable(UseContext::Field, TargetClass::Ally) {
            out_events.push(Event::ItemUseRejected { kind, slot });
            return Ok(());
        }

        let outcome = kind.effect().apply(&mut self.player.vitals, &mut self.rng);
        if kind.is_consumable() {
            let _ = self.inventory.remove(slot);
        }
        tracing::info!(item = kind.name(), ?outcome, "item used");
        out_events.push(Event::ItemUsed { kind, outcome });
        Ok(())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Blocked movement and empty pickups are reported as events. A location
/// that fails to build leaves the previous map, items and player untouched.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::LoadLocation { location } => world.load_location(location, out_events)?,
        Command::PopulateItems => world.populate_items(out_events)?,
        Command::MovePlayer { to } => world.move_player(to, out_events),
        Command::RelocatePlayer { to } => {
            let from = world.player.position();
            world.player.set_position(to);
            tracing::debug!(%from, %to, "player relocated");
            out_events.push(Event::PlayerRelocated { from, to });
        }
        Command::SetTransitionPhase { phase } => {
            world.transition_phase = phase;
            tracing::info!(?phase, "transition phase changed");
            out_events.push(Event::TransitionPhaseChanged { phase });
        }
        Command::FinishEffect => match world.transition_phase.effect() {
            Some(effect) => out_events.push(Event::EffectFinished { effect }),
            None => tracing::warn!(
                phase = ?world.transition_phase,
                "effect completion reported outside an effect phase"
            ),
        },
        Command::PickUp => world.pick_up(out_events),
        Command::UseItem { slot } => world.use_item(slot, out_events)?,
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use wayfarer_core::{CollisionView, ItemInstance, LocationId, TransitionPhase, Warp};

    use super::{Inventory, Player, RuntimeMap, World};

    /// Provides read-only access to the live map, if a location was loaded.
    #[must_use]
    pub fn map(world: &World) -> Option<&RuntimeMap> {
        world.map.as_ref()
    }

    /// Location of the live map.
    #[must_use]
    pub fn location(world: &World) -> Option<&LocationId> {
        world.map.as_ref().map(RuntimeMap::location)
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Provides read-only access to the inventory.
    #[must_use]
    pub fn inventory(world: &World) -> &Inventory {
        &world.inventory
    }

    /// Items lying on the live map; empty before the first load.
    #[must_use]
    pub fn items(world: &World) -> &[ItemInstance] {
        world.map.as_ref().map(RuntimeMap::items).unwrap_or(&[])
    }

    /// Warps of the live map; empty before the first load.
    #[must_use]
    pub fn warps(world: &World) -> &[Warp] {
        world.map.as_ref().map(RuntimeMap::warps).unwrap_or(&[])
    }

    /// Exposes a read-only view of the live collision mask.
    #[must_use]
    pub fn collision_view(world: &World) -> Option<CollisionView<'_>> {
        world.map.as_ref().map(RuntimeMap::collision_view)
    }

    /// Phase most recently recorded by the transition sequencer.
    #[must_use]
    pub fn transition_phase(world: &World) -> TransitionPhase {
        world.transition_phase
    }
}
