#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wayfarer engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable views such as
//! [`CollisionView`], and respond exclusively with new command batches.

mod items;
mod source;

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

pub use items::{
    EffectOutcome, ItemEffect, ItemId, ItemInstance, ItemKind, ItemRecord, TargetClass,
    TradeValue, UseContext, Vitals,
};
pub use source::{
    LocationSource, ObjectLayerSource, StartSource, TileLayerSource, TileSource, WarpSource,
};

/// Floor tile identifiers used when no configuration overrides them.
pub const DEFAULT_FLOOR_TILE_IDS: [i32; 6] = [0, 2, 4, 5, 7, 19];

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuilds the live map from the named location's source data.
    LoadLocation {
        /// Location whose source should be turned into the live map.
        location: LocationId,
    },
    /// Scatters a fresh set of items across the open cells of the live map.
    PopulateItems,
    /// Moves the player to a position already resolved against collision.
    MovePlayer {
        /// Destination of the walking step.
        to: PixelPosition,
    },
    /// Relocates the player unconditionally, bypassing collision.
    RelocatePlayer {
        /// Destination of the relocation.
        to: PixelPosition,
    },
    /// Records the phase the transition sequencer entered.
    SetTransitionPhase {
        /// Phase that became active.
        phase: TransitionPhase,
    },
    /// Reports that the presentation layer finished playing the current effect.
    FinishEffect,
    /// Picks up the item lying at the player's position, if any.
    PickUp,
    /// Uses the inventory item stored in the provided slot on the player.
    UseItem {
        /// Zero-based inventory slot.
        slot: usize,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a location was built and replaced the live map.
    LocationLoaded {
        /// Location that is now live.
        location: LocationId,
        /// Width of the new map in cells.
        columns: u32,
        /// Height of the new map in cells.
        rows: u32,
    },
    /// Confirms that the player was placed on a location's start point.
    PlayerSpawned {
        /// Position the player spawned at.
        at: PixelPosition,
    },
    /// Confirms that items were scattered across the live map.
    ItemsPopulated {
        /// Location the items belong to.
        location: LocationId,
        /// Number of items placed.
        count: usize,
    },
    /// Confirms that the player walked between two cells.
    PlayerMoved {
        /// Position before the step.
        from: PixelPosition,
        /// Position after the step.
        to: PixelPosition,
    },
    /// Reports that a walking step was blocked and the player stayed put.
    PlayerBlocked {
        /// Position the player remains at.
        at: PixelPosition,
    },
    /// Confirms that the player was relocated without a collision check.
    PlayerRelocated {
        /// Position before the relocation.
        from: PixelPosition,
        /// Position after the relocation.
        to: PixelPosition,
    },
    /// Reports that movement input arrived while a transition was running.
    InputSuppressed {
        /// Phase that was active when the input arrived.
        phase: TransitionPhase,
    },
    /// Announces that the transition sequencer entered a new phase.
    TransitionPhaseChanged {
        /// Phase that became active.
        phase: TransitionPhase,
    },
    /// Confirms that the presentation layer finished playing an effect.
    EffectFinished {
        /// Effect that completed.
        effect: Effect,
    },
    /// Confirms that an item moved from the map into the inventory.
    ItemPickedUp {
        /// Kind of item that was collected.
        kind: ItemKind,
        /// Inventory slot the item now occupies.
        slot: usize,
    },
    /// Reports that no item lies at the player's position.
    NothingToPickUp {
        /// Position that was searched.
        at: PixelPosition,
    },
    /// Confirms that an inventory item was used on the player.
    ItemUsed {
        /// Kind of item that was used.
        kind: ItemKind,
        /// Result of applying the item's effect.
        outcome: EffectOutcome,
    },
    /// Reports that an inventory item cannot be used on the player outside battle.
    ItemUseRejected {
        /// Kind of item that was rejected.
        kind: ItemKind,
        /// Inventory slot holding the item.
        slot: usize,
    },
}

/// Discrete input produced by the keyboard collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputIntent {
    /// Requests a single grid step in the provided direction.
    Move(Direction),
    /// Requests interaction with the player's current cell.
    Interact,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Cell offset along the column and row axes for a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Identifier of a location, matching the keys used by the asset catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    /// Creates a new location identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Position expressed in pixels. Entities keep it aligned to the tile grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelPosition {
    x: i32,
    y: i32,
}

impl PixelPosition {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reports whether the position lies exactly on a tile corner.
    #[must_use]
    pub fn is_aligned_to(&self, tile_size: TileSize) -> bool {
        if tile_size.is_degenerate() {
            return false;
        }
        self.x.rem_euclid(tile_size.width_i32()) == 0
            && self.y.rem_euclid(tile_size.height_i32()) == 0
    }
}

impl fmt::Display for PixelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions of a single tile measured in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileSize {
    width: u32,
    height: u32,
}

impl TileSize {
    /// Creates a new tile size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Tile width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Tile height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether either dimension is zero.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn width_i32(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    fn height_i32(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }

    /// Cell containing the provided pixel position, which may lie off the map.
    ///
    /// Uses floor division so positions left of or above the origin map to
    /// negative cells. A degenerate tile size maps every position to the origin.
    #[must_use]
    pub fn cell_of(&self, position: PixelPosition) -> (i32, i32) {
        if self.is_degenerate() {
            return (0, 0);
        }
        (
            position.x().div_euclid(self.width_i32()),
            position.y().div_euclid(self.height_i32()),
        )
    }

    /// Pixel position of the upper-left corner of the provided cell.
    #[must_use]
    pub fn origin_of(&self, column: i32, row: i32) -> PixelPosition {
        PixelPosition::new(
            column.saturating_mul(self.width_i32()),
            row.saturating_mul(self.height_i32()),
        )
    }
}

/// Location of a single in-bounds grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Identifier of a tile within a tileset.
///
/// Cells without a tile are `None` in the map, not a reserved id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(i32);

impl TileId {
    /// Creates a new tile identifier.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric tile identifier.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

/// Set of tile identifiers that can be walked on. Every other id is solid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorTiles(BTreeSet<i32>);

impl FloorTiles {
    /// Creates a floor set from the provided tile identifiers.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = i32>) -> Self {
        Self(ids.into_iter().collect())
    }

    /// Reports whether the tile can be walked on. Empty cells never can.
    #[must_use]
    pub fn is_floor(&self, tile: Option<TileId>) -> bool {
        tile.map_or(false, |tile| self.0.contains(&tile.get()))
    }

    /// Iterator over the configured floor identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for FloorTiles {
    fn default() -> Self {
        Self::new(DEFAULT_FLOOR_TILE_IDS)
    }
}

/// Point on a map that sends the player elsewhere when stepped on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Warp {
    /// Pixel position that triggers the warp.
    pub origin: PixelPosition,
    /// Pixel position the player lands on.
    pub destination: PixelPosition,
    /// Location the player lands in.
    pub destination_location: LocationId,
}

/// Classification of a triggered warp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WarpKind {
    /// Destination lies in the current location; plays a short flash.
    Teleport,
    /// Destination lies in another location; fades out and back in.
    Transition,
}

/// Warp the player triggered together with its classification.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WarpEvent {
    /// Warp whose origin matched the player's position.
    pub warp: Warp,
    /// Whether the warp teleports within the location or transitions away.
    pub kind: WarpKind,
}

/// Visual cue played by the presentation layer while a warp resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Screen fades out before leaving a location.
    FadeOut,
    /// Screen fades in after arriving in a location.
    FadeIn,
    /// Screen flashes during an in-location teleport.
    Flash,
}

/// Ordered steps of a warp resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// No warp is resolving; movement input is accepted.
    #[default]
    Idle,
    /// Exit fade plays before leaving the location.
    ExitEffectPlaying,
    /// Flash plays before an in-location teleport.
    TeleportEffectPlaying,
    /// Player is being placed on the warp destination.
    Relocating,
    /// Destination location is being built.
    LocationLoading,
    /// Items are being scattered across the new location.
    ItemsPopulating,
    /// Entry fade plays after arriving.
    EntryEffectPlaying,
}

impl TransitionPhase {
    /// Effect the presentation layer must play to completion in this phase.
    #[must_use]
    pub const fn effect(self) -> Option<Effect> {
        match self {
            Self::ExitEffectPlaying => Some(Effect::FadeOut),
            Self::EntryEffectPlaying => Some(Effect::FadeIn),
            Self::TeleportEffectPlaying => Some(Effect::Flash),
            Self::Idle | Self::Relocating | Self::LocationLoading | Self::ItemsPopulating => None,
        }
    }

    /// Reports whether movement input is accepted.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Read-only view into the collision mask of the live map.
#[derive(Clone, Copy, Debug)]
pub struct CollisionView<'a> {
    mask: &'a [bool],
    columns: u32,
    rows: u32,
    tile_size: TileSize,
}

impl<'a> CollisionView<'a> {
    /// Captures a new collision view backed by the provided mask slice.
    #[must_use]
    pub fn new(mask: &'a [bool], columns: u32, rows: u32, tile_size: TileSize) -> Self {
        Self {
            mask,
            columns,
            rows,
            tile_size,
        }
    }

    /// Reports whether the cell blocks movement. Cells off the map are solid.
    #[must_use]
    pub fn is_solid(&self, column: i32, row: i32) -> bool {
        self.index(column, row)
            .and_then(|index| self.mask.get(index).copied())
            .unwrap_or(true)
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Tile size used to convert pixels into cells.
    #[must_use]
    pub const fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column < self.columns && row < self.rows {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
