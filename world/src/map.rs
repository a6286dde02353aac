//! Runtime map construction from raw location sources.

use wayfarer_core::{
    CellCoord, CollisionView, FloorTiles, ItemInstance, LocationId, PixelPosition, TileId,
    TileSize, Warp,
};

use crate::{assets::Assets, Player};

/// Reasons a location source cannot be turned into a runtime map.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// No source is registered under the requested location id.
    #[error("no source is registered for the location")]
    MissingLocation,
    /// The tile layer refers to a tileset the asset context does not know.
    #[error("tileset `{tileset}` is not registered")]
    UnknownTileset {
        /// Name of the unresolved tileset.
        tileset: String,
    },
    /// The tile layer declares a zero tile width or height.
    #[error("tile size {width}x{height} has a zero dimension")]
    ZeroTileSize {
        /// Declared tile width.
        width: u32,
        /// Declared tile height.
        height: u32,
    },
}

/// Renderable, collidable map of the live location.
///
/// Tiles and mask are stored row-major, indexed by `column + row * columns`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeMap {
    location: LocationId,
    name: String,
    tileset: String,
    tile_size: TileSize,
    columns: u32,
    rows: u32,
    tiles: Vec<Option<TileId>>,
    mask: Vec<bool>,
    warps: Vec<Warp>,
    items: Vec<ItemInstance>,
}

impl RuntimeMap {
    /// Location the map was built from.
    #[must_use]
    pub fn location(&self) -> &LocationId {
        &self.location
    }

    /// Name of the map, compared against warp destinations.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tileset the tile ids refer to.
    #[must_use]
    pub fn tileset(&self) -> &str {
        &self.tileset
    }

    /// Dimensions of a single tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// Number of columns and rows in the map.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Tile ids in row-major order. Empty cells hold `None`.
    #[must_use]
    pub fn tiles(&self) -> &[Option<TileId>] {
        &self.tiles
    }

    /// Collision mask in row-major order; `true` marks a solid cell.
    #[must_use]
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Warps in authoring order.
    #[must_use]
    pub fn warps(&self) -> &[Warp] {
        &self.warps
    }

    /// Items currently lying on the map.
    #[must_use]
    pub fn items(&self) -> &[ItemInstance] {
        &self.items
    }

    /// Read-only collision lookup over the mask.
    #[must_use]
    pub fn collision_view(&self) -> CollisionView<'_> {
        CollisionView::new(&self.mask, self.columns, self.rows, self.tile_size)
    }

    /// Reports whether the player could stand on the cell containing `position`.
    #[must_use]
    pub fn is_walkable(&self, position: PixelPosition) -> bool {
        let (column, row) = self.tile_size.cell_of(position);
        !self.collision_view().is_solid(column, row)
    }

    /// Every cell of the map in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    /// Tile id stored in the cell; `None` for empty cells and cells off the map.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Option<TileId> {
        self.index_of(cell)
            .and_then(|index| self.tiles.get(index).copied())
            .flatten()
    }

    /// Reports whether the cell blocks movement. Cells off the map do.
    #[must_use]
    pub fn is_solid(&self, cell: CellCoord) -> bool {
        self.index_of(cell)
            .and_then(|index| self.mask.get(index).copied())
            .unwrap_or(true)
    }

    /// Pixel position of the cell's upper-left corner.
    #[must_use]
    pub fn origin_of(&self, cell: CellCoord) -> PixelPosition {
        let column = i32::try_from(cell.column()).unwrap_or(i32::MAX);
        let row = i32::try_from(cell.row()).unwrap_or(i32::MAX);
        self.tile_size.origin_of(column, row)
    }

    fn index_of(&self, cell: CellCoord) -> Option<usize> {
        let column = i32::try_from(cell.column()).ok()?;
        let row = i32::try_from(cell.row()).ok()?;
        cell_index(column, row, self.columns, self.rows)
    }

    /// Reports whether some warp starts at exactly `position`.
    #[must_use]
    pub fn is_warp_origin(&self, position: PixelPosition) -> bool {
        self.warps.iter().any(|warp| warp.origin == position)
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<ItemInstance> {
        &mut self.items
    }

    pub(crate) fn replace_items(&mut self, items: Vec<ItemInstance>) {
        self.items = items;
    }
}

/// Builds the runtime map for `location` and places a player that has not yet spawned.
///
/// The returned map carries no items; the spawner populates them separately.
/// Tile entries that fall outside the truncated grid are dropped and later
/// entries for the same cell overwrite earlier ones.
pub fn build(
    location: &LocationId,
    assets: &Assets,
    floor_tiles: &FloorTiles,
    mut player: Player,
) -> Result<(RuntimeMap, Player), MapError> {
    let source = assets
        .location(location)
        .ok_or(MapError::MissingLocation)?;
    let layer = &source.tile_layer;

    if !assets.has_tileset(&layer.tileset_name) {
        return Err(MapError::UnknownTileset {
            tileset: layer.tileset_name.clone(),
        });
    }

    let tile_size = layer.tile_size();
    if tile_size.is_degenerate() {
        return Err(MapError::ZeroTileSize {
            width: layer.tile_width,
            height: layer.tile_height,
        });
    }

    let columns = source.pixel_width / tile_size.width();
    let rows = source.pixel_height / tile_size.height();
    let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);

    let mut tiles: Vec<Option<TileId>> = vec![None; cell_count];
    for tile in &layer.tiles {
        let (column, row) = tile_size.cell_of(PixelPosition::new(tile.pixel_x, tile.pixel_y));
        match cell_index(column, row, columns, rows) {
            Some(index) => tiles[index] = Some(tile.tile_id),
            None => tracing::debug!(
                location = %location,
                column,
                row,
                "dropping tile outside the map grid"
            ),
        }
    }

    let mask = tiles.iter().map(|tile| !floor_tiles.is_floor(*tile)).collect();
    let warps = source
        .object_layer
        .warps
        .iter()
        .map(|warp| warp.to_warp())
        .collect();

    if let Some(start) = source.object_layer.start {
        if !player.has_spawned() {
            player.spawn_at(start.position());
        }
    }

    let map = RuntimeMap {
        location: location.clone(),
        name: location.as_str().to_owned(),
        tileset: layer.tileset_name.clone(),
        tile_size,
        columns,
        rows,
        tiles,
        mask,
        warps,
        items: Vec::new(),
    };

    Ok((map, player))
}

fn cell_index(column: i32, row: i32, columns: u32, rows: u32) -> Option<usize> {
    let column = u32::try_from(column).ok()?;
    let row = u32::try_from(row).ok()?;
    if column >= columns || row >= rows {
        return None;
    }
    let row = usize::try_from(row).ok()?;
    let column = usize::try_from(column).ok()?;
    let width = usize::try_from(columns).ok()?;
    Some(column + row * width)
}
