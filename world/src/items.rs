//! Item placement on freshly built maps and pickup bookkeeping.

use rand::Rng;
use wayfarer_core::{ItemId, ItemInstance, ItemKind, ItemRecord, PixelPosition};

use crate::map::RuntimeMap;

const MIN_ITEM_COUNT: usize = 3;
const MAX_EXTRA_ITEMS: usize = 11;

/// Items collected by the player, in pickup order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<ItemRecord>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in pickup order.
    #[must_use]
    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    /// Number of held items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Reports whether the inventory holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record stored in the provided slot.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&ItemRecord> {
        self.records.get(slot)
    }

    pub(crate) fn push(&mut self, record: ItemRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    pub(crate) fn remove(&mut self, slot: usize) -> Option<ItemRecord> {
        (slot < self.records.len()).then(|| self.records.remove(slot))
    }
}

/// Walkable cells that no warp starts from, as pixel positions in row-major order.
#[must_use]
pub fn open_cells(map: &RuntimeMap) -> Vec<PixelPosition> {
    let (columns, rows) = map.dimensions();
    let tile_size = map.tile_size();
    let collision = map.collision_view();
    let mut cells = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let (Ok(column), Ok(row)) = (i32::try_from(column), i32::try_from(row)) else {
                continue;
            };
            if collision.is_solid(column, row) {
                continue;
            }
            let position = tile_size.origin_of(column, row);
            if map.is_warp_origin(position) {
                continue;
            }
            cells.push(position);
        }
    }
    cells
}

/// Scatters between three and fourteen random items across the open cells of `map`.
pub fn populate<R: Rng + ?Sized>(map: &RuntimeMap, rng: &mut R) -> Vec<ItemInstance> {
    let requested = MIN_ITEM_COUNT + rng.gen_range(0..=MAX_EXTRA_ITEMS);
    scatter(map, requested, rng)
}

/// Places up to `requested` random items on distinct open cells of `map`.
///
/// Cells are drawn without replacement, so no two items share a cell; when
/// fewer open cells exist than items requested, placement stops early.
pub fn scatter<R: Rng + ?Sized>(
    map: &RuntimeMap,
    requested: usize,
    rng: &mut R,
) -> Vec<ItemInstance> {
    let mut pool = open_cells(map);
    let mut items = Vec::with_capacity(requested.min(pool.len()));

    while items.len() < requested && !pool.is_empty() {
        let position = pool.swap_remove(rng.gen_range(0..pool.len()));
        let kind = ItemKind::CATALOG[rng.gen_range(0..ItemKind::CATALOG.len())];
        items.push(ItemInstance {
            id: ItemId::from_index(items.len()),
            position,
            kind,
        });
    }

    if items.len() < requested {
        tracing::debug!(
            location = %map.location(),
            requested,
            placed = items.len(),
            "open cells exhausted before all items were placed"
        );
    }

    items
}

/// Moves the item lying at `position` into the inventory.
///
/// Returns the picked kind and the inventory slot it landed in. Remaining map
/// items are renumbered so every id matches its index again.
pub fn pick_up(
    map: &mut RuntimeMap,
    inventory: &mut Inventory,
    position: PixelPosition,
) -> Option<(ItemKind, usize)> {
    let id = map
        .items()
        .iter()
        .find(|item| item.position == position)
        .map(|item| item.id)?;

    let items = map.items_mut();
    let index = usize::try_from(id.get()).ok()?;
    let item = items.remove(index);
    for (offset, remaining) in items.iter_mut().enumerate().skip(index) {
        remaining.id = ItemId::from_index(offset);
    }

    let slot = inventory.push(item.into_record());
    Some((item.kind, slot))
}
