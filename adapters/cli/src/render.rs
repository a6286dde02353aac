use std::fmt::Write as _;

use wayfarer_core::Event;
use wayfarer_world::{query, World};

const SOLID: char = '#';
const FLOOR: char = '.';
const WARP: char = '>';
const ITEM: char = '*';
const PLAYER: char = '@';

/// Draws the live map as one text row per map row.
///
/// Later layers win: warp origins over terrain, items over warps, the player
/// over everything.
pub(crate) fn frame(world: &World) -> String {
    let Some(map) = query::map(world) else {
        return String::from("(no location loaded)\n");
    };
    let (columns, _) = map.dimensions();
    let player = query::player(world).position();
    let columns = usize::try_from(columns).unwrap_or(0);

    let mut out = String::new();
    for (index, cell) in map.cells().enumerate() {
        let origin = map.origin_of(cell);
        let glyph = if origin == player {
            PLAYER
        } else if query::items(world).iter().any(|item| item.position == origin) {
            ITEM
        } else if map.is_warp_origin(origin) {
            WARP
        } else if map.is_solid(cell) {
            SOLID
        } else {
            FLOOR
        };
        out.push(glyph);
        if columns != 0 && (index + 1) % columns == 0 {
            out.push('\n');
        }
    }
    out
}

/// One-line summary of location, player and inventory.
pub(crate) fn status(world: &World) -> String {
    let location = query::location(world).map_or("-", |location| location.as_str());
    let player = query::player(world);
    let vitals = player.vitals();
    let mut line = format!(
        "[{location}] player {} hp {}/{}{}",
        player.position(),
        vitals.hp,
        vitals.max_hp,
        if vitals.poisoned { " (poisoned)" } else { "" }
    );

    let inventory = query::inventory(world);
    if inventory.is_empty() {
        line.push_str(" | inventory empty");
    } else {
        line.push_str(" | inventory:");
        for (slot, record) in inventory.records().iter().enumerate() {
            let _ = write!(line, " {slot}:{}", record.kind.name());
        }
    }
    line
}

/// Human-readable line for events worth showing to the player.
pub(crate) fn describe(event: &Event) -> Option<String> {
    let text = match event {
        Event::LocationLoaded {
            location,
            columns,
            rows,
        } => format!("entered {location} ({columns}x{rows})"),
        Event::ItemsPopulated { count, .. } => format!("{count} items lie scattered about"),
        Event::PlayerBlocked { at } => format!("blocked at {at}"),
        Event::EffectFinished { effect } => format!("{effect:?} finished"),
        Event::ItemPickedUp { kind, slot } => format!("picked up {} into slot {slot}", kind.name()),
        Event::NothingToPickUp { .. } => String::from("nothing here"),
        Event::ItemUsed { kind, outcome } => format!("used {}: {outcome:?}", kind.name()),
        Event::ItemUseRejected { kind, .. } => {
            format!("{} cannot be used here", kind.name())
        }
        Event::InputSuppressed { phase } => format!("busy ({phase:?})"),
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_core::{
        Command, LocationId, LocationSource, ObjectLayerSource, StartSource, TileId,
        TileLayerSource, TileSource, WarpSource,
    };
    use wayfarer_world::{self as world, Assets, Config};

    fn three_by_two() -> World {
        let tiles = [(0, 0, 0), (8, 0, 1), (16, 0, 0), (0, 8, 0), (8, 8, 0), (16, 8, 0)]
            .into_iter()
            .map(|(pixel_x, pixel_y, id)| TileSource {
                pixel_x,
                pixel_y,
                tile_id: TileId::new(id),
            })
            .collect();
        let source = LocationSource {
            pixel_width: 24,
            pixel_height: 16,
            tile_layer: TileLayerSource {
                tile_width: 8,
                tile_height: 8,
                tileset_name: "overworld".to_owned(),
                tiles,
            },
            object_layer: ObjectLayerSource {
                warps: vec![WarpSource {
                    pixel_x: 16,
                    pixel_y: 8,
                    dest_pixel_x: 0,
                    dest_pixel_y: 0,
                    dest_location_id: LocationId::new("yard"),
                }],
                start: Some(StartSource {
                    pixel_x: 0,
                    pixel_y: 8,
                }),
            },
        };
        let mut assets = Assets::new();
        assets.register_tileset("overworld");
        let _ = assets.insert_location(LocationId::new("yard"), source);
        let mut world = World::new(assets, Config::default());
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::LoadLocation {
                location: LocationId::new("yard"),
            },
            &mut events,
        )
        .expect("yard loads");
        world
    }

    #[test]
    fn frame_layers_player_warp_and_terrain() {
        let world = three_by_two();
        assert_eq!(frame(&world), ".#.\n@.>\n");
    }

    #[test]
    fn status_lists_location_and_empty_inventory() {
        let world = three_by_two();
        assert_eq!(
            status(&world),
            "[yard] player (0, 8) hp 50/50 | inventory empty"
        );
    }

    #[test]
    fn unloaded_world_has_placeholder_frame() {
        let world = World::new(Assets::new(), Config::default());
        assert_eq!(frame(&world), "(no location loaded)\n");
    }
}
