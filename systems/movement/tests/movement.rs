use wayfarer_core::{
    Command, Direction, Event, InputIntent, LocationId, LocationSource, ObjectLayerSource,
    PixelPosition, StartSource, TileId, TileLayerSource, TileSource,
};
use wayfarer_system_movement::Movement;
use wayfarer_world::{self as world, query, Assets, Config, World};

const TILE: i32 = 8;

fn location(solid: &[(i32, i32)], start: (i32, i32)) -> LocationSource {
    let mut tiles = Vec::new();
    for row in 0..8 {
        for column in 0..10 {
            let id = if solid.contains(&(column, row)) { 1 } else { 0 };
            tiles.push(TileSource {
                pixel_x: column * TILE,
                pixel_y: row * TILE,
                tile_id: TileId::new(id),
            });
        }
    }
    LocationSource {
        pixel_width: 80,
        pixel_height: 64,
        tile_layer: TileLayerSource {
            tile_width: 8,
            tile_height: 8,
            tileset_name: "tiles".to_owned(),
            tiles,
        },
        object_layer: ObjectLayerSource {
            warps: Vec::new(),
            start: Some(StartSource {
                pixel_x: start.0 * TILE,
                pixel_y: start.1 * TILE,
            }),
        },
    }
}

fn loaded_world(source: LocationSource) -> World {
    let mut assets = Assets::new();
    assets.register_tileset("tiles");
    let _ = assets.insert_location(LocationId::new("world"), source);
    let mut world = World::new(assets, Config::default());
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadLocation {
            location: LocationId::new("world"),
        },
        &mut events,
    )
    .expect("location loads");
    world
}

fn press(world: &mut World, movement: &mut Movement, direction: Direction) -> Vec<Event> {
    let mut commands = Vec::new();
    movement.handle(
        &[],
        Some(InputIntent::Move(direction)),
        query::player(world).position(),
        query::collision_view(world),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events).expect("movement applies");
    }
    events
}

#[test]
fn step_into_solid_tile_is_blocked() {
    let mut world = loaded_world(location(&[(3, 3)], (2, 3)));
    let mut movement = Movement::default();

    let events = press(&mut world, &mut movement, Direction::East);

    assert_eq!(
        events,
        vec![Event::PlayerBlocked {
            at: PixelPosition::new(16, 24)
        }]
    );
    assert_eq!(query::player(&world).position(), PixelPosition::new(16, 24));
}

#[test]
fn step_onto_floor_moves_exactly_one_tile() {
    let mut world = loaded_world(location(&[(3, 3)], (2, 3)));
    let mut movement = Movement::default();

    let events = press(&mut world, &mut movement, Direction::North);

    assert_eq!(
        events,
        vec![Event::PlayerMoved {
            from: PixelPosition::new(16, 24),
            to: PixelPosition::new(16, 16),
        }]
    );
}

#[test]
fn edge_of_map_blocks_like_a_wall() {
    let mut world = loaded_world(location(&[], (0, 0)));
    let mut movement = Movement::default();

    for direction in [Direction::North, Direction::West] {
        let events = press(&mut world, &mut movement, direction);
        assert_eq!(
            events,
            vec![Event::PlayerBlocked {
                at: PixelPosition::new(0, 0)
            }]
        );
    }
}

#[test]
fn long_walk_stays_grid_locked_and_off_solid_cells() {
    let solid = [(3, 3), (4, 3), (5, 3), (6, 1), (6, 2), (1, 5), (8, 6)];
    let mut world = loaded_world(location(&solid, (2, 2)));
    let mut movement = Movement::default();
    let directions = [
        Direction::East,
        Direction::East,
        Direction::South,
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::South,
    ];

    for step in 0..400_usize {
        let direction = directions[(step * 7 + step / 3) % directions.len()];
        let _ = press(&mut world, &mut movement, direction);

        let position = query::player(&world).position();
        assert_eq!(position.x() % TILE, 0, "x off grid after step {step}");
        assert_eq!(position.y() % TILE, 0, "y off grid after step {step}");
        let cell = (position.x() / TILE, position.y() / TILE);
        assert!(!solid.contains(&cell), "entered solid cell {cell:?}");
        assert!((0..10).contains(&cell.0) && (0..8).contains(&cell.1));
    }
}

#[test]
fn interact_requests_a_pickup() {
    let world = loaded_world(location(&[], (0, 0)));
    let mut movement = Movement::default();
    let mut commands = Vec::new();
    movement.handle(
        &[],
        Some(InputIntent::Interact),
        query::player(&world).position(),
        query::collision_view(&world),
        &mut commands,
    );
    assert_eq!(commands, vec![Command::PickUp]);
}
