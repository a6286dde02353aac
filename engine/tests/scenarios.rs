use std::collections::HashSet;

use serde_json::json;
use wayfarer_core::{
    Direction, Effect, Event, InputIntent, ItemId, LocationId, LocationSource, PixelPosition,
    TransitionPhase,
};
use wayfarer_engine::{Engine, EngineError};
use wayfarer_world::{query, Assets, Config, MapError};

fn location(
    columns: i32,
    rows: i32,
    solid: &[(i32, i32)],
    warps: serde_json::Value,
    start: (i32, i32),
) -> LocationSource {
    let mut tiles = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            let tile_id = if solid.contains(&(column, row)) { 1 } else { 0 };
            tiles.push(json!({ "pixelX": column * 8, "pixelY": row * 8, "tileId": tile_id }));
        }
    }
    serde_json::from_value(json!({
        "pixelWidth": columns * 8,
        "pixelHeight": rows * 8,
        "tileLayer": {
            "tileWidth": 8,
            "tileHeight": 8,
            "tilesetName": "overworld",
            "tiles": tiles,
        },
        "objectLayer": {
            "warps": warps,
            "start": { "pixelX": start.0, "pixelY": start.1 },
        },
    }))
    .expect("fixture decodes")
}

fn overworld() -> Assets {
    let mut assets = Assets::new();
    assets.register_tileset("overworld");
    let _ = assets.insert_location(
        LocationId::new("world"),
        location(
            10,
            8,
            &[(3, 3)],
            json!([
                { "pixelX": 40, "pixelY": 40, "destPixelX": 8, "destPixelY": 8, "destLocationId": "town" },
                { "pixelX": 72, "pixelY": 56, "destPixelX": 0, "destPixelY": 0, "destLocationId": "ruins" },
            ]),
            (16, 24),
        ),
    );
    let _ = assets.insert_location(
        LocationId::new("town"),
        location(
            6,
            6,
            &[],
            json!([
                { "pixelX": 40, "pixelY": 40, "destPixelX": 0, "destPixelY": 0, "destLocationId": "world" },
            ]),
            (24, 24),
        ),
    );
    assets
}

fn booted(assets: Assets, start: &str) -> Engine {
    let mut engine = Engine::new(assets, Config::default());
    let _ = engine
        .boot(LocationId::new(start))
        .expect("start location boots");
    engine
}

fn walk(engine: &mut Engine, directions: &[Direction]) -> Vec<Event> {
    let mut events = Vec::new();
    for direction in directions {
        events.extend(
            engine
                .submit(InputIntent::Move(*direction))
                .expect("step applies"),
        );
    }
    events
}

fn phases(events: &[Event]) -> Vec<TransitionPhase> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TransitionPhaseChanged { phase } => Some(*phase),
            _ => None,
        })
        .collect()
}

fn position(engine: &Engine) -> PixelPosition {
    query::player(engine.world()).position()
}

#[test]
fn pressing_right_into_a_solid_tile_is_blocked() {
    let mut engine = booted(overworld(), "world");
    assert_eq!(position(&engine), PixelPosition::new(16, 24));

    let events = walk(&mut engine, &[Direction::East]);

    assert_eq!(
        events,
        vec![Event::PlayerBlocked {
            at: PixelPosition::new(16, 24)
        }]
    );
    assert_eq!(position(&engine), PixelPosition::new(16, 24));
}

#[test]
fn warp_to_town_runs_the_full_sequence() {
    let mut engine = booted(overworld(), "world");
    let approach = walk(
        &mut engine,
        &[
            Direction::South,
            Direction::South,
            Direction::East,
            Direction::East,
            Direction::East,
        ],
    );
    assert_eq!(phases(&approach), vec![TransitionPhase::ExitEffectPlaying]);
    assert_eq!(engine.pending_effect(), Some(Effect::FadeOut));
    assert_eq!(position(&engine), PixelPosition::new(40, 40));

    let suppressed = walk(&mut engine, &[Direction::West]);
    assert!(suppressed.is_empty());
    assert_eq!(position(&engine), PixelPosition::new(40, 40));

    let arrival = engine.finish_effect().expect("exit fade finishes");
    assert_eq!(
        phases(&arrival),
        vec![
            TransitionPhase::Relocating,
            TransitionPhase::LocationLoading,
            TransitionPhase::ItemsPopulating,
            TransitionPhase::EntryEffectPlaying,
        ]
    );
    assert!(arrival.contains(&Event::PlayerRelocated {
        from: PixelPosition::new(40, 40),
        to: PixelPosition::new(8, 8),
    }));
    assert!(arrival.contains(&Event::LocationLoaded {
        location: LocationId::new("town"),
        columns: 6,
        rows: 6,
    }));
    assert!(!arrival
        .iter()
        .any(|event| matches!(event, Event::PlayerSpawned { .. })));
    assert_eq!(engine.pending_effect(), Some(Effect::FadeIn));

    let settled = engine.finish_effect().expect("entry fade finishes");
    assert_eq!(
        settled,
        vec![
            Event::EffectFinished {
                effect: Effect::FadeIn
            },
            Event::TransitionPhaseChanged {
                phase: TransitionPhase::Idle
            },
        ]
    );
    assert_eq!(query::location(engine.world()), Some(&LocationId::new("town")));
    assert_eq!(position(&engine), PixelPosition::new(8, 8));
    assert!((3..=14).contains(&query::items(engine.world()).len()));
}

#[test]
fn returning_to_the_start_location_does_not_respawn() {
    let mut engine = booted(overworld(), "world");
    let _ = walk(
        &mut engine,
        &[
            Direction::South,
            Direction::South,
            Direction::East,
            Direction::East,
            Direction::East,
        ],
    );
    let _ = engine.settle().expect("town transition settles");

    let _ = walk(
        &mut engine,
        &[
            Direction::East,
            Direction::East,
            Direction::East,
            Direction::East,
            Direction::South,
            Direction::South,
            Direction::South,
            Direction::South,
        ],
    );
    let back = engine.settle().expect("world transition settles");

    assert_eq!(query::location(engine.world()), Some(&LocationId::new("world")));
    assert_eq!(position(&engine), PixelPosition::new(0, 0));
    assert!(!back
        .iter()
        .any(|event| matches!(event, Event::PlayerSpawned { .. })));
}

#[test]
fn failed_destination_rolls_back_to_the_warp_origin() {
    let mut engine = booted(overworld(), "world");
    let items_before = query::items(engine.world()).to_vec();
    let mut route = vec![Direction::South; 4];
    route.extend([Direction::East; 7]);
    let _ = walk(&mut engine, &route);
    assert_eq!(position(&engine), PixelPosition::new(72, 56));
    assert_eq!(engine.pending_effect(), Some(Effect::FadeOut));

    let error = engine.finish_effect().expect_err("ruins are missing");

    match &error {
        EngineError::LocationLoadFailure {
            location, source, ..
        } => {
            assert_eq!(location, &LocationId::new("ruins"));
            assert_eq!(source, &MapError::MissingLocation);
        }
        other => panic!("unexpected error: {other}"),
    }
    let events = error.events();
    assert_eq!(
        events.first(),
        Some(&Event::EffectFinished {
            effect: Effect::FadeOut
        })
    );
    assert!(events.contains(&Event::TransitionPhaseChanged {
        phase: TransitionPhase::LocationLoading
    }));
    match events {
        [.., Event::PlayerRelocated { to, .. }, Event::TransitionPhaseChanged { phase }] => {
            assert_eq!(*to, PixelPosition::new(72, 56));
            assert_eq!(*phase, TransitionPhase::Idle);
        }
        other => panic!("rollback missing from the returned events: {other:?}"),
    }
    assert_eq!(position(&engine), PixelPosition::new(72, 56));
    assert_eq!(query::location(engine.world()), Some(&LocationId::new("world")));
    assert_eq!(query::items(engine.world()), items_before.as_slice());
    assert!(query::transition_phase(engine.world()).is_idle());
    assert_eq!(engine.pending_effect(), None);

    let retreat = walk(&mut engine, &[Direction::West]);
    assert_eq!(
        retreat,
        vec![Event::PlayerMoved {
            from: PixelPosition::new(72, 56),
            to: PixelPosition::new(64, 56),
        }]
    );
}

#[test]
fn collecting_every_item_keeps_ids_dense() {
    let mut assets = Assets::new();
    assets.register_tileset("overworld");
    let _ = assets.insert_location(
        LocationId::new("yard"),
        location(4, 3, &[], json!([]), (0, 0)),
    );
    let mut engine = booted(assets, "yard");
    let spawned = query::items(engine.world()).len();
    let cells: HashSet<_> = query::items(engine.world())
        .iter()
        .map(|item| item.position)
        .collect();
    assert_eq!(cells.len(), spawned);

    let route = [
        None,
        Some(Direction::East),
        Some(Direction::East),
        Some(Direction::East),
        Some(Direction::South),
        Some(Direction::West),
        Some(Direction::West),
        Some(Direction::West),
        Some(Direction::South),
        Some(Direction::East),
        Some(Direction::East),
        Some(Direction::East),
    ];
    for step in route {
        if let Some(direction) = step {
            let _ = walk(&mut engine, &[direction]);
        }
        let _ = engine.submit(InputIntent::Interact).expect("pickup applies");

        for (index, item) in query::items(engine.world()).iter().enumerate() {
            assert_eq!(item.id, ItemId::from_index(index));
        }
        let again = engine.submit(InputIntent::Interact).expect("pickup applies");
        assert_eq!(
            again,
            vec![Event::NothingToPickUp {
                at: position(&engine)
            }]
        );
    }

    assert!(query::items(engine.world()).is_empty());
    assert_eq!(query::inventory(engine.world()).len(), spawned);
}

#[test]
fn destination_with_an_unregistered_tileset_fails_like_a_missing_one() {
    let mut assets = Assets::new();
    assets.register_tileset("overworld");
    let _ = assets.insert_location(
        LocationId::new("hall"),
        location(
            3,
            1,
            &[],
            json!([
                { "pixelX": 8, "pixelY": 0, "destPixelX": 0, "destPixelY": 0, "destLocationId": "crypt" },
            ]),
            (0, 0),
        ),
    );
    let mut crypt = location(2, 2, &[], json!([]), (0, 0));
    crypt.tile_layer.tileset_name = "catacombs".to_owned();
    let _ = assets.insert_location(LocationId::new("crypt"), crypt);

    let mut engine = booted(assets, "hall");
    let _ = walk(&mut engine, &[Direction::East]);
    assert_eq!(engine.pending_effect(), Some(Effect::FadeOut));

    let error = engine.settle().expect_err("crypt tileset is unknown");
    assert!(matches!(
        &error,
        EngineError::LocationLoadFailure {
            source: MapError::UnknownTileset { tileset },
            ..
        } if tileset == "catacombs"
    ));
    assert_eq!(
        phases(error.events()),
        vec![
            TransitionPhase::Relocating,
            TransitionPhase::LocationLoading,
            TransitionPhase::Idle,
        ]
    );
    assert_eq!(
        error.events().last(),
        Some(&Event::TransitionPhaseChanged {
            phase: TransitionPhase::Idle
        })
    );
    assert_eq!(position(&engine), PixelPosition::new(8, 0));
    assert_eq!(query::location(engine.world()), Some(&LocationId::new("hall")));
}
