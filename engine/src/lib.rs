#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-level driver that owns the Wayfarer world and its systems.
//!
//! Every entry point turns an adapter request into commands, applies them to
//! the world and feeds the resulting events back through the systems until
//! no further commands are produced. The returned events are the complete
//! record of what happened.

use wayfarer_core::{Command, Effect, Event, InputIntent, LocationId};
use wayfarer_system_movement::Movement;
use wayfarer_system_transition::Transition;
use wayfarer_world::{self as world, query, Assets, Config, MapError, World, WorldError};

/// Failures surfaced to the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A location requested outside a warp could not be built.
    #[error("location `{location}` could not be loaded: {source}")]
    InvalidSource {
        /// Location that failed to build.
        location: LocationId,
        /// Reason the build failed.
        source: MapError,
    },
    /// A warp destination could not be built; the player was returned to the warp origin.
    #[error("warp destination `{location}` could not be loaded: {source}")]
    LocationLoadFailure {
        /// Destination location that failed to build.
        location: LocationId,
        /// Reason the build failed.
        source: MapError,
        /// Events applied before the failure, followed by the rollback.
        events: Vec<Event>,
    },
    /// Any other command the world refused.
    #[error(transparent)]
    World(WorldError),
}

impl EngineError {
    /// Events the world applied before and after the failure.
    ///
    /// Only a failed warp destination changes the world, every other error
    /// leaves it untouched.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        match self {
            Self::LocationLoadFailure { events, .. } => events,
            Self::InvalidSource { .. } | Self::World(_) => &[],
        }
    }
}

/// Result type returned by engine entry points.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Owns the authoritative world together with the systems reacting to it.
#[derive(Debug)]
pub struct Engine {
    world: World,
    movement: Movement,
    transition: Transition,
}

impl Engine {
    /// Creates an engine over the provided assets. No location is live until [`Engine::boot`].
    #[must_use]
    pub fn new(assets: Assets, config: Config) -> Self {
        Self {
            world: World::new(assets, config),
            movement: Movement::default(),
            transition: Transition::default(),
        }
    }

    /// Loads the starting location, spawns the player and scatters its items.
    pub fn boot(&mut self, start: LocationId) -> Result<Vec<Event>> {
        tracing::info!(location = %start, "booting");
        self.pump(vec![
            Command::LoadLocation { location: start },
            Command::PopulateItems,
        ])
    }

    /// Routes a discrete input intent through the movement system.
    pub fn submit(&mut self, intent: InputIntent) -> Result<Vec<Event>> {
        let mut commands = Vec::new();
        self.movement.handle(
            &[],
            Some(intent),
            query::player(&self.world).position(),
            query::collision_view(&self.world),
            &mut commands,
        );
        self.pump(commands)
    }

    /// Reports that the presentation layer finished playing the pending effect.
    pub fn finish_effect(&mut self) -> Result<Vec<Event>> {
        self.pump(vec![Command::FinishEffect])
    }

    /// Finishes every pending effect immediately until the sequencer rests.
    ///
    /// Headless adapters use this in place of timed fades and flashes.
    pub fn settle(&mut self) -> Result<Vec<Event>> {
        let mut log = Vec::new();
        while self.pending_effect().is_some() {
            let before = self.transition.phase();
            match self.finish_effect() {
                Ok(events) => log.extend(events),
                Err(EngineError::LocationLoadFailure {
                    location,
                    source,
                    events,
                }) => {
                    log.extend(events);
                    return Err(EngineError::LocationLoadFailure {
                        location,
                        source,
                        events: log,
                    });
                }
                Err(error) => return Err(error),
            }
            if self.transition.phase() == before {
                tracing::warn!(phase = ?before, "effect completion did not advance the transition");
                break;
            }
        }
        Ok(log)
    }

    /// Uses the inventory item in `slot` on the player.
    pub fn use_item(&mut self, slot: usize) -> Result<Vec<Event>> {
        self.pump(vec![Command::UseItem { slot }])
    }

    /// Effect the presentation layer is expected to play, if any.
    #[must_use]
    pub fn pending_effect(&self) -> Option<Effect> {
        self.transition.pending_effect()
    }

    /// Read-only access to the world for snapshots and queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the transition sequencer.
    #[must_use]
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    fn pump(&mut self, mut commands: Vec<Command>) -> Result<Vec<Event>> {
        let mut log = Vec::new();

        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                if let Err(error) = world::apply(&mut self.world, command, &mut events) {
                    self.dispatch(&events, &mut Vec::new());
                    log.extend(events);
                    return Err(self.recover(error, log));
                }
            }
            self.dispatch(&events, &mut commands);
            log.extend(events);
        }

        Ok(log)
    }

    fn dispatch(&mut self, events: &[Event], commands: &mut Vec<Command>) {
        self.movement.handle(
            events,
            None,
            query::player(&self.world).position(),
            None,
            commands,
        );
        self.transition.handle(
            events,
            query::warps(&self.world),
            query::location(&self.world),
            commands,
        );
    }

    fn recover(&mut self, error: WorldError, mut log: Vec<Event>) -> EngineError {
        let WorldError::InvalidSource { location, source } = error else {
            return EngineError::World(error);
        };

        let mut rollback = Vec::new();
        if self.transition.abort(&mut rollback).is_none() {
            return EngineError::InvalidSource { location, source };
        }

        let mut events = Vec::new();
        for command in rollback {
            if let Err(error) = world::apply(&mut self.world, command, &mut events) {
                tracing::error!(%error, "rollback command rejected");
            }
        }
        self.movement.handle(
            &events,
            None,
            query::player(&self.world).position(),
            None,
            &mut Vec::new(),
        );
        log.extend(events);
        EngineError::LocationLoadFailure {
            location,
            source,
            events: log,
        }
    }
}
