#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid-locked movement system that turns player input into world commands.

use wayfarer_core::{
    CollisionView, Command, Direction, Event, InputIntent, PixelPosition, TransitionPhase,
};

/// Single-cell step along one axis.
///
/// Only [`StepRequest::toward`] builds one, so a step never spans more than
/// one cell or moves diagonally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepRequest {
    delta_cells_x: i32,
    delta_cells_y: i32,
    ignore_collision: bool,
}

impl StepRequest {
    /// Creates a collision-checked step in the provided direction.
    #[must_use]
    pub const fn toward(direction: Direction) -> Self {
        let (delta_cells_x, delta_cells_y) = direction.delta();
        Self {
            delta_cells_x,
            delta_cells_y,
            ignore_collision: false,
        }
    }

    /// Returns the same step with the collision lookup disabled.
    ///
    /// Warp relocation never walks: the transition system emits
    /// `Command::RelocatePlayer`, which the world applies without consulting
    /// collision. This is the per-step equivalent for callers resolving a
    /// position themselves.
    #[must_use]
    pub const fn ignoring_collision(mut self) -> Self {
        self.ignore_collision = true;
        self
    }

    /// Cells moved along the column and row axes.
    #[must_use]
    pub const fn delta(&self) -> (i32, i32) {
        (self.delta_cells_x, self.delta_cells_y)
    }
}

/// Resolves a step for an entity standing at `position`.
///
/// Returns the destination, or `position` itself when the candidate cell is
/// solid or off the map. Blocked steps are a normal outcome, not a failure.
#[must_use]
pub fn resolve_step(
    position: PixelPosition,
    request: StepRequest,
    collision: CollisionView<'_>,
) -> PixelPosition {
    let tile_size = collision.tile_size();
    let (delta_x, delta_y) = request.delta();
    let (offset_x, offset_y) = (
        tile_size.origin_of(delta_x, 0).x(),
        tile_size.origin_of(0, delta_y).y(),
    );
    let candidate = PixelPosition::new(
        position.x().saturating_add(offset_x),
        position.y().saturating_add(offset_y),
    );

    if request.ignore_collision {
        return candidate;
    }

    let (column, row) = tile_size.cell_of(candidate);
    if collision.is_solid(column, row) {
        tracing::debug!(%position, column, row, "step blocked");
        position
    } else {
        candidate
    }
}

/// Pure system that translates input intents into movement and pickup commands.
#[derive(Debug, Default)]
pub struct Movement {
    phase: TransitionPhase,
}

impl Movement {
    /// Consumes world events and the current intent to emit player commands.
    ///
    /// Input is dropped while a transition is in progress so no second warp
    /// can start before the first one finishes.
    pub fn handle(
        &mut self,
        events: &[Event],
        intent: Option<InputIntent>,
        player: PixelPosition,
        collision: Option<CollisionView<'_>>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::TransitionPhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }

        let Some(intent) = intent else {
            return;
        };

        if !self.phase.is_idle() {
            tracing::debug!(phase = ?self.phase, ?intent, "input dropped mid-transition");
            return;
        }

        match intent {
            InputIntent::Move(direction) => {
                let Some(collision) = collision else {
                    return;
                };
                let to = resolve_step(player, StepRequest::toward(direction), collision);
                out.push(Command::MovePlayer { to });
            }
            InputIntent::Interact => out.push(Command::PickUp),
        }
    }
}
