#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Warp transition sequencer.
//!
//! The sequencer is an explicit state machine over [`TransitionPhase`]. It
//! starts when the player walks onto a warp origin and advances exactly one
//! phase per confirming world event, so every step finishes before the next
//! begins:
//!
//! * cross-location warps: `Idle → ExitEffectPlaying → Relocating →
//!   LocationLoading → ItemsPopulating → EntryEffectPlaying → Idle`
//! * same-location warps: `Idle → TeleportEffectPlaying → Relocating → Idle`

use wayfarer_core::{
    Command, Effect, Event, LocationId, PixelPosition, TransitionPhase, Warp, WarpEvent, WarpKind,
};

/// Warp being resolved together with the cell it was triggered from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveWarp {
    event: WarpEvent,
    origin: PixelPosition,
}

impl ActiveWarp {
    /// Warp that triggered the sequence and its classification.
    #[must_use]
    pub fn event(&self) -> &WarpEvent {
        &self.event
    }

    /// Position the player stood on when the warp triggered.
    #[must_use]
    pub const fn origin(&self) -> PixelPosition {
        self.origin
    }
}

/// Pure system sequencing warp resolution across world events.
#[derive(Debug, Default)]
pub struct Transition {
    phase: TransitionPhase,
    active: Option<ActiveWarp>,
}

impl Transition {
    /// Phase the sequencer is currently in.
    #[must_use]
    pub const fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Warp being resolved, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveWarp> {
        self.active.as_ref()
    }

    /// Effect the presentation layer must finish before the sequence can continue.
    #[must_use]
    pub const fn pending_effect(&self) -> Option<Effect> {
        self.phase.effect()
    }

    /// Consumes world events and emits the commands for the next phase.
    ///
    /// `warps` and `current` describe the live map and are only consulted
    /// while idle. Relocations never start a sequence, so a teleport landing
    /// on another warp origin does not chain.
    pub fn handle(
        &mut self,
        events: &[Event],
        warps: &[Warp],
        current: Option<&LocationId>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::PlayerMoved { to, .. } => self.on_player_moved(*to, warps, current, out),
                Event::EffectFinished { effect } => self.on_effect_finished(*effect, out),
                Event::PlayerRelocated { .. } => self.on_player_relocated(out),
                Event::LocationLoaded { location, .. } => self.on_location_loaded(location, out),
                Event::ItemsPopulated { .. } => {
                    if self.phase == TransitionPhase::ItemsPopulating {
                        self.enter(TransitionPhase::EntryEffectPlaying, out);
                    }
                }
                _ => {}
            }
        }
    }

    /// Abandons the running sequence after the destination failed to load.
    ///
    /// Emits the commands that move the player back onto the warp origin and
    /// return to idle, then yields the abandoned warp.
    pub fn abort(&mut self, out: &mut Vec<Command>) -> Option<ActiveWarp> {
        let active = self.active.take()?;
        tracing::warn!(
            phase = ?self.phase,
            location = %active.event.warp.destination_location,
            origin = %active.origin,
            "transition aborted; returning player to warp origin"
        );
        out.push(Command::RelocatePlayer { to: active.origin });
        self.enter(TransitionPhase::Idle, out);
        Some(active)
    }

    fn on_player_moved(
        &mut self,
        to: PixelPosition,
        warps: &[Warp],
        current: Option<&LocationId>,
        out: &mut Vec<Command>,
    ) {
        if !self.phase.is_idle() {
            return;
        }
        let Some(current) = current else {
            return;
        };
        let Some(event) = wayfarer_system_warp::resolve(to, warps, current) else {
            return;
        };

        let first = match event.kind {
            WarpKind::Teleport => TransitionPhase::TeleportEffectPlaying,
            WarpKind::Transition => TransitionPhase::ExitEffectPlaying,
        };
        self.active = Some(ActiveWarp { event, origin: to });
        self.enter(first, out);
    }

    fn on_effect_finished(&mut self, effect: Effect, out: &mut Vec<Command>) {
        if self.phase.effect() != Some(effect) {
            return;
        }
        match self.phase {
            TransitionPhase::ExitEffectPlaying | TransitionPhase::TeleportEffectPlaying => {
                let Some(active) = self.active.as_ref() else {
                    return;
                };
                let to = active.event.warp.destination;
                self.enter(TransitionPhase::Relocating, out);
                out.push(Command::RelocatePlayer { to });
            }
            TransitionPhase::EntryEffectPlaying => {
                self.active = None;
                self.enter(TransitionPhase::Idle, out);
            }
            _ => {}
        }
    }

    fn on_player_relocated(&mut self, out: &mut Vec<Command>) {
        if self.phase != TransitionPhase::Relocating {
            return;
        }
        let Some(active) = self.active.as_ref() else {
            return;
        };
        match active.event.kind {
            WarpKind::Teleport => {
                self.active = None;
                self.enter(TransitionPhase::Idle, out);
            }
            WarpKind::Transition => {
                let location = active.event.warp.destination_location.clone();
                self.enter(TransitionPhase::LocationLoading, out);
                out.push(Command::LoadLocation { location });
            }
        }
    }

    fn on_location_loaded(&mut self, location: &LocationId, out: &mut Vec<Command>) {
        if self.phase != TransitionPhase::LocationLoading {
            return;
        }
        let expected = self
            .active
            .as_ref()
            .map(|active| &active.event.warp.destination_location);
        if expected != Some(location) {
            return;
        }
        self.enter(TransitionPhase::ItemsPopulating, out);
        out.push(Command::PopulateItems);
    }

    fn enter(&mut self, phase: TransitionPhase, out: &mut Vec<Command>) {
        tracing::debug!(from = ?self.phase, to = ?phase, "transition advanced");
        self.phase = phase;
        out.push(Command::SetTransitionPhase { phase });
    }
}
