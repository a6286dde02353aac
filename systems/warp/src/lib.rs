#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Warp resolution for the player's current cell.

use wayfarer_core::{LocationId, PixelPosition, Warp, WarpEvent, WarpKind};

/// Finds the warp whose origin equals the player's exact position.
///
/// When several warps share an origin the first in list order wins. Warps
/// leading back into `current` teleport; all others transition.
#[must_use]
pub fn resolve(player: PixelPosition, warps: &[Warp], current: &LocationId) -> Option<WarpEvent> {
    let warp = warps.iter().find(|warp| warp.origin == player)?;
    let kind = classify(warp, current);
    tracing::debug!(
        origin = %warp.origin,
        destination = %warp.destination,
        location = %warp.destination_location,
        ?kind,
        "warp triggered"
    );
    Some(WarpEvent {
        warp: warp.clone(),
        kind,
    })
}

/// Classifies a warp relative to the location it was triggered in.
#[must_use]
pub fn classify(warp: &Warp, current: &LocationId) -> WarpKind {
    if &warp.destination_location == current {
        WarpKind::Teleport
    } else {
        WarpKind::Transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warp(origin: (i32, i32), destination: (i32, i32), location: &str) -> Warp {
        Warp {
            origin: PixelPosition::new(origin.0, origin.1),
            destination: PixelPosition::new(destination.0, destination.1),
            destination_location: LocationId::new(location),
        }
    }

    #[test]
    fn no_warp_under_player_resolves_to_none() {
        let warps = [warp((40, 40), (8, 8), "town")];
        let current = LocationId::new("world");
        assert_eq!(resolve(PixelPosition::new(32, 40), &warps, &current), None);
        assert_eq!(resolve(PixelPosition::new(0, 0), &[], &current), None);
    }

    #[test]
    fn other_location_is_a_transition() {
        let warps = [warp((40, 40), (8, 8), "town")];
        let event = resolve(PixelPosition::new(40, 40), &warps, &LocationId::new("world"))
            .expect("warp triggers");
        assert_eq!(event.kind, WarpKind::Transition);
        assert_eq!(event.warp.destination, PixelPosition::new(8, 8));
    }

    #[test]
    fn same_location_is_a_teleport() {
        let warps = [warp((16, 0), (48, 32), "world")];
        let event = resolve(PixelPosition::new(16, 0), &warps, &LocationId::new("world"))
            .expect("warp triggers");
        assert_eq!(event.kind, WarpKind::Teleport);
    }

    #[test]
    fn first_warp_in_list_order_wins_a_shared_origin() {
        let warps = [
            warp((8, 8), (0, 0), "cave"),
            warp((8, 8), (16, 16), "town"),
        ];
        let event = resolve(PixelPosition::new(8, 8), &warps, &LocationId::new("world"))
            .expect("warp triggers");
        assert_eq!(event.warp.destination_location, LocationId::new("cave"));
    }
}
