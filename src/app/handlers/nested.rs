//! Handler für Pocket-Welt-Lebenszyklus und den Nested-Space-Abgleich.

use crate::app::coordinator::TickContext;
use crate::app::nested::{transfer, PocketId};
use crate::app::state::{CoordinatorState, GrabOwner};
use crate::core::{Aabb, EntityHandle, Pose};

/// Führt den SpawnPocket-Command aus.
pub fn spawn_pocket(
    state: &mut CoordinatorState,
    world_pose: Pose,
    reference_pose: Pose,
    volume: Aabb,
    excluded: Vec<EntityHandle>,
) -> PocketId {
    let devices = state.pointers.known_devices();
    state
        .nested
        .spawn_pocket(world_pose, reference_pose, volume, excluded, &devices)
}

/// Führt den DestroyPocket-Command aus.
///
/// Schatten-gehaltene Sets kehren vor der Zerstörung zum realen Pointer
/// zurück; die Schatten-Pointer verschwinden synchron mit der Welt, damit
/// kein späterer Transfer sie noch findet.
pub fn destroy_pocket(state: &mut CoordinatorState, pocket: PocketId) {
    for device in state.pointers.known_devices() {
        let owner = GrabOwner::Pocket(device, pocket);
        if !state.grab.holds_any(owner) {
            continue;
        }
        let from_reach = state
            .nested
            .shadow(device, pocket)
            .map_or(0.0, |shadow| shadow.reach);
        let to_reach = state
            .pointers
            .get(device)
            .map_or(from_reach, |pointer| pointer.reach);
        let moved = state
            .grab
            .transfer_with(owner, GrabOwner::World(device), |held| {
                transfer::reach_adjusted(held, from_reach, to_reach)
            });
        log::info!(
            "Pocket {:?} zerstört: {} Entities zurück an {:?}",
            pocket,
            moved.len(),
            device
        );
    }

    state.nested.destroy_pocket(pocket);
}

/// Tick-Phase 4: Nested-Space-Abgleich (Posen, Übergänge, Transfers).
pub fn reconcile(state: &mut CoordinatorState, ctx: &mut TickContext<'_>) {
    let CoordinatorState {
        pointers,
        nested,
        grab,
        avatar,
        options,
        ..
    } = state;
    transfer::reconcile(pointers, nested, grab, avatar, ctx.scene, options);
}
