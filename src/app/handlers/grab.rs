//! Handler für Grab/Drop/Transfer und die Anwendung der Tool-Outputs.

use crate::app::coordinator::TickContext;
use crate::app::state::{CoordinatorState, GrabOwner, HeldEntity};
use crate::app::tools::ToolOutput;
use crate::core::{DeviceId, EntityHandle, Pose};

/// Tick-Phase 3: wendet die gesammelten Tool-Outputs zentral an.
pub fn apply_tool_outputs(
    state: &mut CoordinatorState,
    ctx: &mut TickContext<'_>,
    outputs: Vec<(DeviceId, ToolOutput)>,
    now: f64,
) {
    for (device, output) in outputs {
        for entity in &output.destroy {
            destroy_entity(state, ctx, *entity);
        }
        if !output.grab.is_empty() {
            grab_entities(state, ctx, device, &output.grab);
        }
        if let Some(factor) = output.scale_held {
            apply_scale_held(state, device, factor);
        }
        if let Some(delta) = output.viewpoint_delta {
            state.avatar.viewpoint_pose.position += delta;
        }
        if output.release {
            drop_for_device(state, ctx, device, now);
        }
    }
}

/// Führt den Grab-Command aus (auch für externe Grab-Wünsche).
///
/// Der Besitzer richtet sich nach dem Containment der Pointer-Spitze:
/// steckt sie in einer Pocket, greift deren Schatten-Pointer.
pub fn grab_entities(
    state: &mut CoordinatorState,
    ctx: &mut TickContext<'_>,
    device: DeviceId,
    entities: &[EntityHandle],
) {
    let Some(pointer) = state.pointers.get(device) else {
        return;
    };

    // Frische Containment-Abfrage statt Schatten-Flags: der Grab läuft im
    // Tick vor dem Nested-Space-Abgleich.
    let epsilon = state.options.degenerate_scale_epsilon;
    let (owner, base_pose) = match state.nested.pocket_at_point(pointer.tip(), epsilon) {
        Some(pocket) => {
            let shadow_pose = state
                .nested
                .pockets
                .get(&pocket)
                .and_then(|p| p.shadow_pose(&pointer.pose, epsilon));
            match shadow_pose {
                Some(pose) => (GrabOwner::Pocket(device, pocket), pose),
                None => (GrabOwner::World(device), pointer.pose),
            }
        }
        None => (GrabOwner::World(device), pointer.pose),
    };
    let base_inverse = base_pose.inverse();
    if !base_inverse.is_finite() {
        log::debug!("Grab übersprungen: degenerierte Besitzer-Pose");
        return;
    }

    let mut entries = Vec::with_capacity(entities.len());
    for entity in entities {
        let Some(entity_pose) = ctx.scene.entity_pose(*entity) else {
            log::debug!("Grab von {:?} übersprungen: keine Entity-Pose", entity);
            continue;
        };
        entries.push((
            *entity,
            HeldEntity {
                offset: base_inverse.compose(&entity_pose),
            },
        ));

        if state.avatar.is_avatar(*entity) {
            // Avatar vom normalen Parent lösen, damit fremde
            // Szenen-Transformationen ihn nicht mitbewegen.
            ctx.scene.reparent(*entity, None);
            log::info!("Avatar {:?} gegriffen und detached", entity);
        }
    }
    state.grab.grab(owner, entries);
}

/// Führt den DropHeld-Command aus: lässt das komplette Set eines Geräts
/// fallen (Welt- und alle Schatten-Besitzer).
pub fn drop_for_device(
    state: &mut CoordinatorState,
    ctx: &mut TickContext<'_>,
    device: DeviceId,
    now: f64,
) {
    let owners: Vec<GrabOwner> = state
        .grab
        .owners()
        .into_iter()
        .filter(|owner| owner.device() == device)
        .collect();

    for owner in owners {
        let dropped = state.grab.drop_all(owner);
        for (entity, held) in dropped {
            if state.avatar.is_avatar(entity) {
                handle_avatar_drop(state, ctx, entity, owner, &held, now);
            }
        }
    }
}

/// Avatar-Drop: statt die Entity zu platzieren, gleitet der Blickpunkt
/// des Nutzers zeitbegrenzt zur Drop-Pose; der Avatar kehrt an seinen
/// ursprünglichen Parent zurück.
fn handle_avatar_drop(
    state: &mut CoordinatorState,
    ctx: &mut TickContext<'_>,
    entity: EntityHandle,
    owner: GrabOwner,
    held: &HeldEntity,
    now: f64,
) {
    let base = match owner {
        GrabOwner::World(device) => state
            .pointers
            .get(device)
            .map_or(Pose::IDENTITY, |pointer| pointer.pose),
        GrabOwner::Pocket(device, pocket) => state
            .nested
            .shadow(device, pocket)
            .map_or(Pose::IDENTITY, |shadow| shadow.pose),
    };
    let target = base.compose(&held.offset);

    state
        .avatar
        .begin_glide(target, now, state.options.viewpoint_glide_duration);
    ctx.scene.reparent(entity, state.avatar.original_parent);
    log::info!(
        "Avatar-Drop: Blickpunkt gleitet nach {:?}",
        target.position
    );
}

/// Führt den TransferHeld-Command aus: übergibt das komplette Set eines
/// Geräts atomar an einen anderen Pointer, Versätze werden auf den neuen
/// Besitzer umgerechnet (kein visueller Sprung).
pub fn transfer_held(state: &mut CoordinatorState, from: DeviceId, to: DeviceId) {
    let (Some(from_pointer), Some(to_pointer)) =
        (state.pointers.get(from), state.pointers.get(to))
    else {
        return;
    };
    let from_pose = from_pointer.pose;
    let to_pose = to_pointer.pose;

    let rebase = to_pose.inverse().compose(&from_pose);
    if rebase.is_finite() {
        state
            .grab
            .transfer(GrabOwner::World(from), GrabOwner::World(to), &rebase);
    }

    // Schatten-Sets wandern innerhalb derselben Pocket mit.
    let pocket_ids: Vec<_> = state.nested.pockets.keys().copied().collect();
    for pocket in pocket_ids {
        let from_owner = GrabOwner::Pocket(from, pocket);
        if !state.grab.holds_any(from_owner) {
            continue;
        }
        let (Some(from_shadow), Some(to_shadow)) = (
            state.nested.shadow(from, pocket),
            state.nested.shadow(to, pocket),
        ) else {
            continue;
        };
        let rebase = to_shadow.pose.inverse().compose(&from_shadow.pose);
        if rebase.is_finite() {
            state
                .grab
                .transfer(from_owner, GrabOwner::Pocket(to, pocket), &rebase);
        }
    }
}

/// Skalierungsfaktor des Zweihand-Tools auf alle Halteversätze des
/// Geräts anwenden (wirkt über die kontinuierliche Posen-Ableitung).
fn apply_scale_held(state: &mut CoordinatorState, device: DeviceId, factor: f32) {
    if !factor.is_finite() || factor <= 0.0 {
        return;
    }
    let owners: Vec<GrabOwner> = state
        .grab
        .owners()
        .into_iter()
        .filter(|owner| owner.device() == device)
        .collect();
    for owner in owners {
        state.grab.update_offsets(owner, |held| {
            held.offset.scale *= factor;
        });
    }
}

/// Zerstört eine Entity und räumt alle Verweise auf sie ab.
fn destroy_entity(state: &mut CoordinatorState, ctx: &mut TickContext<'_>, entity: EntityHandle) {
    if let Some(owner) = state.grab.owner_of(entity) {
        state.grab.drop_entities(owner, &[entity]);
    }
    for record in state.nested.previews.values_mut() {
        record.entities.retain(|preview| preview.handle != entity);
    }
    ctx.scene.destroy(entity);
    log::info!("Entity {:?} zerstört", entity);
}
