//! Tick-Reconcile des Nested-Space-Systems.
//!
//! Pro Tick und in deterministischer Pointer-dann-Pocket-Reihenfolge:
//! Schatten-Posen neu ableiten, Containment-Übergänge erkennen, gehaltene
//! Entities über Raumgrenzen transferieren (inkl. Preview-Modus) und die
//! Full-Scale-Posen aller gehaltenen Entities fortschreiben.

use glam::Vec3;

use crate::app::state::{AvatarState, GrabOwner, GrabRegistry, HeldEntity, PointerRegistry};
use crate::core::{Aabb, DeviceId, Pointer, Pose, SceneEntityOps};
use crate::shared::CoordinatorOptions;

use super::preview::{preview_factor, PreviewEntity, PreviewRecord};
use super::{NestedSpaceState, PocketId};

/// Gleicht einen Halteversatz auf eine andere Pointer-Reichweite ab,
/// damit beim Transfer kein visueller Sprung relativ zur Spitze entsteht.
pub(crate) fn reach_adjusted(held: &HeldEntity, from_reach: f32, to_reach: f32) -> HeldEntity {
    HeldEntity {
        offset: Pose {
            position: held.offset.position + Vec3::NEG_Z * (to_reach - from_reach),
            ..held.offset
        },
    }
}

/// Führt den Nested-Space-Abgleich für einen Tick aus.
pub fn reconcile(
    pointers: &PointerRegistry,
    nested: &mut NestedSpaceState,
    grab: &mut GrabRegistry,
    avatar: &AvatarState,
    scene: &mut dyn SceneEntityOps,
    options: &CoordinatorOptions,
) {
    for pointer in pointers.active() {
        let device = pointer.device;

        let (entered, exited) = update_shadows(pointer, nested, options);
        maintain_drag_origin(pointer, nested, grab);

        for pocket in &exited {
            handle_exit(pointer, *pocket, nested, grab, scene, options);
        }
        for pocket in &entered {
            handle_enter(pointer, *pocket, nested, grab, scene);
        }

        if pointer.select_released {
            handle_release(pointer, nested, avatar, scene, options);
            nested.set_drag_from_outside(device, false);
        }

        drive_held_poses(pointer, nested, grab, scene);
    }
}

/// Schritt 1+2: Schatten-Posen neu ableiten und Containment togglen.
///
/// Degenerierte Skalierung oder nicht-finite Ergebnisse überspringen das
/// Update für diesen Tick; der Containment-Zustand ändert sich dann nicht
/// (er folgt nur Pointer-Bewegung oder Pocket-Zerstörung).
fn update_shadows(
    pointer: &Pointer,
    nested: &mut NestedSpaceState,
    options: &CoordinatorOptions,
) -> (Vec<PocketId>, Vec<PocketId>) {
    let device = pointer.device;
    let tip = pointer.tip();
    let epsilon = options.degenerate_scale_epsilon;
    let mut entered = Vec::new();
    let mut exited = Vec::new();

    let NestedSpaceState {
        pockets, shadows, ..
    } = nested;

    for (pocket_id, pocket) in pockets.iter() {
        let Some(shadow) = shadows.get_mut(&(device, *pocket_id)) else {
            continue;
        };

        match pocket.shadow_pose(&pointer.pose, epsilon) {
            Some(pose) => {
                shadow.pose = pose;
                shadow.reach = pointer.reach;
            }
            None => {
                log::debug!(
                    "Schatten-Update für {:?}/{:?} übersprungen: degenerierte Skalierung",
                    device,
                    pocket_id
                );
                continue;
            }
        }

        let Some(contained) = pocket.contains_world_point(tip, epsilon) else {
            continue;
        };
        shadow.was_contained = shadow.is_contained;
        shadow.is_contained = contained;
        shadow.enabled = contained;

        if shadow.just_entered() {
            entered.push(*pocket_id);
        } else if shadow.just_exited() {
            exited.push(*pocket_id);
        }
    }

    (entered, exited)
}

/// Pflegt das Drag-Origin-Flag.
///
/// Gesetzt, wenn ein Drag außerhalb aller Pockets beginnt und dabei kein
/// Carry läuft (nichts gehalten wird): reine Manipulations-Drags sollen
/// beim Eintauchen in eine Miniatur keinen Transfer auslösen, getragene
/// Entities dagegen schon.
fn maintain_drag_origin(pointer: &Pointer, nested: &mut NestedSpaceState, grab: &GrabRegistry) {
    if !pointer.select_pressed {
        return;
    }
    let device = pointer.device;
    let was_outside = !nested
        .shadows
        .iter()
        .any(|((d, _), shadow)| *d == device && shadow.was_contained);
    let flag = was_outside && !grab.device_holds_any(device);
    nested.set_drag_from_outside(device, flag);
}

/// Austritt eines Schattens aus seiner Pocket.
fn handle_exit(
    pointer: &Pointer,
    pocket: PocketId,
    nested: &mut NestedSpaceState,
    grab: &mut GrabRegistry,
    scene: &mut dyn SceneEntityOps,
    options: &CoordinatorOptions,
) {
    let device = pointer.device;
    let owner = GrabOwner::Pocket(device, pocket);
    if !grab.holds_any(owner) {
        return;
    }

    // Multi-Pocket-Contention: nimmt eine andere Pocket den Pointer gerade
    // auf, wandert das Set direkt Schatten → Schatten statt über die
    // Full-Scale-Szene (erste enthaltende Pocket in Einfüge-Reihenfolge).
    if let Some(target) = nested.containing_pocket(device) {
        let from_reach = nested.shadow(device, pocket).map_or(0.0, |s| s.reach);
        let to_reach = nested.shadow(device, target).map_or(from_reach, |s| s.reach);
        let moved = grab.transfer_with(owner, GrabOwner::Pocket(device, target), |held| {
            reach_adjusted(held, from_reach, to_reach)
        });
        log::debug!(
            "Direkter Schatten-Transfer {:?} → {:?}: {} Entities",
            pocket,
            target,
            moved.len()
        );
        return;
    }

    enter_preview(pointer, pocket, nested, grab, scene, options);
}

/// Eintritt eines Schattens in seine Pocket.
fn handle_enter(
    pointer: &Pointer,
    pocket: PocketId,
    nested: &mut NestedSpaceState,
    grab: &mut GrabRegistry,
    scene: &mut dyn SceneEntityOps,
) {
    let device = pointer.device;

    // Rückkehr in die Ursprungs-Pocket beendet den Preview-Modus. Fällt
    // der Release in denselben Tick, werden die Entities abgelegt statt
    // neu gegriffen.
    if nested
        .previews
        .get(&device)
        .is_some_and(|record| record.from_pocket == pocket)
    {
        if pointer.select_released {
            drop_preview_into_pocket(device, pocket, nested, scene);
        } else {
            restore_preview(device, pocket, nested, grab, scene);
        }
        return;
    }

    let world_owner = GrabOwner::World(device);
    if !grab.holds_any(world_owner) {
        return;
    }
    if pointer.dragging && nested.drag_from_outside(device) {
        // Manipulations-Drag von außen: Set bleibt beim realen Pointer.
        return;
    }

    let to_reach = nested
        .shadow(device, pocket)
        .map_or(pointer.reach, |s| s.reach);
    let from_reach = pointer.reach;
    let moved = grab.transfer_with(world_owner, GrabOwner::Pocket(device, pocket), |held| {
        reach_adjusted(held, from_reach, to_reach)
    });
    if !moved.is_empty() {
        log::debug!(
            "Transfer real → Schatten {:?}: {} Entities",
            pocket,
            moved.len()
        );
    }
}

/// Schaltet das gehaltene Set eines austretenden Schattens in den
/// Preview-Modus: uniform verkleinert, vom Grab-Tracking abgemeldet und
/// auf einem separaten Track am realen Pointer verankert.
fn enter_preview(
    pointer: &Pointer,
    pocket: PocketId,
    nested: &mut NestedSpaceState,
    grab: &mut GrabRegistry,
    scene: &mut dyn SceneEntityOps,
    options: &CoordinatorOptions,
) {
    let device = pointer.device;
    let owner = GrabOwner::Pocket(device, pocket);
    let shadow_scale = nested.shadow(device, pocket).map_or(1.0, |s| s.pose.scale);

    let dropped = grab.drop_all(owner);
    if dropped.is_empty() {
        return;
    }

    let mut combined: Option<Aabb> = None;
    for (entity, _) in &dropped {
        if let Some(bounds) = scene.entity_bounds(*entity) {
            if !bounds.is_degenerate() {
                combined = Some(match combined {
                    Some(c) => c.union(&bounds),
                    None => bounds,
                });
            }
        }
    }
    let factor = preview_factor(combined, options.preview_max_extent);
    // Versatz-Multiplikator: Full-Scale-Faktor mal Schatten-Maßstab ergibt
    // den Pointer-lokalen Preview-Maßstab.
    let offset_factor = factor * shadow_scale;

    let mut entities = Vec::with_capacity(dropped.len());
    for (entity, held) in dropped {
        let original_scale = scene.entity_scale(entity).unwrap_or(Vec3::ONE);
        scene.set_scale(entity, original_scale * factor);
        scene.set_grab_suspended(entity, true);
        entities.push(PreviewEntity {
            handle: entity,
            original_scale,
            offset: held.offset,
            preview_offset: held.offset.scaled_by(offset_factor),
        });
    }

    log::info!(
        "Preview-Modus für {:?} aus {:?}: {} Entities, Faktor {:.4}",
        device,
        pocket,
        entities.len(),
        factor
    );
    nested.previews.insert(
        device,
        PreviewRecord {
            from_pocket: pocket,
            entities,
            factor,
        },
    );
}

/// Beendet den Preview-Modus bei Rückkehr in die Ursprungs-Pocket:
/// exakte Vor-Preview-Skalierung wiederherstellen und das Set wieder
/// voll besitz-getrackt beim Schatten registrieren.
fn restore_preview(
    device: DeviceId,
    pocket: PocketId,
    nested: &mut NestedSpaceState,
    grab: &mut GrabRegistry,
    scene: &mut dyn SceneEntityOps,
) {
    let Some(record) = nested.previews.shift_remove(&device) else {
        return;
    };

    let mut entries = Vec::with_capacity(record.entities.len());
    for preview in &record.entities {
        scene.set_scale(preview.handle, preview.original_scale);
        scene.set_grab_suspended(preview.handle, false);
        entries.push((
            preview.handle,
            HeldEntity {
                offset: preview.offset,
            },
        ));
    }
    grab.grab(GrabOwner::Pocket(device, pocket), entries);
    log::info!(
        "Preview beendet: {} Entities zurück in {:?}",
        record.entities.len(),
        pocket
    );
}

/// Legt einen Preview-Datensatz in seiner Ursprungs-Pocket ab: exakte
/// Skalierung zurück, Pose aus der aktuellen Schatten-Ableitung, Grab-
/// Wahrnehmung wieder scharf. Kein erneuter Grab.
fn drop_preview_into_pocket(
    device: DeviceId,
    pocket: PocketId,
    nested: &mut NestedSpaceState,
    scene: &mut dyn SceneEntityOps,
) {
    let Some(record) = nested.previews.shift_remove(&device) else {
        return;
    };
    let shadow_pose = nested
        .shadow(device, pocket)
        .map_or(Pose::IDENTITY, |shadow| shadow.pose);

    for preview in &record.entities {
        scene.set_pose(preview.handle, &shadow_pose.compose(&preview.offset));
        scene.set_scale(preview.handle, preview.original_scale);
        scene.set_grab_suspended(preview.handle, false);
    }
    log::info!(
        "Preview abgelegt: {} Entities in {:?}",
        record.entities.len(),
        pocket
    );
}

/// Release-Behandlung des Preview-Tracks.
///
/// Außerhalb aller Pockets und außerhalb der Körpernahzone werden die
/// Entities final platziert (zurück auf Originalgröße, am Pointer
/// verankert). In der Körpernahzone kehren sie in die Ursprungs-Pocket
/// zurück, sofern diese noch existiert.
fn handle_release(
    pointer: &Pointer,
    nested: &mut NestedSpaceState,
    avatar: &AvatarState,
    scene: &mut dyn SceneEntityOps,
    options: &CoordinatorOptions,
) {
    let device = pointer.device;
    let Some(from_pocket) = nested.previews.get(&device).map(|record| record.from_pocket) else {
        return;
    };

    let outside_all = nested.containing_pocket(device).is_none();
    let in_body_zone = pointer
        .tip()
        .distance(avatar.viewpoint_pose.position)
        <= options.body_zone_radius;
    let origin_alive = nested.pockets.contains_key(&from_pocket);

    if outside_all && in_body_zone && origin_alive {
        // Körpernahzone: Zurücklegen in die Ursprungs-Pocket.
        drop_preview_into_pocket(device, from_pocket, nested, scene);
        return;
    }

    let Some(record) = nested.previews.shift_remove(&device) else {
        return;
    };
    for preview in &record.entities {
        scene.set_pose(preview.handle, &pointer.pose.compose(&preview.preview_offset));
        scene.set_scale(preview.handle, preview.original_scale);
        scene.set_grab_suspended(preview.handle, false);
    }
    log::info!(
        "Preview finalisiert: {} Entities am Pointer platziert",
        record.entities.len()
    );
}

/// Schritt 5: Full-Scale-Posen aller gehaltenen und Preview-Entities aus
/// der jeweiligen Besitzer-Pose fortschreiben — damit Entities in beiden
/// Räumen ohne zweiten Update-Pass korrekt gerendert werden.
fn drive_held_poses(
    pointer: &Pointer,
    nested: &NestedSpaceState,
    grab: &GrabRegistry,
    scene: &mut dyn SceneEntityOps,
) {
    let device = pointer.device;

    if let Some(entries) = grab.entries(GrabOwner::World(device)) {
        for (entity, held) in entries {
            scene.set_pose(*entity, &pointer.pose.compose(&held.offset));
        }
    }

    for pocket_id in nested.pockets.keys() {
        let Some(entries) = grab.entries(GrabOwner::Pocket(device, *pocket_id)) else {
            continue;
        };
        let Some(shadow) = nested.shadow(device, *pocket_id) else {
            continue;
        };
        for (entity, held) in entries {
            scene.set_pose(*entity, &shadow.pose.compose(&held.offset));
        }
    }

    if let Some(record) = nested.previews.get(&device) {
        for preview in &record.entities {
            scene.set_pose(preview.handle, &pointer.pose.compose(&preview.preview_offset));
        }
    }
}
