//! Pro-Tick-Arbitrierung der Menü-Hide-Flags.
//!
//! Reihenfolge pro Tick: TEMPORARY löschen → Prioritäts-Supersede pro
//! Pointer → Occlusion/Workspace-Overlap → DIRECT_SELECTION aus der
//! Grab-Registry (mit Übergabe-Propagation) → Debounce fortschreiben.

use indexmap::IndexSet;

use crate::app::state::{GrabRegistry, PointerRegistry};
use crate::app::tools::{ToolKind, ToolStackManager};
use crate::core::DeviceId;
use crate::shared::CoordinatorOptions;

use super::{MenuFactory, MenuHideFlags, MenuKind, VisibilityState};

/// Führt die Sichtbarkeits-Arbitrierung für einen Tick aus.
pub fn arbitrate(
    visibility: &mut VisibilityState,
    pointers: &PointerRegistry,
    grab: &GrabRegistry,
    tools: &ToolStackManager,
    menu_factory: Option<&dyn MenuFactory>,
    options: &CoordinatorOptions,
    now: f64,
) {
    clear_temporary(visibility, now);
    supersede_by_priority(visibility, now);
    detect_occlusion(visibility, menu_factory, now);
    propagate_direct_selection(visibility, pointers, grab, tools, options, now);

    for state in visibility.menus.values_mut() {
        state.update_visual(
            now,
            options.menu_auto_hide_delay,
            options.menu_auto_show_delay,
        );
    }
}

/// Das TEMPORARY-Bit gilt nur für einen Tick und wird eingangs gelöscht.
fn clear_temporary(visibility: &mut VisibilityState, now: f64) {
    for state in visibility.menus.values_mut() {
        state.clear(MenuHideFlags::TEMPORARY, now);
    }
}

/// Pro Pointer gewinnt das höchstpriorisierte Menü ohne EXPLICIT-Bit;
/// alle übrigen Kandidaten erhalten das SUPERSEDED-Bit.
fn supersede_by_priority(visibility: &mut VisibilityState, now: f64) {
    let devices: IndexSet<DeviceId> = visibility.menus.keys().map(|(d, _)| *d).collect();

    for device in devices {
        let chosen = MenuKind::ALL.into_iter().find(|kind| {
            visibility
                .menu(device, *kind)
                .is_some_and(|state| !state.flags.contains(MenuHideFlags::EXPLICIT))
        });

        for kind in MenuKind::ALL {
            if let Some(state) = visibility.menu_mut(device, kind) {
                state.set_to(MenuHideFlags::SUPERSEDED, chosen != Some(kind), now);
            }
        }
    }
}

/// Setzt OCCLUDED bzw. WORKSPACE_OVERLAP aus Bounding-Volumen-Abfragen.
/// Ohne Factory oder Bounds degradiert die Prüfung zu "inaktiv".
fn detect_occlusion(
    visibility: &mut VisibilityState,
    menu_factory: Option<&dyn MenuFactory>,
    now: f64,
) {
    let Some(factory) = menu_factory else {
        return;
    };

    let obstacles = visibility.obstacles.clone();
    let workspace = visibility.workspace;

    for state in visibility.menus.values_mut() {
        let Some(handle) = state.handle else {
            continue;
        };
        let Some(bounds) = factory.menu_bounds(handle) else {
            state.clear(
                MenuHideFlags::OCCLUDED | MenuHideFlags::WORKSPACE_OVERLAP,
                now,
            );
            continue;
        };
        if bounds.is_degenerate() {
            continue;
        }

        let occluded = obstacles.iter().any(|o| o.overlaps(&bounds));
        state.set_to(MenuHideFlags::OCCLUDED, occluded, now);

        let overlap = workspace.is_some_and(|w| w.overlaps(&bounds));
        state.set_to(MenuHideFlags::WORKSPACE_OVERLAP, overlap, now);
    }
}

/// Überträgt den Halte-Zustand der Grab-Registry in DIRECT_SELECTION.
///
/// Eine haltende Hand setzt das Bit auf allen eigenen Menüs; liegt der
/// andere Pointer in Übergabe-Distanz oder hovert/skaliert er selbst,
/// wird das Bit auf dessen Menüs mitgesetzt (unterdrückt Menü-Chrome
/// während Zweihand-Gesten).
fn propagate_direct_selection(
    visibility: &mut VisibilityState,
    pointers: &PointerRegistry,
    grab: &GrabRegistry,
    tools: &ToolStackManager,
    options: &CoordinatorOptions,
    now: f64,
) {
    let devices: IndexSet<DeviceId> = visibility.menus.keys().map(|(d, _)| *d).collect();

    for device in devices {
        let own_holding = grab.device_holds_any(device);

        let propagated = !own_holding
            && pointers.active().any(|holder| {
                if holder.device == device || !grab.device_holds_any(holder.device) {
                    return false;
                }
                let Some(this) = pointers.get(device) else {
                    return false;
                };
                let within_hand_off = this.active
                    && holder.pose.position.distance(this.pose.position)
                        <= options.hand_off_distance;
                let hovering = this.is_hovering();
                let scaling = tools.current_kind(device) == Some(ToolKind::Scale)
                    && tools.current_dragging(device);
                within_hand_off || hovering || scaling
            });

        let flag = own_holding || propagated;
        for kind in MenuKind::ALL {
            if let Some(state) = visibility.menu_mut(device, kind) {
                state.set_to(MenuHideFlags::DIRECT_SELECTION, flag, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{GrabOwner, HeldEntity};
    use crate::core::{EntityHandle, PointerRole, PointerSample, Pose};
    use glam::Vec3;

    fn sample(id: u32, x: f32) -> PointerSample {
        PointerSample {
            device: DeviceId(id),
            role: PointerRole::Primary,
            pose: Pose::from_position(Vec3::new(x, 0.0, 0.0)),
            reach: 0.2,
            select_down: false,
            select_pressed: false,
            select_released: false,
        }
    }

    fn setup(x2: f32) -> (VisibilityState, PointerRegistry, GrabRegistry, ToolStackManager) {
        let mut visibility = VisibilityState::new();
        let mut pointers = PointerRegistry::new();
        pointers.sync(&[sample(1, 0.0), sample(2, x2)], 0.15);
        visibility.ensure_menus_for_device(DeviceId(1), 0.0, None);
        visibility.ensure_menus_for_device(DeviceId(2), 0.0, None);
        (visibility, pointers, GrabRegistry::new(), ToolStackManager::new())
    }

    #[test]
    fn highest_priority_candidate_supersedes_others() {
        let (mut visibility, pointers, grab, tools) = setup(5.0);
        let options = CoordinatorOptions::default();

        arbitrate(&mut visibility, &pointers, &grab, &tools, None, &options, 1.0);

        let tool_ring = visibility.menu(DeviceId(1), MenuKind::ToolRing).unwrap();
        let inspector = visibility.menu(DeviceId(1), MenuKind::Inspector).unwrap();
        // ToolRing startet explizit verborgen, bleibt aber der gewählte
        // Kandidat; Inspector wird verdrängt.
        assert!(!tool_ring.flags.contains(MenuHideFlags::SUPERSEDED));
        assert!(inspector.flags.contains(MenuHideFlags::SUPERSEDED));
    }

    #[test]
    fn holding_hand_sets_direct_selection_on_own_menus() {
        let (mut visibility, pointers, mut grab, tools) = setup(5.0);
        let options = CoordinatorOptions::default();
        grab.grab(
            GrabOwner::World(DeviceId(1)),
            vec![(EntityHandle(1), HeldEntity { offset: Pose::IDENTITY })],
        );

        arbitrate(&mut visibility, &pointers, &grab, &tools, None, &options, 1.0);

        let own = visibility.menu(DeviceId(1), MenuKind::ToolRing).unwrap();
        let other = visibility.menu(DeviceId(2), MenuKind::ToolRing).unwrap();
        assert!(own.flags.contains(MenuHideFlags::DIRECT_SELECTION));
        // Pointer 2 ist 5m entfernt und hovert nicht: keine Propagation.
        assert!(!other.flags.contains(MenuHideFlags::DIRECT_SELECTION));
    }

    #[test]
    fn direct_selection_propagates_within_hand_off_distance() {
        let (mut visibility, pointers, mut grab, tools) = setup(0.2);
        let options = CoordinatorOptions::default();
        grab.grab(
            GrabOwner::World(DeviceId(1)),
            vec![(EntityHandle(1), HeldEntity { offset: Pose::IDENTITY })],
        );

        arbitrate(&mut visibility, &pointers, &grab, &tools, None, &options, 1.0);

        let other = visibility.menu(DeviceId(2), MenuKind::Inspector).unwrap();
        assert!(other.flags.contains(MenuHideFlags::DIRECT_SELECTION));
    }

    #[test]
    fn dropping_clears_direct_selection() {
        let (mut visibility, pointers, mut grab, tools) = setup(5.0);
        let options = CoordinatorOptions::default();
        grab.grab(
            GrabOwner::World(DeviceId(1)),
            vec![(EntityHandle(1), HeldEntity { offset: Pose::IDENTITY })],
        );
        arbitrate(&mut visibility, &pointers, &grab, &tools, None, &options, 1.0);

        grab.drop_all(GrabOwner::World(DeviceId(1)));
        arbitrate(&mut visibility, &pointers, &grab, &tools, None, &options, 2.0);

        let own = visibility.menu(DeviceId(1), MenuKind::ToolRing).unwrap();
        assert!(!own.flags.contains(MenuHideFlags::DIRECT_SELECTION));
    }
}
