//! Handler für Menü-Commands und die Sichtbarkeits-Arbitrierung.

use crate::app::coordinator::TickContext;
use crate::app::state::CoordinatorState;
use crate::app::visibility::{arbitration, MenuKind};
use crate::core::{Aabb, DeviceId};

/// Führt den ActivateMenu-Command aus (expliziter Delay-Bypass).
pub fn activate_menu(state: &mut CoordinatorState, device: DeviceId, menu: MenuKind, now: f64) {
    state.visibility.ensure_menus_for_device(device, now, None);
    if let Some(menu_state) = state.visibility.menu_mut(device, menu) {
        menu_state.activate(now);
        log::debug!("Menü {:?}/{:?} explizit aktiviert", device, menu);
    }
}

/// Führt den DismissMenu-Command aus.
pub fn dismiss_menu(state: &mut CoordinatorState, device: DeviceId, menu: MenuKind, now: f64) {
    if let Some(menu_state) = state.visibility.menu_mut(device, menu) {
        menu_state.dismiss(now);
        log::debug!("Menü {:?}/{:?} explizit verborgen", device, menu);
    }
}

/// Ersetzt die Hindernis-Volumina für die Occlusion-Prüfung.
pub fn set_obstacles(state: &mut CoordinatorState, obstacles: Vec<Aabb>) {
    state.visibility.set_obstacles(obstacles);
}

/// Setzt oder entfernt das Workspace-Volumen.
pub fn set_workspace(state: &mut CoordinatorState, volume: Option<Aabb>) {
    state.visibility.set_workspace(volume);
}

/// Tick-Phase 5: Sichtbarkeits-Arbitrierung.
pub fn arbitrate(state: &mut CoordinatorState, ctx: &TickContext<'_>, now: f64) {
    let CoordinatorState {
        pointers,
        tools,
        grab,
        visibility,
        options,
        ..
    } = state;
    arbitration::arbitrate(
        visibility,
        pointers,
        grab,
        tools,
        ctx.menu_factory.as_deref(),
        options,
        now,
    );
}
