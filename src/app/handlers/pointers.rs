//! Handler für den Pointer-Lebenszyklus.

use crate::app::coordinator::TickContext;
use crate::app::state::CoordinatorState;
use crate::app::visibility::MenuFactory;

/// Tick-Phase 1: Pointer-Bestand mit dem PointerSource abgleichen.
///
/// Ohne konfigurierte Quelle bleibt der Bestand unverändert (degradiert,
/// kein Fehler). Neue Geräte erhalten Tool-Stack, Schatten-Pointer und
/// Menü-Zustände.
pub fn sync(state: &mut CoordinatorState, ctx: &mut TickContext<'_>, now: f64) {
    let Some(source) = ctx.pointer_source.as_mut() else {
        return;
    };
    let samples = source.enumerate_active_pointers();
    let result = state
        .pointers
        .sync(&samples, state.options.default_pointer_reach);

    for device in result.added {
        let role = state
            .pointers
            .get(device)
            .map(|pointer| pointer.role)
            .unwrap_or_default();
        if let Err(e) = state.tools.ensure_stack(device, role, ctx.tool_factory) {
            log::error!("Tool-Stack für {:?} fehlgeschlagen: {:#}", device, e);
        }
        state.nested.ensure_shadows_for_device(device);
        state
            .visibility
            .ensure_menus_for_device(
                device,
                now,
                ctx.menu_factory.as_deref_mut().map(|f| f as &mut dyn MenuFactory),
            );
        log::info!("Pointer {:?} aktiv ({:?})", device, role);
    }

    for device in result.deactivated {
        log::info!("Pointer {:?} deaktiviert (Tracking verloren)", device);
    }
}
