//! Handler für den Avatar-Sonderfall.

use crate::app::state::CoordinatorState;
use crate::core::EntityHandle;

/// Führt den SetAvatar-Command aus.
pub fn set_avatar(
    state: &mut CoordinatorState,
    entity: EntityHandle,
    parent: Option<EntityHandle>,
) {
    state.avatar.entity = Some(entity);
    state.avatar.original_parent = parent;
    log::info!("Avatar registriert: {:?} (Parent {:?})", entity, parent);
}

/// Tick-Phase 6: laufende Blickpunkt-Umpositionierung fortschreiben.
pub fn advance_glide(state: &mut CoordinatorState, now: f64) {
    state.avatar.advance(now);
}
