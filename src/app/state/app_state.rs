//! Aggregierter Koordinator-Zustand.

use crate::app::nested::NestedSpaceState;
use crate::app::tools::ToolStackManager;
use crate::app::visibility::{MenuHideFlags, MenuKind, VisibilityState};
use crate::app::CommandLog;
use crate::core::{DeviceId, EntityHandle};
use crate::shared::CoordinatorOptions;

use super::{AvatarState, GrabRegistry, PointerRegistry};

/// Gesamtzustand des Koordinators.
///
/// Wird ausschließlich aus dem Tick bzw. über den [`crate::Coordinator`]
/// mutiert; alle Felder sind für Abfragen des Hosts öffentlich.
pub struct CoordinatorState {
    /// Getrackte Pointer
    pub pointers: PointerRegistry,
    /// Tool-Stacks pro Gerät
    pub tools: ToolStackManager,
    /// Gehaltene Entities
    pub grab: GrabRegistry,
    /// Pocket-Welten, Schatten-Pointer, Previews
    pub nested: NestedSpaceState,
    /// Menü-Sichtbarkeit
    pub visibility: VisibilityState,
    /// Avatar-Sonderfall und Blickpunkt
    pub avatar: AvatarState,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: CoordinatorOptions,
    /// Zeitpunkt des letzten Ticks (Sekunden)
    pub time: f64,
}

impl CoordinatorState {
    /// Erstellt einen neuen, leeren Zustand.
    pub fn new() -> Self {
        Self {
            pointers: PointerRegistry::new(),
            tools: ToolStackManager::new(),
            grab: GrabRegistry::new(),
            nested: NestedSpaceState::new(),
            visibility: VisibilityState::new(),
            avatar: AvatarState::new(),
            command_log: CommandLog::new(),
            options: CoordinatorOptions::default(),
            time: 0.0,
        }
    }

    /// Alle von einem Gerät gehaltenen Entities (Welt + alle Pockets).
    pub fn held_objects(&self, device: DeviceId) -> Vec<EntityHandle> {
        self.grab.held_by_device(device)
    }

    /// Hovert der Pointer des Geräts gerade über einer Entity?
    pub fn is_hovering(&self, device: DeviceId) -> bool {
        self.pointers
            .get(device)
            .is_some_and(|pointer| pointer.is_hovering())
    }

    /// Aktuelles Hide-Bitset eines (Gerät, Menü)-Paars.
    pub fn menu_hide_flags(&self, device: DeviceId, menu: MenuKind) -> Option<MenuHideFlags> {
        self.visibility.menu(device, menu).map(|state| state.flags)
    }

    /// Debounced sichtbarer Zustand eines Menüs.
    pub fn is_menu_visible(&self, device: DeviceId, menu: MenuKind) -> bool {
        self.visibility
            .menu(device, menu)
            .is_some_and(|state| state.is_visible())
    }
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self::new()
    }
}
