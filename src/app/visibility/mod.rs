//! Menü-Sichtbarkeits-System: Bitflag-Arbitrierung pro (Pointer, Menü).

/// Pro-Tick-Arbitrierung der Hide-Flags.
pub mod arbitration;
/// Hide-Flag-Bitset und Debounce-Zustand.
pub mod hide_flags;

pub use hide_flags::{MenuHideFlags, MenuHideState};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Aabb, DeviceId, MenuHandle};

/// Kontextmenü-Arten pro Pointer, mit fester Priorität.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    /// Radiales Tool-Menü am Pointer
    ToolRing,
    /// Kontextabhängige Aktionen zur aktuellen Selektion
    ContextActions,
    /// Eigenschafts-Inspector der gehoverten Entity
    Inspector,
}

impl MenuKind {
    /// Alle Arten, absteigend nach Priorität sortiert.
    pub const ALL: [MenuKind; 3] = [
        MenuKind::ToolRing,
        MenuKind::ContextActions,
        MenuKind::Inspector,
    ];

    /// Priorität bei der Kandidaten-Auswahl (höher gewinnt).
    pub fn priority(self) -> u8 {
        match self {
            MenuKind::ToolRing => 3,
            MenuKind::ContextActions => 2,
            MenuKind::Inspector => 1,
        }
    }
}

/// Erzeugt Menüs und liefert deren Welt-Bounds für die Occlusion-Prüfung.
pub trait MenuFactory {
    /// Spawnt ein Menü für einen Pointer.
    fn spawn(&mut self, kind: MenuKind, device: DeviceId) -> MenuHandle;

    /// Zerstört ein Menü.
    fn destroy(&mut self, handle: MenuHandle);

    /// Welt-Bounding-Box eines Menüs (None = unbekannt).
    fn menu_bounds(&self, handle: MenuHandle) -> Option<Aabb>;
}

/// Zustand der Menü-Sichtbarkeit über alle Pointer.
#[derive(Default)]
pub struct VisibilityState {
    /// Hide-Zustand pro (Gerät, Menü-Art)
    pub menus: IndexMap<(DeviceId, MenuKind), MenuHideState>,
    /// Hindernis-Volumina für die Occlusion-Prüfung
    pub obstacles: Vec<Aabb>,
    /// Workspace-Volumen (Overlap setzt ein eigenes Hide-Bit)
    pub workspace: Option<Aabb>,
}

impl VisibilityState {
    /// Erstellt einen leeren Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Legt die Menü-Zustände eines neuen Geräts an (explizit verborgen).
    /// Mit Factory werden die Menüs sofort gespawnt.
    pub fn ensure_menus_for_device(
        &mut self,
        device: DeviceId,
        now: f64,
        factory: Option<&mut dyn MenuFactory>,
    ) {
        let mut factory = factory;
        for kind in MenuKind::ALL {
            if self.menus.contains_key(&(device, kind)) {
                continue;
            }
            let handle = factory.as_deref_mut().map(|f| f.spawn(kind, device));
            self.menus
                .insert((device, kind), MenuHideState::new(now, handle));
        }
    }

    /// Hide-Zustand eines (Gerät, Menü)-Paars.
    pub fn menu(&self, device: DeviceId, kind: MenuKind) -> Option<&MenuHideState> {
        self.menus.get(&(device, kind))
    }

    /// Mutabler Hide-Zustand eines (Gerät, Menü)-Paars.
    pub fn menu_mut(&mut self, device: DeviceId, kind: MenuKind) -> Option<&mut MenuHideState> {
        self.menus.get_mut(&(device, kind))
    }

    /// Verbirgt ein Menü für den laufenden Tick (das TEMPORARY-Bit wird
    /// zu Beginn der nächsten Arbitrierung wieder gelöscht).
    pub fn hide_temporarily(&mut self, device: DeviceId, kind: MenuKind, now: f64) {
        if let Some(state) = self.menus.get_mut(&(device, kind)) {
            state.set(MenuHideFlags::TEMPORARY, now);
        }
    }

    /// Ersetzt die Hindernis-Volumina.
    pub fn set_obstacles(&mut self, obstacles: Vec<Aabb>) {
        self.obstacles = obstacles;
    }

    /// Setzt oder entfernt das Workspace-Volumen.
    pub fn set_workspace(&mut self, workspace: Option<Aabb>) {
        self.workspace = workspace;
    }
}
