//! Nested-Space-System: Pocket-Welten, Schatten-Pointer und Objekt-Transfer.
//!
//! Pro (Gerät × Pocket-Welt) existiert ein Schatten-Pointer, dessen Pose
//! jeden Tick aus der realen Pointer-Pose im Koordinatenraum der Pocket
//! neu abgeleitet wird. Der Transfer gehaltener Entities über die
//! Raumgrenze läuft über [`transfer::reconcile`].

/// Pocket-Welt: Miniatur-Ansicht mit eigener Koordinaten-Abbildung.
pub mod pocket;
/// Preview-Datensätze für Entities im Raum-Übergang.
pub mod preview;
/// Schatten-Pointer pro (Gerät × Pocket).
pub mod shadow;
/// Tick-Reconcile: Posen, Containment-Übergänge, Transfers.
pub mod transfer;

pub use pocket::{PocketId, PocketWorld};
pub use preview::{PreviewEntity, PreviewRecord};
pub use shadow::ShadowPointer;

use indexmap::IndexMap;

use crate::core::{Aabb, DeviceId, EntityHandle, Pose};

/// Zustand aller Pocket-Welten, Schatten-Pointer und Previews.
///
/// Alle Maps sind einfüge-geordnet; die Reihenfolge definiert den
/// dokumentierten Tie-Break bei Multi-Pocket-Contention.
#[derive(Default)]
pub struct NestedSpaceState {
    /// Pocket-Welten in Erzeugungs-Reihenfolge
    pub pockets: IndexMap<PocketId, PocketWorld>,
    /// Schatten-Pointer pro (Gerät, Pocket)
    pub shadows: IndexMap<(DeviceId, PocketId), ShadowPointer>,
    /// Aktive Previews pro Gerät
    pub previews: IndexMap<DeviceId, PreviewRecord>,
    next_pocket_id: u64,
}

impl NestedSpaceState {
    /// Erstellt einen leeren Zustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erzeugt eine Pocket-Welt samt Schatten-Pointern für alle Geräte.
    pub fn spawn_pocket(
        &mut self,
        world_pose: Pose,
        reference_pose: Pose,
        volume: Aabb,
        excluded: Vec<EntityHandle>,
        devices: &[DeviceId],
    ) -> PocketId {
        self.next_pocket_id += 1;
        let id = PocketId(self.next_pocket_id);
        self.pockets.insert(
            id,
            PocketWorld {
                id,
                world_pose,
                reference_pose,
                volume,
                excluded,
            },
        );
        for device in devices {
            self.shadows
                .insert((*device, id), ShadowPointer::new(*device, id));
        }
        log::info!("Pocket-Welt {:?} erzeugt ({} Schatten-Pointer)", id, devices.len());
        id
    }

    /// Zerstört eine Pocket-Welt und entfernt synchron alle zugehörigen
    /// Schatten-Pointer. Gibt die Welt zur Disposition zurück.
    pub fn destroy_pocket(&mut self, id: PocketId) -> Option<PocketWorld> {
        let pocket = self.pockets.shift_remove(&id)?;
        self.shadows.retain(|(_, pocket_id), _| *pocket_id != id);
        log::info!("Pocket-Welt {:?} zerstört", id);
        Some(pocket)
    }

    /// Legt fehlende Schatten-Pointer für ein neues Gerät an.
    pub fn ensure_shadows_for_device(&mut self, device: DeviceId) {
        let pocket_ids: Vec<PocketId> = self.pockets.keys().copied().collect();
        for id in pocket_ids {
            self.shadows
                .entry((device, id))
                .or_insert_with(|| ShadowPointer::new(device, id));
        }
    }

    /// Schatten-Pointer eines (Gerät, Pocket)-Paars.
    pub fn shadow(&self, device: DeviceId, pocket: PocketId) -> Option<&ShadowPointer> {
        self.shadows.get(&(device, pocket))
    }

    /// Mutabler Schatten-Pointer eines (Gerät, Pocket)-Paars.
    pub fn shadow_mut(&mut self, device: DeviceId, pocket: PocketId) -> Option<&mut ShadowPointer> {
        self.shadows.get_mut(&(device, pocket))
    }

    /// Erste Pocket (Einfüge-Reihenfolge), deren Volumen den Weltpunkt
    /// enthält — frische geometrische Abfrage, unabhängig vom
    /// Containment-Zustand der Schatten.
    pub fn pocket_at_point(&self, point: glam::Vec3, epsilon: f32) -> Option<PocketId> {
        self.pockets
            .values()
            .find(|pocket| pocket.contains_world_point(point, epsilon) == Some(true))
            .map(|pocket| pocket.id)
    }

    /// Erste Pocket (Einfüge-Reihenfolge), deren Schatten das Gerät
    /// aktuell als enthalten meldet.
    pub fn containing_pocket(&self, device: DeviceId) -> Option<PocketId> {
        self.pockets
            .keys()
            .find(|id| {
                self.shadows
                    .get(&(device, **id))
                    .is_some_and(|s| s.is_contained)
            })
            .copied()
    }

    /// Setzt das Drag-Origin-Flag auf allen Schatten eines Geräts.
    pub fn set_drag_from_outside(&mut self, device: DeviceId, flag: bool) {
        for ((d, _), shadow) in self.shadows.iter_mut() {
            if *d == device {
                shadow.drag_from_outside = flag;
            }
        }
    }

    /// Begann der aktuelle Drag des Geräts außerhalb aller Pockets?
    pub fn drag_from_outside(&self, device: DeviceId) -> bool {
        self.shadows
            .iter()
            .any(|((d, _), shadow)| *d == device && shadow.drag_from_outside)
    }

    /// Anzahl existierender Pocket-Welten.
    pub fn pocket_count(&self) -> usize {
        self.pockets.len()
    }
}
