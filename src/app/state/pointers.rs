//! Registry der getrackten Pointer (ein Pointer pro Gerät).

use indexmap::IndexMap;

use crate::core::{DeviceId, Pointer, PointerSample};

/// Ergebnis eines Tick-Syncs mit dem PointerSource.
#[derive(Debug, Default)]
pub struct PointerSyncResult {
    /// Neu aufgetauchte Geräte
    pub added: Vec<DeviceId>,
    /// In diesem Tick deaktivierte Geräte (Tracking verloren)
    pub deactivated: Vec<DeviceId>,
}

/// Hält alle bekannten Pointer in Einfüge-Reihenfolge.
///
/// Die Reihenfolge ist Teil des Determinismus-Vertrags: alle
/// Tick-Phasen iterieren Pointer in dieser Reihenfolge.
#[derive(Default)]
pub struct PointerRegistry {
    pointers: IndexMap<DeviceId, Pointer>,
}

impl PointerRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Übernimmt die Samples eines Ticks.
    ///
    /// Nicht gemeldete Geräte werden deaktiviert (nicht entfernt), damit
    /// ihr Zustand bei Tracking-Rückkehr erhalten bleibt. Samples ohne
    /// Reichweite erhalten `fallback_reach`.
    pub fn sync(&mut self, samples: &[PointerSample], fallback_reach: f32) -> PointerSyncResult {
        let mut result = PointerSyncResult::default();
        let mut reported: Vec<DeviceId> = Vec::with_capacity(samples.len());

        for sample in samples {
            let mut sample = *sample;
            if sample.reach <= 0.0 {
                sample.reach = fallback_reach;
            }
            reported.push(sample.device);

            match self.pointers.get_mut(&sample.device) {
                Some(pointer) => {
                    if !pointer.active {
                        result.added.push(sample.device);
                    }
                    pointer.apply_sample(&sample);
                }
                None => {
                    self.pointers
                        .insert(sample.device, Pointer::from_sample(&sample));
                    result.added.push(sample.device);
                }
            }
        }

        for (device, pointer) in self.pointers.iter_mut() {
            if pointer.active && !reported.contains(device) {
                pointer.active = false;
                pointer.select_down = false;
                pointer.select_pressed = false;
                pointer.select_released = false;
                pointer.hover = None;
                pointer.dragging = false;
                result.deactivated.push(*device);
            }
        }

        result
    }

    /// Pointer eines Geräts.
    pub fn get(&self, device: DeviceId) -> Option<&Pointer> {
        self.pointers.get(&device)
    }

    /// Mutabler Pointer eines Geräts.
    pub fn get_mut(&mut self, device: DeviceId) -> Option<&mut Pointer> {
        self.pointers.get_mut(&device)
    }

    /// Alle aktiven Pointer in Einfüge-Reihenfolge.
    pub fn active(&self) -> impl Iterator<Item = &Pointer> {
        self.pointers.values().filter(|p| p.active)
    }

    /// Geräte-IDs aller aktiven Pointer in Einfüge-Reihenfolge.
    pub fn active_devices(&self) -> Vec<DeviceId> {
        self.active().map(|p| p.device).collect()
    }

    /// Alle bekannten Geräte (auch inaktive) in Einfüge-Reihenfolge.
    pub fn known_devices(&self) -> Vec<DeviceId> {
        self.pointers.keys().copied().collect()
    }

    /// Der andere aktive Pointer (Zwei-Pointer-Gesten).
    pub fn other_active(&self, device: DeviceId) -> Option<&Pointer> {
        self.active().find(|p| p.device != device)
    }

    /// Anzahl bekannter Pointer.
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Keine Pointer bekannt?
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }
}
