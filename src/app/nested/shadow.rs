//! Schatten-Pointer: realer Pointer, re-expressed im Raum einer Pocket.

use glam::Vec3;

use crate::app::state::GrabOwner;
use crate::core::{DeviceId, Pose};

use super::PocketId;

/// Synthetischer Pointer pro (Gerät × Pocket-Welt).
///
/// Lebenszyklus folgt der Pocket: erzeugt beim Spawn (für jedes aktive
/// Gerät), synchron zerstört mit der Welt. Pose und Containment werden
/// jeden Tick aus dem realen Pointer abgeleitet; bei degenerierter
/// Pocket-Skalierung bleibt der letzte Zustand stehen.
#[derive(Debug, Clone)]
pub struct ShadowPointer {
    /// Gerät des zugrunde liegenden realen Pointers
    pub device: DeviceId,
    /// Pocket-Welt dieses Schattens
    pub pocket: PocketId,
    /// Abgeleitete Pose im Referenzraum der Pocket
    pub pose: Pose,
    /// Reichweite in lokalen Einheiten (vom realen Pointer übernommen)
    pub reach: f32,
    /// Aktiv, solange die reale Pointer-Spitze in der Pocket steckt
    pub enabled: bool,
    /// Containment-Zustand dieses Ticks
    pub is_contained: bool,
    /// Containment-Zustand des Vortick
    pub was_contained: bool,
    /// Begann der laufende Drag außerhalb aller Pockets?
    pub drag_from_outside: bool,
}

impl ShadowPointer {
    /// Erstellt einen Schatten in Ruhelage.
    pub fn new(device: DeviceId, pocket: PocketId) -> Self {
        Self {
            device,
            pocket,
            pose: Pose::IDENTITY,
            reach: 0.0,
            enabled: false,
            is_contained: false,
            was_contained: false,
            drag_from_outside: false,
        }
    }

    /// Spitze des Schattens im Referenzraum.
    pub fn tip(&self) -> Vec3 {
        self.pose.transform_point(Vec3::NEG_Z * self.reach)
    }

    /// Grab-Besitzer-Identität dieses Schattens.
    pub fn owner(&self) -> GrabOwner {
        GrabOwner::Pocket(self.device, self.pocket)
    }

    /// Containment-Übergang: gerade eingetreten?
    pub fn just_entered(&self) -> bool {
        self.is_contained && !self.was_contained
    }

    /// Containment-Übergang: gerade ausgetreten?
    pub fn just_exited(&self) -> bool {
        !self.is_contained && self.was_contained
    }
}
