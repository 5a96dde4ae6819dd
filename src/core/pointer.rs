//! Pointer: getrackte Eingabequellen mit Pose, Reichweite und Eingabekanten.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::math::Pose;
use super::providers::Intersection;

/// Identität eines physischen Eingabegeräts. Genau ein Pointer pro Gerät.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

/// Rolle/Händigkeit eines Pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointerRole {
    /// Dominante Hand: Selektion und Manipulation
    #[default]
    Primary,
    /// Zweithand: Navigation und Zweihand-Gesten
    Secondary,
}

/// Roh-Sample eines Pointers, einmal pro Tick vom [`super::PointerSource`]
/// geliefert. Eingabekanten (pressed/released) berechnet der Host.
#[derive(Debug, Clone, Copy)]
pub struct PointerSample {
    /// Gerät, zu dem das Sample gehört
    pub device: DeviceId,
    /// Rolle des Geräts
    pub role: PointerRole,
    /// Aktuelle Pose
    pub pose: Pose,
    /// Reichweite der Pointer-Spitze in lokalen Einheiten
    pub reach: f32,
    /// Select-Taste gehalten
    pub select_down: bool,
    /// Select-Taste in diesem Tick gedrückt
    pub select_pressed: bool,
    /// Select-Taste in diesem Tick losgelassen
    pub select_released: bool,
}

/// Ein getrackter Pointer mit aktuellem Eingabe- und Hover-Zustand.
///
/// Wird beim ersten Auftauchen eines Geräts erzeugt und deaktiviert,
/// sobald das Gerät nicht mehr gemeldet wird.
#[derive(Debug, Clone)]
pub struct Pointer {
    /// Besitzendes Gerät
    pub device: DeviceId,
    /// Rolle des Pointers
    pub role: PointerRole,
    /// Aktuelle Pose
    pub pose: Pose,
    /// Reichweite der Spitze in lokalen Einheiten
    pub reach: f32,
    /// Wird das Gerät aktuell getrackt?
    pub active: bool,
    /// Select-Taste gehalten
    pub select_down: bool,
    /// Select-Kante: gedrückt in diesem Tick
    pub select_pressed: bool,
    /// Select-Kante: losgelassen in diesem Tick
    pub select_released: bool,
    /// Letztes Hover-Ergebnis des Intersection-Providers
    pub hover: Option<Intersection>,
    /// Meldet das aktuelle Tool einen laufenden Drag?
    pub dragging: bool,
}

impl Pointer {
    /// Erstellt einen Pointer aus einem ersten Sample.
    pub fn from_sample(sample: &PointerSample) -> Self {
        Self {
            device: sample.device,
            role: sample.role,
            pose: sample.pose,
            reach: sample.reach,
            active: true,
            select_down: sample.select_down,
            select_pressed: sample.select_pressed,
            select_released: sample.select_released,
            hover: None,
            dragging: false,
        }
    }

    /// Übernimmt Pose und Eingabekanten aus einem Tick-Sample.
    pub fn apply_sample(&mut self, sample: &PointerSample) {
        self.pose = sample.pose;
        self.reach = sample.reach;
        self.active = true;
        self.select_down = sample.select_down;
        self.select_pressed = sample.select_pressed;
        self.select_released = sample.select_released;
    }

    /// Weltposition der Pointer-Spitze (Ursprung entlang -Z um `reach` versetzt).
    pub fn tip(&self) -> Vec3 {
        self.pose.transform_point(Vec3::NEG_Z * self.reach)
    }

    /// Hovert der Pointer gerade über einer Entity?
    pub fn is_hovering(&self) -> bool {
        self.hover.as_ref().is_some_and(|hit| hit.entity.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn sample_at(x: f32) -> PointerSample {
        PointerSample {
            device: DeviceId(1),
            role: PointerRole::Primary,
            pose: Pose::from_position(Vec3::new(x, 0.0, 0.0)),
            reach: 0.5,
            select_down: false,
            select_pressed: false,
            select_released: false,
        }
    }

    #[test]
    fn tip_advances_along_forward_axis() {
        let pointer = Pointer::from_sample(&sample_at(2.0));

        assert_eq!(pointer.tip(), Vec3::new(2.0, 0.0, -0.5));
    }

    #[test]
    fn tip_respects_rotation() {
        let mut pointer = Pointer::from_sample(&sample_at(0.0));
        pointer.pose.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        let tip = pointer.tip();
        assert!((tip.x - -0.5).abs() < 1e-6);
        assert!(tip.z.abs() < 1e-6);
    }

    #[test]
    fn apply_sample_updates_edges() {
        let mut pointer = Pointer::from_sample(&sample_at(0.0));
        let mut sample = sample_at(1.0);
        sample.select_pressed = true;
        sample.select_down = true;

        pointer.apply_sample(&sample);

        assert!(pointer.select_pressed);
        assert!(pointer.select_down);
        assert_eq!(pointer.pose.position.x, 1.0);
    }
}
