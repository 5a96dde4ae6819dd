//! Posen-Mathematik: Position + Orientierung + uniforme Skalierung.

use glam::{Quat, Vec3};

/// Pose im 3D-Raum mit uniformer Skalierung.
///
/// Die Vorwärtsachse ist -Z im lokalen Raum (Pointer zeigen entlang -Z).
/// Komposition und Inverse bilden zusammen mit der Skalierung eine
/// Ähnlichkeitstransformation — genau das, was die Abbildung zwischen
/// Full-Scale-Szene und Pocket-Welten braucht.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Weltposition
    pub position: Vec3,
    /// Orientierung
    pub rotation: Quat,
    /// Uniformer Skalierungsfaktor
    pub scale: f32,
}

impl Pose {
    /// Identitätspose (Ursprung, keine Rotation, Skalierung 1).
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    /// Erstellt eine Pose aus Position, Rotation und Skalierung.
    pub fn new(position: Vec3, rotation: Quat, scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Erstellt eine unrotierte Pose an einer Position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }

    /// Lokale Vorwärtsrichtung (-Z) in Weltkoordinaten.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Transformiert einen lokalen Punkt in den Elternraum.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (point * self.scale)
    }

    /// Komposition `self ∘ local`: wendet erst `local`, dann `self` an.
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation * (local.position * self.scale),
            rotation: self.rotation * local.rotation,
            scale: self.scale * local.scale,
        }
    }

    /// Inverse Pose. Bei Skalierung nahe null ist das Ergebnis nicht finit;
    /// Aufrufer prüfen mit [`Pose::is_finite`].
    pub fn inverse(&self) -> Pose {
        let inv_scale = 1.0 / self.scale;
        let inv_rotation = self.rotation.inverse();
        Pose {
            position: inv_rotation * (-self.position) * inv_scale,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }

    /// Skaliert Offset-Position und Skalierung um einen Faktor.
    ///
    /// Für Preview-Offsets: bildet einen Halteversatz auf den verkleinerten
    /// Maßstab ab, ohne die Rotation zu verändern.
    pub fn scaled_by(&self, factor: f32) -> Pose {
        Pose {
            position: self.position * factor,
            rotation: self.rotation,
            scale: self.scale * factor,
        }
    }

    /// Prüft alle Komponenten auf endliche Werte.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    /// Lineare Interpolation zwischen zwei Posen (Rotation per Slerp).
    pub fn lerp(&self, target: &Pose, t: f32) -> Pose {
        let t = t.clamp(0.0, 1.0);
        Pose {
            position: self.position.lerp(target.position, t),
            rotation: self.rotation.slerp(target.rotation, t),
            scale: self.scale + (target.scale - self.scale) * t,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
