//! Achsenparallele Bounding-Boxen für Containment- und Überlappungsabfragen.

use glam::Vec3;

/// Achsenparallele 3D-Box (min/max-Ecken).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Untere Ecke
    pub min: Vec3,
    /// Obere Ecke
    pub max: Vec3,
}

impl Aabb {
    /// Erstellt eine Box aus min/max-Ecken.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Erstellt eine Box aus Zentrum und Halbausdehnung.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Mittelpunkt der Box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Liegt der Punkt innerhalb (inklusive Rand)?
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Überlappen sich zwei Boxen?
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Vereinigung zweier Boxen.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Größte Kantenlänge (für Preview-Skalierung).
    pub fn largest_extent(&self) -> f32 {
        let size = self.max - self.min;
        size.x.max(size.y).max(size.z)
    }

    /// Degeneriert: leere oder nicht-finite Ausdehnung.
    pub fn is_degenerate(&self) -> bool {
        !self.min.is_finite()
            || !self.max.is_finite()
            || self.min.x > self.max.x
            || self.min.y > self.max.y
            || self.min.z > self.max.z
    }
}
