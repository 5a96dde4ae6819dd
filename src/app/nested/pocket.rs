//! Pocket-Welt: Miniatur-Ansicht der Szene mit eigener Skalierung.

use glam::Vec3;

use crate::core::{Aabb, EntityHandle, Pose};

/// Eindeutige Kennung einer Pocket-Welt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PocketId(pub u64);

/// Eine verschachtelte Miniatur-Ansicht der Full-Scale-Szene.
///
/// `world_pose` platziert die Miniatur in der Szene (inkl. Maßstab),
/// `reference_pose` ist der Ursprung des gespiegelten Full-Scale-Bereichs.
/// Ein Punkt `q` auf der Miniatur entspricht dem Full-Scale-Punkt
/// `reference_pose(world_pose⁻¹(q))`.
#[derive(Debug, Clone)]
pub struct PocketWorld {
    /// Kennung der Welt
    pub id: PocketId,
    /// Platzierung der Miniatur in der Full-Scale-Szene
    pub world_pose: Pose,
    /// Ursprung des gespiegelten Full-Scale-Bereichs
    pub reference_pose: Pose,
    /// Containment-Volumen in Pocket-lokalen Koordinaten
    pub volume: Aabb,
    /// Vom eigenen Rendering ausgeschlossene Entities (Rekursionsschutz)
    pub excluded: Vec<EntityHandle>,
}

impl PocketWorld {
    /// Uniformer Maßstab der Miniatur.
    pub fn scale(&self) -> f32 {
        self.world_pose.scale
    }

    /// Liegt ein Weltpunkt im Containment-Volumen der Miniatur?
    ///
    /// Bei degeneriertem Maßstab (unter `epsilon`) wird kein Urteil
    /// gefällt — der Aufrufer behält den letzten Containment-Zustand.
    pub fn contains_world_point(&self, point: Vec3, epsilon: f32) -> Option<bool> {
        if self.world_pose.scale.abs() < epsilon {
            return None;
        }
        let local = self.world_pose.inverse().transform_point(point);
        if !local.is_finite() {
            return None;
        }
        Some(self.volume.contains(local))
    }

    /// Schatten-Pose: reale Pointer-Pose im Referenzraum der Pocket.
    ///
    /// `shadow = reference_pose ∘ world_pose⁻¹ ∘ real` — skaliert mit dem
    /// Kehrwert des Miniatur-Maßstabs. `None` bei degeneriertem Maßstab
    /// oder nicht-finitem Ergebnis (Update wird für den Tick übersprungen).
    pub fn shadow_pose(&self, real: &Pose, epsilon: f32) -> Option<Pose> {
        if self.world_pose.scale.abs() < epsilon {
            return None;
        }
        let pose = self
            .reference_pose
            .compose(&self.world_pose.inverse())
            .compose(real);
        pose.is_finite().then_some(pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn miniature() -> PocketWorld {
        // 1:10-Miniatur bei (5, 1, 0), spiegelt den Bereich um (100, 0, 0).
        PocketWorld {
            id: PocketId(1),
            world_pose: Pose::new(Vec3::new(5.0, 1.0, 0.0), glam::Quat::IDENTITY, 0.1),
            reference_pose: Pose::from_position(Vec3::new(100.0, 0.0, 0.0)),
            volume: Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE),
            excluded: vec![EntityHandle(77)],
        }
    }

    #[test]
    fn containment_maps_world_to_pocket_local() {
        let pocket = miniature();

        // Miniatur-Zentrum: enthalten. Volumen ist ±1 lokal = ±0.1 Welt.
        assert_eq!(
            pocket.contains_world_point(Vec3::new(5.0, 1.0, 0.0), 1e-6),
            Some(true)
        );
        assert_eq!(
            pocket.contains_world_point(Vec3::new(5.05, 1.0, 0.0), 1e-6),
            Some(true)
        );
        assert_eq!(
            pocket.contains_world_point(Vec3::new(5.2, 1.0, 0.0), 1e-6),
            Some(false)
        );
    }

    #[test]
    fn degenerate_scale_gives_no_verdict() {
        let mut pocket = miniature();
        pocket.world_pose.scale = 0.0;

        assert_eq!(pocket.contains_world_point(Vec3::ZERO, 1e-6), None);
        assert!(pocket.shadow_pose(&Pose::IDENTITY, 1e-6).is_none());
    }

    #[test]
    fn shadow_pose_scales_by_inverse_miniature_scale() {
        let pocket = miniature();
        let real = Pose::from_position(Vec3::new(5.0, 1.0, 0.0));

        let shadow = pocket.shadow_pose(&real, 1e-6).expect("finite Pose");

        // Pointer am Miniatur-Zentrum → Schatten am Referenz-Ursprung,
        // Maßstab 1/0.1 = 10.
        assert_abs_diff_eq!(shadow.position.x, 100.0, epsilon = 1e-4);
        assert_abs_diff_eq!(shadow.position.y, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(shadow.scale, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn shadow_pose_tracks_offsets_within_miniature() {
        let pocket = miniature();
        // 0.05 Welt rechts vom Miniatur-Zentrum = 0.5 lokal = 5.0 im Referenzraum.
        let real = Pose::from_position(Vec3::new(5.05, 1.0, 0.0));

        let shadow = pocket.shadow_pose(&real, 1e-6).expect("finite Pose");

        assert_abs_diff_eq!(shadow.position.x, 105.0, epsilon = 1e-3);
    }
}
