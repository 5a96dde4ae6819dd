//! Preview-Datensätze: Entities im Übergang zwischen Pocket und Szene.

use glam::Vec3;

use crate::core::{Aabb, EntityHandle, Pose};

use super::PocketId;

/// Ein Entity auf dem Preview-Track.
///
/// `offset` ist der ursprüngliche Schatten-lokale Halteversatz,
/// `preview_offset` der verkleinerte Versatz relativ zum realen Pointer.
/// Beide bleiben unangetastet gespeichert, damit die Rückkehr in die
/// Ursprungs-Pocket bitgenau den Vorzustand wiederherstellt.
#[derive(Debug, Clone, Copy)]
pub struct PreviewEntity {
    /// Betroffene Entity
    pub handle: EntityHandle,
    /// Skalierung vor dem Preview (exakt wiederhergestellt)
    pub original_scale: Vec3,
    /// Ursprünglicher Halteversatz relativ zum Schatten-Pointer
    pub offset: Pose,
    /// Verkleinerter Versatz relativ zum realen Pointer
    pub preview_offset: Pose,
}

/// Aktiver Preview eines Geräts.
#[derive(Debug, Clone)]
pub struct PreviewRecord {
    /// Pocket, aus der die Entities stammen
    pub from_pocket: PocketId,
    /// Entities auf dem Preview-Track
    pub entities: Vec<PreviewEntity>,
    /// Angewandter uniformer Verkleinerungsfaktor
    pub factor: f32,
}

/// Verkleinerungsfaktor, der die größte Kante der kombinierten Bounds
/// auf `max_extent` abbildet. Degenerierte oder fehlende Bounds ergeben
/// Faktor 1 (kein Urteil über die Größe möglich).
pub fn preview_factor(combined: Option<Aabb>, max_extent: f32) -> f32 {
    let Some(bounds) = combined else {
        return 1.0;
    };
    if bounds.is_degenerate() {
        return 1.0;
    }
    let largest = bounds.largest_extent();
    if largest <= f32::EPSILON {
        return 1.0;
    }
    (max_extent / largest).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_maps_largest_extent_to_max() {
        let bounds = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 0.5));

        let factor = preview_factor(Some(bounds), 0.25);

        assert!((factor - 0.125).abs() < 1e-6);
    }

    #[test]
    fn small_objects_are_not_grown() {
        let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(0.1));

        assert_eq!(preview_factor(Some(bounds), 0.25), 1.0);
    }

    #[test]
    fn degenerate_bounds_give_neutral_factor() {
        assert_eq!(preview_factor(None, 0.25), 1.0);

        let inverted = Aabb::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(preview_factor(Some(inverted), 0.25), 1.0);

        let point = Aabb::new(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(preview_factor(Some(point), 0.25), 1.0);
    }
}
