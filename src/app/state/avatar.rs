//! Avatar-Sonderfall: Blickpunkt-Umpositionierung nach Avatar-Drop.

use crate::core::{EntityHandle, Pose};

/// Zeitbegrenzte, linear interpolierte Blickpunkt-Umpositionierung.
///
/// Explizites Zustandsobjekt statt Coroutine: wird einmal pro Tick vom
/// Koordinator fortgeschrieben und nur durch einen neuen Glide abgelöst.
#[derive(Debug, Clone, Copy)]
pub struct ViewpointGlide {
    /// Ausgangspose des Blickpunkts
    pub start: Pose,
    /// Zielpose des Blickpunkts
    pub target: Pose,
    /// Startzeitpunkt (Sekunden)
    pub start_time: f64,
    /// Dauer (Sekunden)
    pub duration: f64,
}

impl ViewpointGlide {
    /// Interpolierte Pose zum Zeitpunkt `now` plus Fertig-Flag.
    pub fn sample(&self, now: f64) -> (Pose, bool) {
        if self.duration <= 0.0 {
            return (self.target, true);
        }
        let t = ((now - self.start_time) / self.duration).clamp(0.0, 1.0);
        (self.start.lerp(&self.target, t as f32), t >= 1.0)
    }
}

/// Zustand rund um die Avatar-Repräsentation des Nutzers.
pub struct AvatarState {
    /// Als Avatar markierte Entity
    pub entity: Option<EntityHandle>,
    /// Ursprünglicher Parent des Avatars (für Reattach nach dem Drop)
    pub original_parent: Option<EntityHandle>,
    /// Aktueller Blickpunkt des Nutzers (vom Host gelesen)
    pub viewpoint_pose: Pose,
    /// Laufende Umpositionierung, falls vorhanden
    pub glide: Option<ViewpointGlide>,
}

impl AvatarState {
    /// Erstellt einen leeren Avatar-Zustand.
    pub fn new() -> Self {
        Self {
            entity: None,
            original_parent: None,
            viewpoint_pose: Pose::IDENTITY,
            glide: None,
        }
    }

    /// Ist die Entity der registrierte Avatar?
    pub fn is_avatar(&self, entity: EntityHandle) -> bool {
        self.entity == Some(entity)
    }

    /// Startet eine neue Umpositionierung; eine laufende wird abgelöst.
    pub fn begin_glide(&mut self, target: Pose, now: f64, duration: f64) {
        self.glide = Some(ViewpointGlide {
            start: self.viewpoint_pose,
            target,
            start_time: now,
            duration,
        });
    }

    /// Schreibt einen laufenden Glide fort.
    /// Gibt `true` zurück, solange sich der Blickpunkt noch bewegt.
    pub fn advance(&mut self, now: f64) -> bool {
        let Some(glide) = self.glide else {
            return false;
        };
        let (pose, finished) = glide.sample(now);
        self.viewpoint_pose = pose;
        if finished {
            self.glide = None;
        }
        !finished
    }
}

impl Default for AvatarState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn glide_interpolates_linearly_and_finishes() {
        let mut avatar = AvatarState::new();
        avatar.begin_glide(Pose::from_position(Vec3::new(10.0, 0.0, 0.0)), 1.0, 2.0);

        assert!(avatar.advance(2.0));
        assert!((avatar.viewpoint_pose.position.x - 5.0).abs() < 1e-5);

        assert!(!avatar.advance(3.0));
        assert_eq!(avatar.viewpoint_pose.position.x, 10.0);
        assert!(avatar.glide.is_none());
    }

    #[test]
    fn new_glide_supersedes_running_one() {
        let mut avatar = AvatarState::new();
        avatar.begin_glide(Pose::from_position(Vec3::new(10.0, 0.0, 0.0)), 0.0, 10.0);
        avatar.advance(5.0);

        avatar.begin_glide(Pose::from_position(Vec3::ZERO), 5.0, 1.0);
        avatar.advance(6.0);

        assert!(avatar.viewpoint_pose.position.x.abs() < 1e-5);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let mut avatar = AvatarState::new();
        avatar.begin_glide(Pose::from_position(Vec3::ONE), 0.0, 0.0);

        assert!(!avatar.advance(0.0));
        assert_eq!(avatar.viewpoint_pose.position, Vec3::ONE);
    }
}
