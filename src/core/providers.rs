//! Kollaborator-Traits: schmale Schnittstellen zu extern gelieferten Diensten.
//!
//! Der Koordinator rechnet selbst keine Ray-Schnitte, pollt keine Geräte und
//! besitzt keine Szene — alles davon kommt über diese Traits herein. Fehlt
//! ein Kollaborator, degradiert das abhängige Feature zu "inaktiv".

use glam::Vec3;

use super::bounds::Aabb;
use super::entity::EntityHandle;
use super::math::Pose;
use super::pointer::PointerSample;

/// Ergebnis einer Schnittpunkt-Abfrage entlang eines Pointers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Getroffene Entity, falls der Strahl eine trifft
    pub entity: Option<EntityHandle>,
    /// Kontaktpunkt in Weltkoordinaten
    pub contact_point: Vec3,
    /// Distanz vom Pointer-Ursprung zum Kontaktpunkt
    pub distance: f32,
}

/// Liefert den nächstgelegenen Schnittpunkt für eine Pointer-Pose.
pub trait IntersectionProvider {
    /// Fragt den nächsten Treffer entlang der Pose ab (None = nichts in Reichweite).
    fn query(&self, pose: &Pose, max_distance: f32) -> Option<Intersection>;
}

/// Zählt die aktuell aktiven Pointer auf, einmal pro Tick abgefragt.
pub trait PointerSource {
    /// Samples aller gerade getrackten Geräte.
    fn enumerate_active_pointers(&mut self) -> Vec<PointerSample>;
}

/// Mutations- und Abfrage-Operationen auf extern verwalteten Szenen-Entities.
pub trait SceneEntityOps {
    /// Setzt die Weltpose (inkl. uniformer Skalierung) einer Entity.
    fn set_pose(&mut self, entity: EntityHandle, pose: &Pose);

    /// Setzt die (ggf. nicht-uniforme) Skalierung einer Entity.
    fn set_scale(&mut self, entity: EntityHandle, scale: Vec3);

    /// Hängt eine Entity um (None = Szenen-Root).
    fn reparent(&mut self, entity: EntityHandle, parent: Option<EntityHandle>);

    /// Zerstört eine Entity.
    fn destroy(&mut self, entity: EntityHandle);

    /// Schaltet die Grab-Wahrnehmung des externen Providers für eine Entity
    /// stumm (Preview-Modus) bzw. wieder scharf.
    fn set_grab_suspended(&mut self, entity: EntityHandle, suspended: bool);

    /// Aktuelle Weltpose einer Entity.
    fn entity_pose(&self, entity: EntityHandle) -> Option<Pose>;

    /// Aktuelle Skalierung einer Entity.
    fn entity_scale(&self, entity: EntityHandle) -> Option<Vec3>;

    /// Welt-Bounding-Box einer Entity.
    fn entity_bounds(&self, entity: EntityHandle) -> Option<Aabb>;
}
