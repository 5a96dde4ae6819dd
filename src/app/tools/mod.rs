//! Trait-basiertes Tool-System mit Per-Gerät-Stacks.
//!
//! Jedes Tool implementiert den [`Tool`]-Trait und wird über die
//! [`factory::ToolFactory`] erzeugt. Tools erzeugen reine Daten
//! ([`ToolOutput`]), die Mutation erfolgt zentral im Grab-Handler.
//! Fähigkeiten (exklusiv, Standard-Tool) sind Trait-Abfragen, keine
//! Typ-Hierarchie.

/// Lösch-Tool: zerstört gehoverte Entities.
pub mod erase;
/// ToolFactory-Trait und Standard-Factory mit den eingebauten Tools.
pub mod factory;
/// Mess-Tool (exklusiv): Distanz zwischen zwei Tip-Positionen.
pub mod measure;
/// Navigations-Tool: Welt-Drag verschiebt den Blickpunkt.
pub mod navigate;
/// Zweihand-Skalierungs-Tool (Multi-Device).
pub mod scale;
/// Selektions-Tool: Hover + Grab/Drop per Select-Taste.
pub mod select;
/// Per-Gerät-Tool-Stacks mit Exklusivitäts-Verwaltung.
pub mod stack;
/// Tool-Trait — Schnittstelle für alle Tools.
mod tool;

pub use factory::{DefaultToolFactory, ToolFactory};
pub use stack::{ToolInstanceId, ToolStackEntry, ToolStackManager};
pub use tool::Tool;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{DeviceId, EntityHandle, Intersection, Pose};

// ── Typen ────────────────────────────────────────────────────────

/// Kennung der bekannten Tool-Arten.
///
/// Hosts können über eine eigene [`ToolFactory`] weitere Arten anbieten;
/// die Stack-Semantik behandelt alle Arten gleich.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Standard auf der dominanten Hand: selektieren und greifen
    Select,
    /// Standard auf der Zweithand: Welt-Navigation
    Navigate,
    /// Gehoverte Entities löschen
    Erase,
    /// Zweihändiges Skalieren gehaltener Entities
    Scale,
    /// Distanzmessung zwischen zwei Punkten
    Measure,
}

impl ToolKind {
    /// Standard-Tools sitzen am Stack-Boden und sind nie despawnbar.
    pub fn is_default(self) -> bool {
        matches!(self, ToolKind::Select | ToolKind::Navigate)
    }
}

/// Eingabe-Schnappschuss für genau ein Gerät in einem Tick.
#[derive(Debug, Clone, Copy)]
pub struct ToolInput {
    /// Gerät, dessen Eingabe dispatcht wird
    pub device: DeviceId,
    /// Aktuelle Pointer-Pose
    pub pose: Pose,
    /// Weltposition der Pointer-Spitze
    pub tip: Vec3,
    /// Select-Taste gehalten
    pub select_down: bool,
    /// Select-Kante: gedrückt
    pub select_pressed: bool,
    /// Select-Kante: losgelassen
    pub select_released: bool,
    /// Hover-Ergebnis des Intersection-Providers (None ohne Provider)
    pub hover: Option<Intersection>,
}

/// Ergebnis eines Tool-Updates — reine Daten, keine Mutation.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Entities, die der Pointer greifen soll
    pub grab: Vec<EntityHandle>,
    /// Alles Gehaltene dieses Pointers fallenlassen
    pub release: bool,
    /// Entities, die zerstört werden sollen
    pub destroy: Vec<EntityHandle>,
    /// Verschiebung des Nutzer-Blickpunkts (Welt-Navigation)
    pub viewpoint_delta: Option<Vec3>,
    /// Multiplikativer Skalierungsfaktor für gehaltene Entities
    pub scale_held: Option<f32>,
}

impl ToolOutput {
    /// Enthält der Output keinerlei Wirkung?
    pub fn is_empty(&self) -> bool {
        self.grab.is_empty()
            && !self.release
            && self.destroy.is_empty()
            && self.viewpoint_delta.is_none()
            && self.scale_held.is_none()
    }
}

/// Gespeicherter Eingabezustand eines Stack-Eintrags.
///
/// Bleibt über Suspendierung hinweg erhalten, damit ein reaktiviertes Tool
/// seinen letzten Kontext kennt.
#[derive(Debug, Clone, Default)]
pub struct ToolInputState {
    /// Select-Taste zuletzt gehalten
    pub select_down: bool,
    /// Letzte dispatchte Pose
    pub last_pose: Pose,
    /// Zuletzt gehoverte Entity
    pub hover_entity: Option<EntityHandle>,
}

impl ToolInputState {
    /// Übernimmt den Schnappschuss eines Dispatches.
    pub fn record(&mut self, input: &ToolInput) {
        self.select_down = input.select_down;
        self.last_pose = input.pose;
        self.hover_entity = input.hover.and_then(|hit| hit.entity);
    }
}
