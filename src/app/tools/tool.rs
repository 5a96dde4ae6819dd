//! Tool-Trait — Schnittstelle für alle Tools.

use super::{ToolInput, ToolKind, ToolOutput};

/// Schnittstelle für alle Tools (Select, Navigate, Erase, …).
///
/// Tools sind zustandsbehaftet (Drag-Phasen) und erzeugen pro Tick ein
/// [`ToolOutput`] mit reinen Daten. Fähigkeiten wie Exklusivität sind
/// Abfragen mit Default-Implementierung — orthogonale Eigenschaften,
/// keine Typ-Hierarchie.
pub trait Tool {
    /// Tool-Art dieses Exemplars.
    fn kind(&self) -> ToolKind;

    /// Anzeigename für Menüs und Logs.
    fn name(&self) -> &str;

    /// Verarbeitet den Eingabe-Schnappschuss eines Geräts.
    ///
    /// Multi-Device-Tools werden pro gebundenem Gerät einmal pro Tick
    /// aufgerufen und unterscheiden intern über `input.device`.
    fn update(&mut self, input: &ToolInput) -> ToolOutput;

    /// Tool-Zustand zurücksetzen (Despawn / Suspendierung).
    fn reset(&mut self);

    /// Suspendiert dieses Tool beim Spawn alle anderen Tools systemweit?
    fn is_exclusive(&self) -> bool {
        false
    }

    /// Permanentes Standard-Tool (nie despawnbar)?
    fn is_default(&self) -> bool {
        false
    }

    /// Läuft gerade eine Drag-Interaktion?
    fn is_dragging(&self) -> bool {
        false
    }
}
