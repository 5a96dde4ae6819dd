//! Mess-Tool: exklusive Distanzmessung zwischen zwei Tip-Positionen.

use glam::Vec3;

use super::{Tool, ToolInput, ToolKind, ToolOutput};

/// Misst die Distanz zwischen zwei nacheinander gesetzten Messpunkten.
///
/// Exklusiv: solange gemessen wird, sind alle anderen Tools systemweit
/// suspendiert, damit kein Select-Druck nebenbei greift oder löscht.
#[derive(Default)]
pub struct MeasureTool {
    points: Vec<Vec3>,
}

impl MeasureTool {
    /// Erstellt ein frisches Mess-Tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gemessene Distanz, sobald beide Punkte gesetzt sind.
    pub fn measurement(&self) -> Option<f32> {
        match self.points.as_slice() {
            [a, b] => Some(a.distance(*b)),
            _ => None,
        }
    }

    /// Bisher gesetzte Messpunkte.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

impl Tool for MeasureTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Measure
    }

    fn name(&self) -> &str {
        "Measure"
    }

    fn update(&mut self, input: &ToolInput) -> ToolOutput {
        if input.select_pressed {
            if self.points.len() >= 2 {
                // Dritter Druck startet eine neue Messung.
                self.points.clear();
            }
            self.points.push(input.tip);
        }

        ToolOutput::default()
    }

    fn reset(&mut self) {
        self.points.clear();
    }

    fn is_exclusive(&self) -> bool {
        true
    }

    fn is_dragging(&self) -> bool {
        self.points.len() == 1
    }
}
