//! Zweihand-Skalierungs-Tool: Multi-Device-Tool über beide Pointer.

use glam::Vec3;
use indexmap::IndexMap;

use crate::core::DeviceId;

use super::{Tool, ToolInput, ToolKind, ToolOutput};

/// Skaliert die gehaltenen Entities über den Abstand beider Hände.
///
/// Wird pro gebundenem Gerät einmal pro Tick aufgerufen und sammelt die
/// Handpositionen intern. Der Faktor wird nur beim ersten gebundenen Gerät
/// emittiert, damit er nicht doppelt angewendet wird.
pub struct ScaleTool {
    bound: Vec<DeviceId>,
    hand_positions: IndexMap<DeviceId, Vec3>,
    grip_down: IndexMap<DeviceId, bool>,
    baseline: Option<f32>,
    dragging: bool,
}

impl ScaleTool {
    /// Erstellt ein Skalierungs-Tool für die übergebenen Geräte.
    pub fn new(bound: Vec<DeviceId>) -> Self {
        Self {
            bound,
            hand_positions: IndexMap::new(),
            grip_down: IndexMap::new(),
            baseline: None,
            dragging: false,
        }
    }

    fn both_hands_gripping(&self) -> bool {
        self.bound.len() >= 2
            && self
                .bound
                .iter()
                .all(|d| self.grip_down.get(d).copied().unwrap_or(false))
    }

    fn hand_distance(&self) -> Option<f32> {
        let a = self.hand_positions.get(self.bound.first()?)?;
        let b = self.hand_positions.get(self.bound.get(1)?)?;
        Some(a.distance(*b))
    }
}

impl Tool for ScaleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Scale
    }

    fn name(&self) -> &str {
        "Scale"
    }

    fn update(&mut self, input: &ToolInput) -> ToolOutput {
        let mut output = ToolOutput::default();

        self.hand_positions.insert(input.device, input.pose.position);
        self.grip_down.insert(input.device, input.select_down);

        if !self.both_hands_gripping() {
            self.baseline = None;
            self.dragging = false;
            return output;
        }

        let Some(distance) = self.hand_distance() else {
            return output;
        };
        self.dragging = true;

        // Baseline und Faktor laufen nur über das erste gebundene Gerät.
        if Some(&input.device) != self.bound.first() {
            return output;
        }

        match self.baseline {
            Some(baseline) if baseline > f32::EPSILON => {
                let factor = distance / baseline;
                self.baseline = Some(distance);
                if (factor - 1.0).abs() > 1e-4 {
                    output.scale_held = Some(factor);
                }
            }
            _ => self.baseline = Some(distance),
        }

        output
    }

    fn reset(&mut self) {
        self.hand_positions.clear();
        self.grip_down.clear();
        self.baseline = None;
        self.dragging = false;
    }

    fn is_dragging(&self) -> bool {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pose;

    fn input(device: DeviceId, x: f32, down: bool) -> ToolInput {
        ToolInput {
            device,
            pose: Pose::from_position(Vec3::new(x, 0.0, 0.0)),
            tip: Vec3::ZERO,
            select_down: down,
            select_pressed: false,
            select_released: false,
            hover: None,
        }
    }

    #[test]
    fn spreading_hands_emits_growth_factor() {
        let mut tool = ScaleTool::new(vec![DeviceId(1), DeviceId(2)]);

        // Baseline bei 1.0 Abstand
        tool.update(&input(DeviceId(2), 1.0, true));
        tool.update(&input(DeviceId(1), 0.0, true));

        // Hände auseinander auf 2.0
        tool.update(&input(DeviceId(2), 2.0, true));
        let out = tool.update(&input(DeviceId(1), 0.0, true));

        let factor = out.scale_held.expect("Faktor erwartet");
        assert!((factor - 2.0).abs() < 1e-4);
    }

    #[test]
    fn single_hand_emits_nothing() {
        let mut tool = ScaleTool::new(vec![DeviceId(1), DeviceId(2)]);
        let out = tool.update(&input(DeviceId(1), 0.0, true));

        assert!(out.scale_held.is_none());
        assert!(!tool.is_dragging());
    }

    #[test]
    fn releasing_one_hand_resets_baseline() {
        let mut tool = ScaleTool::new(vec![DeviceId(1), DeviceId(2)]);
        tool.update(&input(DeviceId(2), 1.0, true));
        tool.update(&input(DeviceId(1), 0.0, true));

        tool.update(&input(DeviceId(2), 1.5, false));
        assert!(!tool.is_dragging());

        // Wieder greifen: neue Baseline, kein Sprung-Faktor
        tool.update(&input(DeviceId(2), 3.0, true));
        let out = tool.update(&input(DeviceId(1), 0.0, true));
        assert!(out.scale_held.is_none());
    }
}
