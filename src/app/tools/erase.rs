//! Lösch-Tool: zerstört die gehoverte Entity per Select-Druck.

use super::{Tool, ToolInput, ToolKind, ToolOutput};

/// Fordert die Zerstörung der gehoverten Entity an. Die eigentliche
/// Zerstörung läuft über `SceneEntityOps` im Grab-Handler.
#[derive(Default)]
pub struct EraseTool {
    erased_count: usize,
}

impl EraseTool {
    /// Erstellt ein frisches Lösch-Tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Anzahl der in dieser Sitzung angeforderten Löschungen.
    pub fn erased_count(&self) -> usize {
        self.erased_count
    }
}

impl Tool for EraseTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Erase
    }

    fn name(&self) -> &str {
        "Erase"
    }

    fn update(&mut self, input: &ToolInput) -> ToolOutput {
        let mut output = ToolOutput::default();

        if input.select_pressed {
            if let Some(entity) = input.hover.and_then(|hit| hit.entity) {
                output.destroy.push(entity);
                self.erased_count += 1;
            }
        }

        output
    }

    fn reset(&mut self) {
        self.erased_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeviceId, EntityHandle, Intersection, Pose};
    use glam::Vec3;

    #[test]
    fn press_on_hover_requests_destroy() {
        let mut tool = EraseTool::new();
        let input = ToolInput {
            device: DeviceId(1),
            pose: Pose::IDENTITY,
            tip: Vec3::ZERO,
            select_down: true,
            select_pressed: true,
            select_released: false,
            hover: Some(Intersection {
                entity: Some(EntityHandle(3)),
                contact_point: Vec3::ZERO,
                distance: 0.2,
            }),
        };

        let out = tool.update(&input);

        assert_eq!(out.destroy, vec![EntityHandle(3)]);
        assert_eq!(tool.erased_count(), 1);
    }
}
