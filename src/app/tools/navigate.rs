//! Navigations-Tool: Welt-Drag verschiebt den Blickpunkt des Nutzers.

use glam::Vec3;

use super::{Tool, ToolInput, ToolKind, ToolOutput};

/// Standard-Tool der Zweithand: solange Select gehalten wird, zieht die
/// Handbewegung die Welt mit — der Blickpunkt wandert entgegengesetzt.
#[derive(Default)]
pub struct NavigateTool {
    dragging: bool,
    last_position: Option<Vec3>,
}

impl NavigateTool {
    /// Erstellt ein frisches Navigations-Tool.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for NavigateTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Navigate
    }

    fn name(&self) -> &str {
        "Navigate"
    }

    fn update(&mut self, input: &ToolInput) -> ToolOutput {
        let mut output = ToolOutput::default();

        if input.select_pressed {
            self.dragging = true;
            self.last_position = Some(input.pose.position);
        } else if input.select_down && self.dragging {
            if let Some(last) = self.last_position {
                let delta = last - input.pose.position;
                if delta.length_squared() > 0.0 {
                    output.viewpoint_delta = Some(delta);
                }
            }
            self.last_position = Some(input.pose.position);
        }

        if input.select_released {
            self.dragging = false;
            self.last_position = None;
        }

        output
    }

    fn reset(&mut self) {
        self.dragging = false;
        self.last_position = None;
    }

    fn is_default(&self) -> bool {
        true
    }

    fn is_dragging(&self) -> bool {
        self.dragging
    }
}
