//! Selektions-Tool: Standard-Tool der dominanten Hand.

use crate::core::EntityHandle;

use super::{Tool, ToolInput, ToolKind, ToolOutput};

/// Greift die gehoverte Entity bei Select-Druck und lässt sie beim
/// Loslassen wieder fallen. Permanentes Standard-Tool.
#[derive(Default)]
pub struct SelectTool {
    dragging: bool,
    grabbed: Option<EntityHandle>,
}

impl SelectTool {
    /// Erstellt ein frisches Select-Tool.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn name(&self) -> &str {
        "Select"
    }

    fn update(&mut self, input: &ToolInput) -> ToolOutput {
        let mut output = ToolOutput::default();

        if input.select_pressed {
            if let Some(entity) = input.hover.and_then(|hit| hit.entity) {
                output.grab.push(entity);
                self.grabbed = Some(entity);
                self.dragging = true;
            }
        }

        if input.select_released {
            output.release = true;
            self.grabbed = None;
            self.dragging = false;
        }

        output
    }

    fn reset(&mut self) {
        self.dragging = false;
        self.grabbed = None;
    }

    fn is_default(&self) -> bool {
        true
    }

    fn is_dragging(&self) -> bool {
        self.dragging
    }
}
