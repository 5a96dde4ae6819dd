//! Handler für Tool-Auswahl und Eingabe-Dispatch.

use crate::app::coordinator::TickContext;
use crate::app::state::CoordinatorState;
use crate::app::tools::{ToolInput, ToolKind, ToolOutput};
use crate::core::DeviceId;

/// Führt den SelectTool-Command aus (Toggle-Semantik im Manager).
pub fn select_tool(
    state: &mut CoordinatorState,
    ctx: &mut TickContext<'_>,
    device: DeviceId,
    kind: ToolKind,
) -> anyhow::Result<()> {
    let active = state.pointers.active_devices();
    state
        .tools
        .select_tool(device, kind, &active, ctx.tool_factory)
}

/// Tick-Phase 2: Eingabe an das aktuelle Tool jedes aktiven Geräts
/// dispatchen. Gibt die gesammelten Tool-Outputs zur zentralen
/// Anwendung zurück.
pub fn dispatch_input(
    state: &mut CoordinatorState,
    ctx: &mut TickContext<'_>,
) -> Vec<(DeviceId, ToolOutput)> {
    let mut outputs = Vec::new();

    for device in state.pointers.active_devices() {
        let Some(pointer) = state.pointers.get(device) else {
            continue;
        };
        let pose = pointer.pose;
        let input = ToolInput {
            device,
            pose,
            tip: pointer.tip(),
            select_down: pointer.select_down,
            select_pressed: pointer.select_pressed,
            select_released: pointer.select_released,
            // Hover degradiert ohne Intersection-Provider zu None.
            hover: ctx
                .intersection
                .and_then(|provider| provider.query(&pose, state.options.hover_max_distance)),
        };
        if let Some(p) = state.pointers.get_mut(device) {
            p.hover = input.hover;
        }

        match state.tools.update_current(device, &input) {
            Some(output) => {
                let dragging = state.tools.current_dragging(device);
                if let Some(p) = state.pointers.get_mut(device) {
                    p.dragging = dragging;
                }
                if !output.is_empty() {
                    outputs.push((device, output));
                }
            }
            None => {
                if let Some(p) = state.pointers.get_mut(device) {
                    p.dragging = false;
                }
            }
        }
    }

    outputs
}
