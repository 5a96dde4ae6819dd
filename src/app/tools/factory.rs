//! ToolFactory-Trait und Standard-Factory mit den eingebauten Tools.

use crate::core::DeviceId;

use super::erase::EraseTool;
use super::measure::MeasureTool;
use super::navigate::NavigateTool;
use super::scale::ScaleTool;
use super::select::SelectTool;
use super::stack::ToolInstanceId;
use super::{Tool, ToolKind};

/// Erzeugt und zerstört Tool-Instanzen.
///
/// Hosts können eigene Factories einhängen, um weitere Tool-Arten
/// anzubieten oder die eingebauten zu ersetzen.
pub trait ToolFactory {
    /// Geräte, die ein Tool beim Spawn beansprucht.
    ///
    /// Default: nur das anfragende Gerät. Zweihand-Tools geben alle
    /// aktiven Geräte zurück.
    fn bound_devices(
        &self,
        kind: ToolKind,
        requesting: DeviceId,
        active: &[DeviceId],
    ) -> Vec<DeviceId> {
        let _ = (kind, active);
        vec![requesting]
    }

    /// Erzeugt eine Tool-Instanz (None = Art unbekannt).
    fn create(&mut self, kind: ToolKind, bound: &[DeviceId]) -> Option<Box<dyn Tool>>;

    /// Benachrichtigung über einen Despawn (Default: nichts).
    fn destroy(&mut self, kind: ToolKind, instance: ToolInstanceId) {
        let _ = (kind, instance);
    }
}

/// Standard-Factory für die eingebauten Tools.
#[derive(Default)]
pub struct DefaultToolFactory;

impl ToolFactory for DefaultToolFactory {
    fn bound_devices(
        &self,
        kind: ToolKind,
        requesting: DeviceId,
        active: &[DeviceId],
    ) -> Vec<DeviceId> {
        match kind {
            // Zweihand-Tool: beansprucht alle aktiven Geräte.
            ToolKind::Scale if active.len() >= 2 => active.to_vec(),
            _ => vec![requesting],
        }
    }

    fn create(&mut self, kind: ToolKind, bound: &[DeviceId]) -> Option<Box<dyn Tool>> {
        let tool: Box<dyn Tool> = match kind {
            ToolKind::Select => Box::new(SelectTool::new()),
            ToolKind::Navigate => Box::new(NavigateTool::new()),
            ToolKind::Erase => Box::new(EraseTool::new()),
            ToolKind::Scale => Box::new(ScaleTool::new(bound.to_vec())),
            ToolKind::Measure => Box::new(MeasureTool::new()),
        };
        Some(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_claims_all_active_devices() {
        let factory = DefaultToolFactory;
        let active = [DeviceId(1), DeviceId(2)];

        let bound = factory.bound_devices(ToolKind::Scale, DeviceId(1), &active);
        assert_eq!(bound, vec![DeviceId(1), DeviceId(2)]);

        let single = factory.bound_devices(ToolKind::Erase, DeviceId(1), &active);
        assert_eq!(single, vec![DeviceId(1)]);
    }

    #[test]
    fn create_returns_matching_kind() {
        let mut factory = DefaultToolFactory;
        let tool = factory
            .create(ToolKind::Measure, &[DeviceId(1)])
            .expect("eingebaute Art");

        assert_eq!(tool.kind(), ToolKind::Measure);
        assert!(tool.is_exclusive());
    }
}
