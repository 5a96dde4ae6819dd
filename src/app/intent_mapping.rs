//! Intent → Command Mapping.
//!
//! Intents ohne sinnvolles Ziel (unbekanntes Gerät, leeres Set) werden
//! hier herausgefiltert, damit die Handler nur valide Commands sehen.

use super::state::CoordinatorState;
use super::{AppCommand, AppIntent};

/// Bildet einen Intent auf null oder mehr Commands ab.
pub fn map_intent_to_commands(state: &CoordinatorState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::ToolSelectRequested { device, kind } => {
            if !state.tools.has_stack(device) {
                log::warn!("Tool-Auswahl für unbekanntes Gerät {:?} verworfen", device);
                return Vec::new();
            }
            vec![AppCommand::SelectTool { device, kind }]
        }
        AppIntent::MenuActivationRequested { device, menu } => {
            vec![AppCommand::ActivateMenu { device, menu }]
        }
        AppIntent::MenuDismissRequested { device, menu } => {
            vec![AppCommand::DismissMenu { device, menu }]
        }
        AppIntent::PocketSpawnRequested {
            world_pose,
            reference_pose,
            volume,
            excluded,
        } => vec![AppCommand::SpawnPocket {
            world_pose,
            reference_pose,
            volume,
            excluded,
        }],
        AppIntent::PocketDestroyRequested { pocket } => {
            if !state.nested.pockets.contains_key(&pocket) {
                log::warn!("Destroy für unbekannte Pocket {:?} verworfen", pocket);
                return Vec::new();
            }
            vec![AppCommand::DestroyPocket { pocket }]
        }
        AppIntent::HandOffRequested { from, to } => {
            if from == to || !state.grab.device_holds_any(from) {
                return Vec::new();
            }
            if state.pointers.get(to).is_none() {
                log::warn!("Hand-off an unbekanntes Gerät {:?} verworfen", to);
                return Vec::new();
            }
            vec![AppCommand::TransferHeld { from, to }]
        }
        AppIntent::GrabRequested { device, entities } => {
            if entities.is_empty() || state.pointers.get(device).is_none() {
                return Vec::new();
            }
            vec![AppCommand::Grab { device, entities }]
        }
        AppIntent::DropRequested { device } => {
            if !state.grab.device_holds_any(device) {
                return Vec::new();
            }
            vec![AppCommand::DropHeld { device }]
        }
        AppIntent::AvatarRegistered { entity, parent } => {
            vec![AppCommand::SetAvatar { entity, parent }]
        }
        AppIntent::ObstaclesChanged { obstacles } => {
            vec![AppCommand::SetObstacles { obstacles }]
        }
        AppIntent::WorkspaceVolumeChanged { volume } => {
            vec![AppCommand::SetWorkspaceVolume { volume }]
        }
    }
}
