//! Zentraler Koordinator: Intent-Verarbeitung und Tick-Orchestrierung.

use crate::app::visibility::MenuFactory;
use crate::core::{IntersectionProvider, PointerSource, SceneEntityOps};

use super::state::CoordinatorState;
use super::tools::ToolFactory;
use super::{handlers, intent_mapping, AppCommand, AppIntent};

/// Kollaborator-Referenzen für einen Tick bzw. einen Intent.
///
/// Explizites Context-Passing statt ambientem Singleton: jeder Aufruf
/// bekommt genau die Dienste, die er braucht. Optionale Kollaborateure
/// degradieren ihr Feature zu "inaktiv". Kollaborateure dürfen den
/// Koordinator nicht reentrant aufrufen.
pub struct TickContext<'a> {
    /// Liefert die aktiven Pointer (None = Bestand bleibt stehen)
    pub pointer_source: Option<&'a mut dyn PointerSource>,
    /// Ray-Schnittpunkte für Hover (None = kein Hover)
    pub intersection: Option<&'a dyn IntersectionProvider>,
    /// Szenen-Operationen (verpflichtend)
    pub scene: &'a mut dyn SceneEntityOps,
    /// Tool-Erzeugung (verpflichtend)
    pub tool_factory: &'a mut dyn ToolFactory,
    /// Menü-Erzeugung und -Bounds (None = keine Occlusion-Prüfung)
    pub menu_factory: Option<&'a mut dyn MenuFactory>,
}

/// Orchestriert Intents, Commands und den Simulations-Tick.
///
/// Single-Thread-Modell: sämtliche Mutation läuft über genau einen
/// Koordinator-Aufruf pro Frame; Locking ist nicht nötig.
#[derive(Default)]
pub struct Coordinator;

impl Coordinator {
    /// Erstellt einen neuen Koordinator.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent → Command Mapping.
    pub fn handle_intent(
        &mut self,
        state: &mut CoordinatorState,
        ctx: &mut TickContext<'_>,
        intent: AppIntent,
    ) -> anyhow::Result<()> {
        let commands = intent_mapping::map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, ctx, command)?;
        }

        Ok(())
    }

    /// Führt mutierende Commands auf dem Zustand aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut CoordinatorState,
        ctx: &mut TickContext<'_>,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        let now = state.time;

        match command {
            // === Tools ===
            AppCommand::SelectTool { device, kind } => {
                handlers::tools::select_tool(state, ctx, device, kind)?
            }

            // === Menüs ===
            AppCommand::ActivateMenu { device, menu } => {
                handlers::visibility::activate_menu(state, device, menu, now)
            }
            AppCommand::DismissMenu { device, menu } => {
                handlers::visibility::dismiss_menu(state, device, menu, now)
            }
            AppCommand::SetObstacles { obstacles } => {
                handlers::visibility::set_obstacles(state, obstacles)
            }
            AppCommand::SetWorkspaceVolume { volume } => {
                handlers::visibility::set_workspace(state, volume)
            }

            // === Pocket-Welten ===
            AppCommand::SpawnPocket {
                world_pose,
                reference_pose,
                volume,
                excluded,
            } => {
                handlers::nested::spawn_pocket(state, world_pose, reference_pose, volume, excluded);
            }
            AppCommand::DestroyPocket { pocket } => {
                handlers::nested::destroy_pocket(state, pocket)
            }

            // === Grab/Drop/Transfer ===
            AppCommand::Grab { device, entities } => {
                handlers::grab::grab_entities(state, ctx, device, &entities)
            }
            AppCommand::DropHeld { device } => {
                handlers::grab::drop_for_device(state, ctx, device, now)
            }
            AppCommand::TransferHeld { from, to } => {
                handlers::grab::transfer_held(state, from, to)
            }

            // === Avatar ===
            AppCommand::SetAvatar { entity, parent } => {
                handlers::avatar::set_avatar(state, entity, parent)
            }
        }

        Ok(())
    }

    /// Führt einen Simulations-Tick aus.
    ///
    /// Feste Phasenfolge: Pointer-Sync → Tool-Dispatch → Grab-Anwendung →
    /// Nested-Space-Abgleich → Sichtbarkeits-Arbitrierung → Avatar-Glide.
    /// `now` ist die einzige Zeitquelle des Kerns (Sekunden, monoton).
    pub fn tick(
        &mut self,
        state: &mut CoordinatorState,
        ctx: &mut TickContext<'_>,
        now: f64,
    ) -> anyhow::Result<()> {
        state.time = now;

        handlers::pointers::sync(state, ctx, now);
        let outputs = handlers::tools::dispatch_input(state, ctx);
        handlers::grab::apply_tool_outputs(state, ctx, outputs, now);
        handlers::nested::reconcile(state, ctx);
        handlers::visibility::arbitrate(state, ctx, now);
        handlers::avatar::advance_glide(state, now);

        // Invariantenprüfung am Tick-Ende: Doppelbesitz ist ein
        // Programmfehler und wird gemeldet statt still repariert.
        state.grab.validate_exclusive()?;
        Ok(())
    }
}
