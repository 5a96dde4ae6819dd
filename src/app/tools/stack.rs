//! Per-Gerät-Tool-Stacks mit Exklusivitäts-Verwaltung.
//!
//! Jedes Gerät besitzt einen LIFO-Stack; der Boden ist ein permanentes
//! Standard-Tool. Multi-Device-Tools teilen sich eine Instanz über mehrere
//! Stacks (`Rc<RefCell<…>>`, Single-Thread-Tick-Modell) und werden atomar
//! von allen Stacks gepoppt.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::bail;
use indexmap::IndexMap;

use crate::core::{DeviceId, PointerRole};

use super::factory::ToolFactory;
use super::{Tool, ToolInput, ToolInputState, ToolKind, ToolOutput};

/// Eindeutige Kennung einer gespawnten Tool-Instanz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolInstanceId(pub u64);

/// Eintrag eines Tool-Stacks: Instanz + gespeicherter Eingabezustand.
pub struct ToolStackEntry {
    /// Instanz-Kennung (identisch auf allen gebundenen Stacks)
    pub instance: ToolInstanceId,
    /// Geteilte Tool-Instanz
    pub tool: Rc<RefCell<Box<dyn Tool>>>,
    /// Gespeicherter Eingabezustand dieses Eintrags
    pub input: ToolInputState,
    /// Deaktiviert, solange ein exklusives Tool aktiv ist
    pub enabled: bool,
}

impl ToolStackEntry {
    /// Tool-Art des Eintrags.
    pub fn kind(&self) -> ToolKind {
        self.tool.borrow().kind()
    }
}

/// Buchführung eines aktiven exklusiven Tools.
struct ExclusiveRecord {
    /// Exklusive Instanz
    instance: ToolInstanceId,
    /// Genau die Einträge, die beim Spawn deaktiviert wurden
    suspended: Vec<ToolInstanceId>,
}

/// Verwaltet die Tool-Stacks aller Geräte.
///
/// Invariante: nach `ensure_stack` ist ein Stack nie leer, und der oberste
/// Eintrag entspricht dem separat geführten "aktuellen Tool" des Geräts.
/// Divergiert beides, wird die Operation abgebrochen statt repariert.
#[derive(Default)]
pub struct ToolStackManager {
    stacks: IndexMap<DeviceId, Vec<ToolStackEntry>>,
    current: IndexMap<DeviceId, ToolInstanceId>,
    bindings: IndexMap<ToolInstanceId, Vec<DeviceId>>,
    exclusives: Vec<ExclusiveRecord>,
    next_instance: u64,
}

impl ToolStackManager {
    /// Erstellt einen leeren Manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Legt den Stack eines neuen Geräts an (Standard-Tool am Boden).
    ///
    /// Primary-Geräte erhalten das Select-Tool, Secondary das
    /// Navigations-Tool. Existiert der Stack schon, passiert nichts.
    pub fn ensure_stack(
        &mut self,
        device: DeviceId,
        role: PointerRole,
        factory: &mut dyn ToolFactory,
    ) -> anyhow::Result<()> {
        if self.stacks.contains_key(&device) {
            return Ok(());
        }

        let kind = match role {
            PointerRole::Primary => ToolKind::Select,
            PointerRole::Secondary => ToolKind::Navigate,
        };
        let Some(tool) = factory.create(kind, &[device]) else {
            bail!("ToolFactory lieferte kein Standard-Tool für {:?}", kind);
        };

        let instance = self.next_instance_id();
        // Taucht ein Gerät auf, während ein exklusives Tool läuft, startet
        // sein Standard-Tool suspendiert und wird beim Despawn mit reaktiviert.
        let enabled = self.exclusives.is_empty();
        if let Some(record) = self.exclusives.last_mut() {
            record.suspended.push(instance);
        }
        self.stacks.insert(
            device,
            vec![ToolStackEntry {
                instance,
                tool: Rc::new(RefCell::new(tool)),
                input: ToolInputState::default(),
                enabled,
            }],
        );
        self.current.insert(device, instance);
        self.bindings.insert(instance, vec![device]);
        log::info!("Tool-Stack für Gerät {:?} angelegt ({:?})", device, kind);
        Ok(())
    }

    /// Existiert ein Stack für das Gerät?
    pub fn has_stack(&self, device: DeviceId) -> bool {
        self.stacks.contains_key(&device)
    }

    /// Stack-Tiefe eines Geräts (0 = unbekanntes Gerät).
    pub fn stack_len(&self, device: DeviceId) -> usize {
        self.stacks.get(&device).map_or(0, Vec::len)
    }

    /// Tool-Art des aktuellen (obersten) Tools eines Geräts.
    pub fn current_kind(&self, device: DeviceId) -> Option<ToolKind> {
        let stack = self.stacks.get(&device)?;
        stack.last().map(ToolStackEntry::kind)
    }

    /// Ist das aktuelle Tool des Geräts aktiviert (nicht suspendiert)?
    pub fn current_enabled(&self, device: DeviceId) -> bool {
        self.stacks
            .get(&device)
            .and_then(|stack| stack.last())
            .is_some_and(|entry| entry.enabled)
    }

    /// Meldet das aktuelle Tool des Geräts einen laufenden Drag?
    pub fn current_dragging(&self, device: DeviceId) -> bool {
        self.stacks
            .get(&device)
            .and_then(|stack| stack.last())
            .is_some_and(|entry| entry.tool.borrow().is_dragging())
    }

    /// Anzahl aktuell deaktivierter Einträge (über alle Stacks).
    pub fn suspended_count(&self) -> usize {
        self.stacks
            .values()
            .flat_map(|stack| stack.iter())
            .filter(|entry| !entry.enabled)
            .count()
    }

    /// Wählt ein Tool mit Toggle-Semantik.
    ///
    /// Ist `kind` bereits das aktuelle Tool des Geräts, wird es despawnt
    /// (Standard-Tools: No-op). Sonst wird eine neue Instanz gespawnt und
    /// auf allen von der Factory beanspruchten Geräten aktuell.
    pub fn select_tool(
        &mut self,
        device: DeviceId,
        kind: ToolKind,
        active_devices: &[DeviceId],
        factory: &mut dyn ToolFactory,
    ) -> anyhow::Result<()> {
        if !self.stacks.contains_key(&device) {
            bail!("Tool-Auswahl für unbekanntes Gerät {:?}", device);
        }

        if self.current_kind(device) == Some(kind) {
            return self.despawn_current(device, factory);
        }
        self.spawn(device, kind, active_devices, factory)
    }

    /// Dispatcht den Eingabe-Schnappschuss an das aktuelle Tool des Geräts.
    ///
    /// Gibt `None` zurück, wenn kein Tool dispatcht wurde (Gerät unbekannt,
    /// Eintrag suspendiert oder Stack-Invariante verletzt).
    pub fn update_current(&mut self, device: DeviceId, input: &ToolInput) -> Option<ToolOutput> {
        let current = *self.current.get(&device)?;
        let stack = self.stacks.get_mut(&device)?;
        let top = stack.last_mut()?;

        if top.instance != current {
            // Invariantenverletzung: Stack und "aktuelles Tool" divergieren.
            // Kein Reparaturversuch — Dispatch abbrechen und melden.
            log::error!(
                "Tool-Stack von Gerät {:?} divergiert (Top {:?}, erwartet {:?}) — Dispatch verworfen",
                device,
                top.instance,
                current
            );
            return None;
        }
        if !top.enabled {
            return None;
        }

        top.input.record(input);
        Some(top.tool.borrow_mut().update(input))
    }

    // ── intern ───────────────────────────────────────────────────

    fn next_instance_id(&mut self) -> ToolInstanceId {
        self.next_instance += 1;
        ToolInstanceId(self.next_instance)
    }

    fn spawn(
        &mut self,
        device: DeviceId,
        kind: ToolKind,
        active_devices: &[DeviceId],
        factory: &mut dyn ToolFactory,
    ) -> anyhow::Result<()> {
        if !self.exclusives.is_empty() {
            // Während ein exklusives Tool läuft, bleiben Spawns gesperrt,
            // damit dessen Suspendierungs-Buchführung symmetrisch bleibt.
            log::warn!(
                "Tool-Spawn {:?} ignoriert: exklusives Tool aktiv",
                kind
            );
            return Ok(());
        }

        let bound: Vec<DeviceId> = factory
            .bound_devices(kind, device, active_devices)
            .into_iter()
            .filter(|d| self.stacks.contains_key(d))
            .collect();
        if bound.is_empty() {
            bail!("Tool {:?} ohne gebundene Geräte", kind);
        }

        let Some(tool) = factory.create(kind, &bound) else {
            bail!("ToolFactory lieferte keine Instanz für {:?}", kind);
        };
        let exclusive = tool.is_exclusive();
        let instance = self.next_instance_id();
        let shared = Rc::new(RefCell::new(tool));

        for d in &bound {
            let stack = self.stacks.get_mut(d).expect("Stack oben geprüft");
            stack.push(ToolStackEntry {
                instance,
                tool: Rc::clone(&shared),
                input: ToolInputState::default(),
                enabled: true,
            });
            self.current.insert(*d, instance);
        }
        self.bindings.insert(instance, bound.clone());

        if exclusive {
            let mut suspended = Vec::new();
            for stack in self.stacks.values_mut() {
                for entry in stack.iter_mut() {
                    if entry.instance != instance && entry.enabled {
                        entry.enabled = false;
                        suspended.push(entry.instance);
                    }
                }
            }
            log::info!(
                "Exklusives Tool {:?} gespawnt, {} Einträge suspendiert",
                kind,
                suspended.len()
            );
            self.exclusives.push(ExclusiveRecord {
                instance,
                suspended,
            });
        } else {
            log::info!("Tool {:?} auf {:?} gespawnt", kind, bound);
        }
        Ok(())
    }

    fn despawn_current(
        &mut self,
        device: DeviceId,
        factory: &mut dyn ToolFactory,
    ) -> anyhow::Result<()> {
        let Some(&current) = self.current.get(&device) else {
            bail!("Kein aktuelles Tool für Gerät {:?}", device);
        };

        let kind;
        {
            let stack = self.stacks.get(&device).expect("select_tool prüft Stack");
            let Some(top) = stack.last() else {
                bail!("Leerer Tool-Stack für Gerät {:?}", device);
            };
            if top.instance != current {
                bail!(
                    "Tool-Stack von Gerät {:?} divergiert (Top {:?}, erwartet {:?}) — Despawn abgebrochen",
                    device,
                    top.instance,
                    current
                );
            }
            kind = top.kind();
            if top.tool.borrow().is_default() {
                log::debug!("Despawn von Standard-Tool {:?} ignoriert", kind);
                return Ok(());
            }
        }

        let bound = self
            .bindings
            .get(&current)
            .cloned()
            .unwrap_or_else(|| vec![device]);

        // Zwei Phasen: erst alle Stacks prüfen, dann atomar poppen.
        for d in &bound {
            let Some(stack) = self.stacks.get(d) else {
                bail!("Gebundenes Gerät {:?} ohne Stack", d);
            };
            match stack.last() {
                Some(top) if top.instance == current => {}
                _ => bail!(
                    "Multi-Device-Tool {:?} ist auf Gerät {:?} nicht oben — Despawn abgebrochen",
                    kind,
                    d
                ),
            }
        }

        for d in &bound {
            let stack = self.stacks.get_mut(d).expect("oben geprüft");
            if let Some(entry) = stack.pop() {
                entry.tool.borrow_mut().reset();
            }
            let new_top = stack
                .last()
                .expect("Stack-Boden ist ein permanentes Standard-Tool");
            self.current.insert(*d, new_top.instance);
        }
        self.bindings.shift_remove(&current);

        if let Some(pos) = self
            .exclusives
            .iter()
            .position(|record| record.instance == current)
        {
            let record = self.exclusives.remove(pos);
            let mut restored = 0usize;
            for stack in self.stacks.values_mut() {
                for entry in stack.iter_mut() {
                    if record.suspended.contains(&entry.instance) {
                        entry.enabled = true;
                        restored += 1;
                    }
                }
            }
            log::info!(
                "Exklusives Tool {:?} despawnt, {} Einträge reaktiviert",
                kind,
                restored
            );
        } else {
            log::info!("Tool {:?} despawnt", kind);
        }

        factory.destroy(kind, current);
        Ok(())
    }
}
