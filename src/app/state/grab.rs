//! Grab-Registry: exklusiver Besitz gehaltener Entities pro Pointer.

use anyhow::bail;
use indexmap::IndexMap;

use crate::app::nested::PocketId;
use crate::core::{DeviceId, EntityHandle, Pose};

/// Besitzer eines gehaltenen Entity-Sets: realer Pointer oder
/// Schatten-Pointer in einer Pocket-Welt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrabOwner {
    /// Realer Pointer in der Full-Scale-Szene
    World(DeviceId),
    /// Schatten-Pointer eines Geräts in einer Pocket-Welt
    Pocket(DeviceId, PocketId),
}

impl GrabOwner {
    /// Gerät hinter dem Besitzer.
    pub fn device(&self) -> DeviceId {
        match self {
            GrabOwner::World(device) => *device,
            GrabOwner::Pocket(device, _) => *device,
        }
    }
}

/// Halte-Datensatz einer Entity: Pose als Versatz relativ zum Besitzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldEntity {
    /// Versatz Besitzer-lokal → Entity
    pub offset: Pose,
}

/// Grab-Ereignis für registrierte Beobachter.
#[derive(Debug, Clone)]
pub enum GrabEvent {
    /// Entities wurden gegriffen
    Grabbed {
        /// Neuer Besitzer
        owner: GrabOwner,
        /// Betroffene Entities
        entities: Vec<EntityHandle>,
    },
    /// Entities wurden fallengelassen
    Dropped {
        /// Bisheriger Besitzer
        owner: GrabOwner,
        /// Betroffene Entities
        entities: Vec<EntityHandle>,
    },
    /// Das komplette Set wurde atomar übertragen
    Transferred {
        /// Bisheriger Besitzer
        from: GrabOwner,
        /// Neuer Besitzer
        to: GrabOwner,
        /// Betroffene Entities
        entities: Vec<EntityHandle>,
    },
}

type GrabObserver = Box<dyn FnMut(&GrabEvent)>;

/// Registry aller gehaltenen Entities.
///
/// Invariante: ein Entity-Handle liegt zu jedem Zeitpunkt in höchstens
/// einem Besitzer-Set. Übertragungen sind atomar (remove-then-add im
/// selben Aufruf); Beobachter werden erst nach abgeschlossener Mutation
/// in Registrierungs-Reihenfolge benachrichtigt.
#[derive(Default)]
pub struct GrabRegistry {
    held: IndexMap<GrabOwner, IndexMap<EntityHandle, HeldEntity>>,
    observers: Vec<GrabObserver>,
}

impl GrabRegistry {
    /// Erstellt eine leere Registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registriert einen Beobachter für Grab-Ereignisse.
    /// Benachrichtigung erfolgt in Registrierungs-Reihenfolge.
    pub fn on_grab_event(&mut self, observer: GrabObserver) {
        self.observers.push(observer);
    }

    fn notify(&mut self, event: GrabEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Aktueller Besitzer einer Entity.
    pub fn owner_of(&self, entity: EntityHandle) -> Option<GrabOwner> {
        self.held
            .iter()
            .find(|(_, set)| set.contains_key(&entity))
            .map(|(owner, _)| *owner)
    }

    /// Greift Entities für einen Besitzer.
    ///
    /// Anderweitig gehaltene Entities werden still übersprungen — Besitz
    /// wird explizit übertragen, nie erzwungen. Gibt die tatsächlich
    /// gegriffenen Handles zurück.
    pub fn grab(
        &mut self,
        owner: GrabOwner,
        entries: Vec<(EntityHandle, HeldEntity)>,
    ) -> Vec<EntityHandle> {
        let mut grabbed = Vec::new();
        for (entity, held) in entries {
            match self.owner_of(entity) {
                Some(existing) if existing != owner => {
                    log::debug!(
                        "Grab von {:?} ignoriert: bereits von {:?} gehalten",
                        entity,
                        existing
                    );
                    continue;
                }
                Some(_) => continue,
                None => {}
            }
            self.held.entry(owner).or_default().insert(entity, held);
            grabbed.push(entity);
        }

        if !grabbed.is_empty() {
            self.notify(GrabEvent::Grabbed {
                owner,
                entities: grabbed.clone(),
            });
        }
        grabbed
    }

    /// Lässt einzelne Entities fallen und gibt deren Datensätze zur
    /// Disposition an den Aufrufer zurück.
    pub fn drop_entities(
        &mut self,
        owner: GrabOwner,
        entities: &[EntityHandle],
    ) -> Vec<(EntityHandle, HeldEntity)> {
        let mut dropped = Vec::new();
        if let Some(set) = self.held.get_mut(&owner) {
            for entity in entities {
                if let Some(held) = set.shift_remove(entity) {
                    dropped.push((*entity, held));
                }
            }
            if set.is_empty() {
                self.held.shift_remove(&owner);
            }
        }

        if !dropped.is_empty() {
            self.notify(GrabEvent::Dropped {
                owner,
                entities: dropped.iter().map(|(e, _)| *e).collect(),
            });
        }
        dropped
    }

    /// Lässt das komplette Set eines Besitzers fallen.
    pub fn drop_all(&mut self, owner: GrabOwner) -> Vec<(EntityHandle, HeldEntity)> {
        let Some(set) = self.held.shift_remove(&owner) else {
            return Vec::new();
        };
        let dropped: Vec<(EntityHandle, HeldEntity)> = set.into_iter().collect();
        if !dropped.is_empty() {
            self.notify(GrabEvent::Dropped {
                owner,
                entities: dropped.iter().map(|(e, _)| *e).collect(),
            });
        }
        dropped
    }

    /// Überträgt das komplette Set atomar mit frei abbildbaren Versätzen.
    ///
    /// `map` rechnet jeden Halte-Datensatz auf den neuen Besitzer um
    /// (Rebase, Reichweiten-Ausgleich). Zwischen Entnahme und Einfügen
    /// gibt es keinen beobachtbaren Zwischenzustand.
    pub fn transfer_with(
        &mut self,
        from: GrabOwner,
        to: GrabOwner,
        map: impl Fn(&HeldEntity) -> HeldEntity,
    ) -> Vec<EntityHandle> {
        if from == to {
            return Vec::new();
        }
        let Some(set) = self.held.shift_remove(&from) else {
            return Vec::new();
        };
        let mut moved = Vec::with_capacity(set.len());
        let target = self.held.entry(to).or_default();
        for (entity, held) in set {
            target.insert(entity, map(&held));
            moved.push(entity);
        }

        if !moved.is_empty() {
            self.notify(GrabEvent::Transferred {
                from,
                to,
                entities: moved.clone(),
            });
        }
        moved
    }

    /// Überträgt das komplette Set mit einem Pose-Rebase
    /// (`neuer Versatz = rebase ∘ alter Versatz`).
    pub fn transfer(&mut self, from: GrabOwner, to: GrabOwner, rebase: &Pose) -> Vec<EntityHandle> {
        self.transfer_with(from, to, |held| HeldEntity {
            offset: rebase.compose(&held.offset),
        })
    }

    /// Wendet eine Mutation auf alle Halte-Datensätze eines Besitzers an
    /// (z.B. Skalierungsfaktor des Zweihand-Tools).
    pub fn update_offsets(&mut self, owner: GrabOwner, mut f: impl FnMut(&mut HeldEntity)) {
        if let Some(set) = self.held.get_mut(&owner) {
            for held in set.values_mut() {
                f(held);
            }
        }
    }

    /// Halte-Datensätze eines Besitzers.
    pub fn entries(&self, owner: GrabOwner) -> Option<&IndexMap<EntityHandle, HeldEntity>> {
        self.held.get(&owner)
    }

    /// Gehaltene Handles eines Besitzers in Einfüge-Reihenfolge.
    pub fn held(&self, owner: GrabOwner) -> Vec<EntityHandle> {
        self.held
            .get(&owner)
            .map(|set| set.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Hält der Besitzer irgendetwas?
    pub fn holds_any(&self, owner: GrabOwner) -> bool {
        self.held.get(&owner).is_some_and(|set| !set.is_empty())
    }

    /// Hält das Gerät irgendetwas (Welt- oder Schatten-Besitz)?
    pub fn device_holds_any(&self, device: DeviceId) -> bool {
        self.held
            .iter()
            .any(|(owner, set)| owner.device() == device && !set.is_empty())
    }

    /// Alle gehaltenen Handles eines Geräts (Welt + alle Pockets).
    pub fn held_by_device(&self, device: DeviceId) -> Vec<EntityHandle> {
        self.held
            .iter()
            .filter(|(owner, _)| owner.device() == device)
            .flat_map(|(_, set)| set.keys().copied())
            .collect()
    }

    /// Alle Besitzer mit nicht-leerem Set in Einfüge-Reihenfolge.
    pub fn owners(&self) -> Vec<GrabOwner> {
        self.held
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(owner, _)| *owner)
            .collect()
    }

    /// Prüft die Exklusiv-Besitz-Invariante über alle Sets.
    ///
    /// Doppelbesitz ist ein Programmfehler: er wird gemeldet und die
    /// auslösende Operation abgebrochen, nicht still repariert.
    pub fn validate_exclusive(&self) -> anyhow::Result<()> {
        let mut seen: IndexMap<EntityHandle, GrabOwner> = IndexMap::new();
        for (owner, set) in &self.held {
            for entity in set.keys() {
                if let Some(first) = seen.insert(*entity, *owner) {
                    bail!(
                        "Doppelbesitz von {:?}: {:?} und {:?}",
                        entity,
                        first,
                        owner
                    );
                }
            }
        }
        Ok(())
    }
}
