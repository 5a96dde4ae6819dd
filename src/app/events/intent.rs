use crate::app::nested::PocketId;
use crate::app::tools::ToolKind;
use crate::app::visibility::MenuKind;
use crate::core::{Aabb, DeviceId, EntityHandle, Pose};

/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Tool-Auswahl (Menü, Geste, Shortcut) — Toggle-Semantik
    ToolSelectRequested {
        /// Anfragendes Gerät
        device: DeviceId,
        /// Gewünschte Tool-Art
        kind: ToolKind,
    },
    /// Explizite Menü-Aktivierung durch den Nutzer (umgeht Auto-Show-Delay)
    MenuActivationRequested {
        /// Gerät des Menüs
        device: DeviceId,
        /// Menü-Art
        menu: MenuKind,
    },
    /// Explizites Verbergen eines Menüs
    MenuDismissRequested {
        /// Gerät des Menüs
        device: DeviceId,
        /// Menü-Art
        menu: MenuKind,
    },
    /// Pocket-Welt erzeugen
    PocketSpawnRequested {
        /// Platzierung der Miniatur in der Szene
        world_pose: Pose,
        /// Ursprung des gespiegelten Full-Scale-Bereichs
        reference_pose: Pose,
        /// Containment-Volumen (Pocket-lokal)
        volume: Aabb,
        /// Vom eigenen Rendering ausgeschlossene Entities
        excluded: Vec<EntityHandle>,
    },
    /// Pocket-Welt zerstören
    PocketDestroyRequested {
        /// Betroffene Welt
        pocket: PocketId,
    },
    /// Komplette Übergabe des gehaltenen Sets an einen anderen Pointer
    HandOffRequested {
        /// Abgebendes Gerät
        from: DeviceId,
        /// Übernehmendes Gerät
        to: DeviceId,
    },
    /// Externer Grab-Wunsch (z.B. aus einer UI-Liste)
    GrabRequested {
        /// Greifendes Gerät
        device: DeviceId,
        /// Zu greifende Entities
        entities: Vec<EntityHandle>,
    },
    /// Gehaltenes Set eines Geräts fallenlassen
    DropRequested {
        /// Betroffenes Gerät
        device: DeviceId,
    },
    /// Avatar-Entity des Nutzers registrieren
    AvatarRegistered {
        /// Avatar-Entity
        entity: EntityHandle,
        /// Normaler Parent des Avatars
        parent: Option<EntityHandle>,
    },
    /// Hindernis-Volumina für die Occlusion-Prüfung ersetzen
    ObstaclesChanged {
        /// Neue Hindernis-Volumina
        obstacles: Vec<Aabb>,
    },
    /// Workspace-Volumen setzen oder entfernen
    WorkspaceVolumeChanged {
        /// Neues Volumen (None = keins)
        volume: Option<Aabb>,
    },
}
