use crate::app::nested::PocketId;
use crate::app::tools::ToolKind;
use crate::app::visibility::MenuKind;
use crate::core::{Aabb, DeviceId, EntityHandle, Pose};

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Tool wählen/togglen
    SelectTool {
        /// Anfragendes Gerät
        device: DeviceId,
        /// Tool-Art
        kind: ToolKind,
    },
    /// Menü explizit aktivieren (Delay-Bypass)
    ActivateMenu {
        /// Gerät des Menüs
        device: DeviceId,
        /// Menü-Art
        menu: MenuKind,
    },
    /// Menü explizit verbergen
    DismissMenu {
        /// Gerät des Menüs
        device: DeviceId,
        /// Menü-Art
        menu: MenuKind,
    },
    /// Pocket-Welt erzeugen
    SpawnPocket {
        /// Platzierung der Miniatur
        world_pose: Pose,
        /// Ursprung des gespiegelten Bereichs
        reference_pose: Pose,
        /// Containment-Volumen
        volume: Aabb,
        /// Ausgeschlossene Entities
        excluded: Vec<EntityHandle>,
    },
    /// Pocket-Welt zerstören
    DestroyPocket {
        /// Betroffene Welt
        pocket: PocketId,
    },
    /// Gehaltenes Set atomar übergeben
    TransferHeld {
        /// Abgebendes Gerät
        from: DeviceId,
        /// Übernehmendes Gerät
        to: DeviceId,
    },
    /// Entities greifen
    Grab {
        /// Greifendes Gerät
        device: DeviceId,
        /// Zu greifende Entities
        entities: Vec<EntityHandle>,
    },
    /// Gehaltenes Set fallenlassen
    DropHeld {
        /// Betroffenes Gerät
        device: DeviceId,
    },
    /// Avatar-Entity registrieren
    SetAvatar {
        /// Avatar-Entity
        entity: EntityHandle,
        /// Normaler Parent
        parent: Option<EntityHandle>,
    },
    /// Hindernis-Volumina ersetzen
    SetObstacles {
        /// Neue Volumina
        obstacles: Vec<Aabb>,
    },
    /// Workspace-Volumen setzen/entfernen
    SetWorkspaceVolume {
        /// Neues Volumen
        volume: Option<Aabb>,
    },
}
