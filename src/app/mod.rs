//! Application-Layer: Koordinator, Zustand, Events und Feature-Handler.

pub mod command_log;
pub mod coordinator;
pub mod events;
pub mod handlers;
mod intent_mapping;
/// Nested-Space-System (Pocket-Welten, Schatten-Pointer, Transfer).
pub mod nested;
/// Koordinator-Zustand (Pointer, Grab, Avatar, Aggregat).
pub mod state;
pub mod tools;
/// Menü-Sichtbarkeit (Hide-Flags, Arbitrierung).
pub mod visibility;

pub use command_log::CommandLog;
pub use coordinator::{Coordinator, TickContext};
pub use events::{AppCommand, AppIntent};
pub use nested::{NestedSpaceState, PocketId, PocketWorld, ShadowPointer};
pub use state::{AvatarState, CoordinatorState, GrabEvent, GrabOwner, GrabRegistry};
pub use tools::{
    DefaultToolFactory, Tool, ToolFactory, ToolInput, ToolKind, ToolOutput, ToolStackManager,
};
pub use visibility::{MenuFactory, MenuHideFlags, MenuHideState, MenuKind, VisibilityState};
