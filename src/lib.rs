//! VR Scene Coordinator Library.
//! Multi-Pointer-Koordinator für immersive Szenenbearbeitung: Tool-Stacks,
//! Grab-Registry, Nested-Space-Transfer und Menü-Sichtbarkeit.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    AppCommand, AppIntent, AvatarState, Coordinator, CoordinatorState, DefaultToolFactory,
    GrabEvent, GrabOwner, GrabRegistry, MenuFactory, MenuHideFlags, MenuHideState, MenuKind,
    PocketId, PocketWorld, ShadowPointer, TickContext, Tool, ToolFactory, ToolInput, ToolKind,
    ToolOutput, ToolStackManager,
};
pub use core::{
    Aabb, DeviceId, EntityHandle, Intersection, IntersectionProvider, MenuHandle, Pointer,
    PointerRole, PointerSample, PointerSource, Pose, SceneEntityOps,
};
pub use shared::CoordinatorOptions;
