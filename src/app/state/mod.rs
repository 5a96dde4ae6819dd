//! Koordinator-Zustand: Pointer, Grab-Registry, Avatar und Aggregat.

pub mod app_state;
pub mod avatar;
pub mod grab;
pub mod pointers;

pub use app_state::CoordinatorState;
pub use avatar::{AvatarState, ViewpointGlide};
pub use grab::{GrabEvent, GrabOwner, GrabRegistry, HeldEntity};
pub use pointers::PointerRegistry;
