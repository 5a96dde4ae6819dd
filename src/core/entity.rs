//! Handles auf extern verwaltete Szenen-Entities und Menüs.

use serde::{Deserialize, Serialize};

/// Opakes Handle auf eine Szenen-Entity des externen Szenen-Providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// Opakes Handle auf ein von der Menü-Factory erzeugtes Menü.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuHandle(pub u64);
