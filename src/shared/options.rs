//! Zentrale Konfiguration des Koordinators.
//!
//! `CoordinatorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Menü-Timing ─────────────────────────────────────────────────────

/// Verzögerung (Sekunden), bevor ein Menü nach Setzen eines Hide-Bits
/// tatsächlich ausgeblendet wird.
pub const MENU_AUTO_HIDE_DELAY: f64 = 0.25;
/// Verzögerung (Sekunden), bevor ein Menü nach Löschen aller Hide-Bits
/// wieder eingeblendet wird. Bewusst länger als das Ausblenden.
pub const MENU_AUTO_SHOW_DELAY: f64 = 0.7;

// ── Pointer ─────────────────────────────────────────────────────────

/// Standard-Reichweite der Pointer-Spitze in lokalen Einheiten.
pub const DEFAULT_POINTER_REACH: f32 = 0.15;
/// Maximale Distanz für Hover-Abfragen beim Intersection-Provider.
pub const HOVER_MAX_DISTANCE: f32 = 10.0;
/// Abstand (Meter), unter dem zwei Pointer als Übergabe-Paar gelten.
pub const HAND_OFF_DISTANCE: f32 = 0.35;

// ── Nested Spaces ───────────────────────────────────────────────────

/// Größte Kantenlänge, auf die Preview-Entities herunterskaliert werden.
pub const PREVIEW_MAX_EXTENT: f32 = 0.25;
/// Skalierungen unterhalb dieser Schwelle gelten als degeneriert.
pub const DEGENERATE_SCALE_EPSILON: f32 = 1e-6;
/// Radius der Körpernahzone um den Blickpunkt des Nutzers.
pub const BODY_ZONE_RADIUS: f32 = 0.6;

// ── Avatar ──────────────────────────────────────────────────────────

/// Dauer (Sekunden) der Blickpunkt-Umpositionierung nach Avatar-Drop.
pub const VIEWPOINT_GLIDE_DURATION: f64 = 0.5;

// ── Laufzeit-Optionen (serialisierbar) ──────────────────────────────

/// Alle zur Laufzeit änderbaren Koordinator-Optionen.
/// Wird als `vr_scene_coordinator.toml` neben der Host-Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorOptions {
    // ── Menü-Timing ─────────────────────────────────────────────
    /// Auto-Hide-Verzögerung in Sekunden
    pub menu_auto_hide_delay: f64,
    /// Auto-Show-Verzögerung in Sekunden
    pub menu_auto_show_delay: f64,

    // ── Pointer ─────────────────────────────────────────────────
    /// Fallback-Reichweite, wenn ein Sample keine liefert
    pub default_pointer_reach: f32,
    /// Maximale Hover-Abfrage-Distanz
    pub hover_max_distance: f32,
    /// Übergabe-Distanz zwischen zwei Pointern
    pub hand_off_distance: f32,

    // ── Nested Spaces ───────────────────────────────────────────
    /// Ziel-Kantenlänge für Preview-Entities
    pub preview_max_extent: f32,
    /// Schwelle für degenerierte Skalierungen
    pub degenerate_scale_epsilon: f32,
    /// Radius der Körpernahzone
    pub body_zone_radius: f32,

    // ── Avatar ──────────────────────────────────────────────────
    /// Dauer der Blickpunkt-Umpositionierung
    pub viewpoint_glide_duration: f64,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            menu_auto_hide_delay: MENU_AUTO_HIDE_DELAY,
            menu_auto_show_delay: MENU_AUTO_SHOW_DELAY,

            default_pointer_reach: DEFAULT_POINTER_REACH,
            hover_max_distance: HOVER_MAX_DISTANCE,
            hand_off_distance: HAND_OFF_DISTANCE,

            preview_max_extent: PREVIEW_MAX_EXTENT,
            degenerate_scale_epsilon: DEGENERATE_SCALE_EPSILON,
            body_zone_radius: BODY_ZONE_RADIUS,

            viewpoint_glide_duration: VIEWPOINT_GLIDE_DURATION,
        }
    }
}

impl CoordinatorOptions {
    /// Lädt Optionen aus einer TOML-Datei; bei Fehlern Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert die Optionen als TOML.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Host-Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("vr_scene_coordinator"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("vr_scene_coordinator.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let opts = CoordinatorOptions::default();

        assert_eq!(opts.menu_auto_hide_delay, MENU_AUTO_HIDE_DELAY);
        assert_eq!(opts.menu_auto_show_delay, MENU_AUTO_SHOW_DELAY);
        assert_eq!(opts.preview_max_extent, PREVIEW_MAX_EXTENT);
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let mut opts = CoordinatorOptions::default();
        opts.hand_off_distance = 0.5;
        opts.menu_auto_show_delay = 1.25;

        let text = toml::to_string_pretty(&opts).expect("Serialisierung sollte klappen");
        let back: CoordinatorOptions = toml::from_str(&text).expect("Parsen sollte klappen");

        assert_eq!(back.hand_off_distance, 0.5);
        assert_eq!(back.menu_auto_show_delay, 1.25);
    }
}
