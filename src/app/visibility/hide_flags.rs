//! Hide-Flag-Bitset und asymmetrischer Show/Hide-Debounce.

use bitflags::bitflags;

use crate::core::MenuHandle;

bitflags! {
    /// Unabhängige Gründe, ein Menü zu verbergen.
    ///
    /// Sichtbar ist ein Menü genau dann, wenn das Bitset leer ist — nach
    /// Ablauf der Auto-Show-Verzögerung (bzw. sofort bei expliziter
    /// Aktivierung).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MenuHideFlags: u8 {
        /// Explizit vom Nutzer verborgen
        const EXPLICIT = 1 << 0;
        /// Temporär verborgen (wird jeden Tick neu entschieden)
        const TEMPORARY = 1 << 1;
        /// Durch Hindernis-Geometrie verdeckt
        const OCCLUDED = 1 << 2;
        /// Von einem höher priorisierten Menü verdrängt
        const SUPERSEDED = 1 << 3;
        /// Die Hand hält ein Objekt
        const DIRECT_SELECTION = 1 << 4;
        /// Überlappt das Workspace-Volumen
        const WORKSPACE_OVERLAP = 1 << 5;
    }
}

/// Hide-Zustand eines (Pointer, Menü)-Paars mit Debounce-Zeitstempeln.
///
/// `hidden_since` markiert den Zeitpunkt, zu dem das Bitset zuletzt
/// nicht-null wurde, `shown_since` den Zeitpunkt, zu dem es zuletzt null
/// wurde. Der sichtbare Zustand folgt mit asymmetrischer Verzögerung:
/// kurz Richtung verborgen, länger Richtung sichtbar.
#[derive(Debug, Clone)]
pub struct MenuHideState {
    /// Aktive Verbergungsgründe
    pub flags: MenuHideFlags,
    /// Zeitpunkt, zu dem das Bitset zuletzt null wurde
    pub shown_since: f64,
    /// Zeitpunkt, zu dem das Bitset zuletzt nicht-null wurde
    pub hidden_since: f64,
    /// Debounced sichtbarer Zustand
    visible: bool,
    /// Explizite Aktivierung umgeht die Auto-Show-Verzögerung einmalig
    activation_bypass: bool,
    /// Handle des gespawnten Menüs (None ohne Factory)
    pub handle: Option<MenuHandle>,
}

impl MenuHideState {
    /// Neuer Zustand: startet explizit verborgen.
    pub fn new(now: f64, handle: Option<MenuHandle>) -> Self {
        Self {
            flags: MenuHideFlags::EXPLICIT,
            shown_since: now,
            hidden_since: now,
            visible: false,
            activation_bypass: false,
            handle,
        }
    }

    /// Setzt Verbergungsgründe und pflegt den Hidden-Zeitstempel.
    pub fn set(&mut self, flags: MenuHideFlags, now: f64) {
        if self.flags.is_empty() && !flags.is_empty() {
            self.hidden_since = now;
        }
        self.flags |= flags;
    }

    /// Löscht Verbergungsgründe und pflegt den Shown-Zeitstempel.
    pub fn clear(&mut self, flags: MenuHideFlags, now: f64) {
        let was_hidden = !self.flags.is_empty();
        self.flags &= !flags;
        if was_hidden && self.flags.is_empty() {
            self.shown_since = now;
        }
    }

    /// Setzt oder löscht ein Flag abhängig von `on`.
    pub fn set_to(&mut self, flags: MenuHideFlags, on: bool, now: f64) {
        if on {
            self.set(flags, now);
        } else {
            self.clear(flags, now);
        }
    }

    /// Explizite Nutzer-Aktivierung: löscht das EXPLICIT-Bit und umgeht
    /// die Auto-Show-Verzögerung.
    pub fn activate(&mut self, now: f64) {
        self.clear(MenuHideFlags::EXPLICIT, now);
        self.activation_bypass = true;
    }

    /// Explizites Verbergen durch den Nutzer.
    pub fn dismiss(&mut self, now: f64) {
        self.set(MenuHideFlags::EXPLICIT, now);
        self.activation_bypass = false;
    }

    /// Schreibt den debounced sichtbaren Zustand fort.
    pub fn update_visual(&mut self, now: f64, auto_hide_delay: f64, auto_show_delay: f64) {
        if self.flags.is_empty() {
            if !self.visible
                && (self.activation_bypass || now - self.shown_since >= auto_show_delay)
            {
                self.visible = true;
                self.activation_bypass = false;
            }
        } else if self.visible && now - self.hidden_since >= auto_hide_delay {
            self.visible = false;
        }
    }

    /// Debounced sichtbarer Zustand.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown_state(now: f64) -> MenuHideState {
        let mut state = MenuHideState::new(now, None);
        state.activate(now);
        state.update_visual(now, 0.25, 0.7);
        state
    }

    #[test]
    fn starts_hidden_until_activation() {
        let mut state = MenuHideState::new(0.0, None);
        state.update_visual(0.0, 0.25, 0.7);
        assert!(!state.is_visible());

        state.activate(0.0);
        state.update_visual(0.0, 0.25, 0.7);
        assert!(state.is_visible());
    }

    #[test]
    fn short_hide_blip_is_debounced() {
        let mut state = shown_state(0.0);

        state.set(MenuHideFlags::OCCLUDED, 1.0);
        state.update_visual(1.0, 0.25, 0.7);
        assert!(state.is_visible());

        state.clear(MenuHideFlags::OCCLUDED, 1.1);
        state.update_visual(1.1, 0.25, 0.7);
        assert!(state.is_visible());

        state.update_visual(2.0, 0.25, 0.7);
        assert!(state.is_visible());
    }

    #[test]
    fn sustained_hide_takes_effect_after_delay() {
        let mut state = shown_state(0.0);

        state.set(MenuHideFlags::DIRECT_SELECTION, 1.0);
        state.update_visual(1.2, 0.25, 0.7);
        assert!(state.is_visible());

        state.update_visual(1.3, 0.25, 0.7);
        assert!(!state.is_visible());
    }

    #[test]
    fn reshow_waits_for_auto_show_delay() {
        let mut state = shown_state(0.0);
        state.set(MenuHideFlags::SUPERSEDED, 1.0);
        state.update_visual(2.0, 0.25, 0.7);
        assert!(!state.is_visible());

        state.clear(MenuHideFlags::SUPERSEDED, 3.0);
        state.update_visual(3.5, 0.25, 0.7);
        assert!(!state.is_visible());

        state.update_visual(3.8, 0.25, 0.7);
        assert!(state.is_visible());
    }

    #[test]
    fn activation_bypasses_show_delay() {
        let mut state = shown_state(0.0);
        state.dismiss(1.0);
        state.update_visual(2.0, 0.25, 0.7);
        assert!(!state.is_visible());

        state.activate(5.0);
        state.update_visual(5.0, 0.25, 0.7);
        assert!(state.is_visible());
    }
}
