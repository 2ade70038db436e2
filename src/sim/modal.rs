//! Info panel coordination
//!
//! Single source of truth for whether the panel is open, which zone the
//! scooter is standing in, which zones have already auto-shown, and which
//! waypoint is highlighted. Every change is reported as a `SimEvent`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::state::SimEvent;
use super::zone::ZoneId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModalCoordinator {
    open: bool,
    /// Zone whose panel is showing (kept after close for re-render)
    shown: Option<ZoneId>,
    /// Zone the vehicle is currently inside
    current_zone: Option<ZoneId>,
    /// Zones auto-shown since the last reset
    visited: BTreeSet<ZoneId>,
    /// Highlighted waypoint control
    highlight: Option<ZoneId>,
}

impl ModalCoordinator {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn shown_zone(&self) -> Option<ZoneId> {
        if self.open { self.shown } else { None }
    }

    pub fn current_zone(&self) -> Option<ZoneId> {
        self.current_zone
    }

    pub fn has_visited(&self, zone: ZoneId) -> bool {
        self.visited.contains(&zone)
    }

    pub fn visited(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.visited.iter().copied()
    }

    pub fn highlighted(&self) -> Option<ZoneId> {
        self.highlight
    }

    pub fn set_current_zone(&mut self, zone: ZoneId) {
        self.current_zone = Some(zone);
    }

    /// Forget the current zone if it is `zone`; the visited set is untouched
    pub fn clear_current_zone(&mut self, zone: ZoneId) -> bool {
        if self.current_zone == Some(zone) {
            self.current_zone = None;
            true
        } else {
            false
        }
    }

    /// Auto-show rule for a zone that was just entered: never interrupt a
    /// glide for a zone merely passed through, never stack on an open
    /// panel, never repeat a zone already seen this session.
    pub fn should_auto_show(
        &self,
        zone: ZoneId,
        navigating: bool,
        navigation_target: Option<ZoneId>,
    ) -> bool {
        (!navigating || navigation_target == Some(zone)) && !self.open && !self.has_visited(zone)
    }

    /// Move the waypoint highlight, reporting only real changes
    pub fn set_highlight(&mut self, zone: Option<ZoneId>, events: &mut Vec<SimEvent>) {
        if self.highlight != zone {
            self.highlight = zone;
            events.push(SimEvent::WaypointHighlighted(zone));
        }
    }

    /// Open the panel for `zone` and mark it visited. Used both by the
    /// auto-show path and by explicit clicks, which skip the predicate.
    pub fn show_zone(&mut self, zone: ZoneId, events: &mut Vec<SimEvent>) {
        log::info!("Showing {zone} panel");
        self.open = true;
        self.shown = Some(zone);
        self.visited.insert(zone);
        events.push(SimEvent::ModalOpened(zone));
    }

    /// Close the panel and clear the waypoint highlight. Current zone and
    /// visited set are left alone.
    pub fn close(&mut self, events: &mut Vec<SimEvent>) {
        if self.open {
            log::info!("Closing panel");
            self.open = false;
            events.push(SimEvent::ModalClosed);
        }
        self.set_highlight(None, events);
    }

    /// Close and forget everything: visited set and current zone too
    pub fn reset(&mut self, events: &mut Vec<SimEvent>) {
        self.close(events);
        self.shown = None;
        self.visited.clear();
        self.current_zone = None;
    }
}
