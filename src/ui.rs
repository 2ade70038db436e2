//! Display sink seam between the simulation and the page
//!
//! The simulation only raises `SimEvent`s. `UiDispatcher` turns them into
//! calls on a `DisplaySink`: the DOM in the browser, a recorder in tests and
//! the native host.

use crate::content::CvData;
use crate::sim::{SimEvent, ZoneId};

/// Where panel, waypoint and status output goes.
///
/// Implementations treat missing targets as no-ops.
pub trait DisplaySink {
    fn show_panel(&mut self, zone: ZoneId, html: &str);
    fn hide_panel(&mut self);
    fn set_active_waypoint(&mut self, zone: Option<ZoneId>);
    fn set_status(&mut self, text: &str);
}

/// Human label for a zone, used in status lines
pub fn zone_label(zone: ZoneId) -> &'static str {
    match zone {
        ZoneId::Experience => "Experience",
        ZoneId::Skills => "Skills",
        ZoneId::Projects => "Projects",
        ZoneId::Education => "Education",
        ZoneId::Contact => "Contact",
    }
}

/// Routes simulation events to a sink, rendering panels from the CV
pub struct UiDispatcher {
    cv: CvData,
}

impl UiDispatcher {
    pub fn new(cv: CvData) -> Self {
        Self { cv }
    }

    /// Apply events in order
    pub fn dispatch(&self, events: &[SimEvent], sink: &mut dyn DisplaySink) {
        for event in events {
            self.apply(*event, sink);
        }
    }

    fn apply(&self, event: SimEvent, sink: &mut dyn DisplaySink) {
        match event {
            SimEvent::ModalOpened(zone) => {
                let html = self.cv.panel_html(zone);
                sink.show_panel(zone, &html);
            }
            SimEvent::ModalClosed => sink.hide_panel(),
            SimEvent::WaypointHighlighted(zone) => sink.set_active_waypoint(zone),
            SimEvent::ZoneEntered(zone) => {
                sink.set_status(&format!("{} zone", zone_label(zone)));
            }
            SimEvent::ZoneLeft(_) => sink.set_status("Exploring"),
            SimEvent::NavigationStarted(zone) => {
                sink.set_status(&format!("Heading to {}", zone_label(zone)));
            }
            SimEvent::NavigationFinished(zone) => {
                sink.set_status(&format!("Arrived at {}", zone_label(zone)));
            }
            SimEvent::WorldReset => sink.set_status("Back at the start"),
            SimEvent::Ready => sink.set_status("WASD to ride, Shift to boost, R to reset"),
        }
    }
}

/// One recorded sink call
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    ShowPanel(ZoneId),
    HidePanel,
    ActiveWaypoint(Option<ZoneId>),
    Status(String),
}

/// Sink that remembers every call; used by tests and the native host
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
    /// Last panel markup shown
    pub last_html: Option<String>,
}

impl RecordingSink {
    /// Number of panels opened for `zone`
    pub fn panels_for(&self, zone: ZoneId) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == SinkCall::ShowPanel(zone))
            .count()
    }
}

impl DisplaySink for RecordingSink {
    fn show_panel(&mut self, zone: ZoneId, html: &str) {
        self.calls.push(SinkCall::ShowPanel(zone));
        self.last_html = Some(html.to_string());
    }

    fn hide_panel(&mut self) {
        self.calls.push(SinkCall::HidePanel);
    }

    fn set_active_waypoint(&mut self, zone: Option<ZoneId>) {
        self.calls.push(SinkCall::ActiveWaypoint(zone));
    }

    fn set_status(&mut self, text: &str) {
        log::debug!("status: {text}");
        self.calls.push(SinkCall::Status(text.to_string()));
    }
}

/// Browser sink writing into the page's panel, waypoint and status elements
#[cfg(target_arch = "wasm32")]
pub mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element};

    use super::DisplaySink;
    use crate::sim::ZoneId;

    pub struct DomSink {
        document: Document,
    }

    impl DomSink {
        pub fn new(document: Document) -> Self {
            Self { document }
        }

        fn waypoints(&self) -> Vec<Element> {
            let Ok(list) = self.document.query_selector_all(".waypoint") else {
                return Vec::new();
            };
            (0..list.length())
                .filter_map(|i| list.get(i))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect()
        }
    }

    impl DisplaySink for DomSink {
        fn show_panel(&mut self, _zone: ZoneId, html: &str) {
            if let Some(body) = self.document.get_element_by_id("modal-body") {
                body.set_inner_html(html);
            }
            if let Some(overlay) = self.document.get_element_by_id("modal-overlay") {
                let _ = overlay.class_list().remove_1("hidden");
            }
        }

        fn hide_panel(&mut self) {
            if let Some(overlay) = self.document.get_element_by_id("modal-overlay") {
                let _ = overlay.class_list().add_1("hidden");
            }
        }

        fn set_active_waypoint(&mut self, zone: Option<ZoneId>) {
            let active = zone.map(|z| z.as_str());
            for wp in self.waypoints() {
                let is_active = wp.get_attribute("data-zone").as_deref() == active;
                let _ = wp.class_list().toggle_with_force("active", is_active);
            }
        }

        fn set_status(&mut self, text: &str) {
            if let Some(el) = self.document.get_element_by_id("status") {
                el.set_text_content(Some(text));
            }
        }
    }
}
