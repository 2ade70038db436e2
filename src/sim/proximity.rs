//! Per-tick zone proximity tracking
//!
//! Each zone is either the current zone or not. Entering one updates the
//! waypoint highlight and may auto-show its panel; leaving it only clears
//! the current zone.

use super::modal::ModalCoordinator;
use super::navigation::NavigationAnimator;
use super::state::SimEvent;
use super::vehicle::VehicleState;
use super::zone::WorldLayout;

/// Check every zone against the vehicle position, in layout order
pub fn track_zones(
    layout: &WorldLayout,
    vehicle: &VehicleState,
    navigation: &NavigationAnimator,
    modal: &mut ModalCoordinator,
    events: &mut Vec<SimEvent>,
) {
    let navigating = navigation.is_navigating();
    let target = navigation.target_zone();

    for zone in layout.zones() {
        let distance = zone.distance_to(vehicle.pos);

        if distance <= zone.proximity_radius {
            if modal.current_zone() != Some(zone.id) {
                log::info!("Entered {} zone", zone.id);
                modal.set_current_zone(zone.id);
                events.push(SimEvent::ZoneEntered(zone.id));
                modal.set_highlight(Some(zone.id), events);

                if modal.should_auto_show(zone.id, navigating, target) {
                    modal.show_zone(zone.id, events);
                }
            }
        } else if modal.clear_current_zone(zone.id) {
            log::debug!("Left {} zone", zone.id);
            events.push(SimEvent::ZoneLeft(zone.id));
        }
    }
}
