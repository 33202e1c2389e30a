//! Visibility for compartments that have an interior but no placement controller.
//!
//! Such a compartment's model sits wherever the host put it. While the gate is
//! open it would show up on the exterior camera at the wrong place, so it is
//! shown only while portraits are being drawn and hidden again before the
//! scene renders.

use crate::gate::CameraCullingGate;
use crate::host::{FlightState, InteriorModels};
use engine_core::PartId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowerVisibilityController {
    part: PartId,
}

impl FollowerVisibilityController {
    pub fn new(part: PartId) -> Self {
        Self { part }
    }

    pub fn part(&self) -> PartId {
        self.part
    }

    fn applies<H: FlightState + InteriorModels + ?Sized>(&self, host: &H, gate: &CameraCullingGate) -> bool {
        gate.shows_interior()
            && host.active_vessel().is_some()
            && host.vessel_of(self.part) == host.active_vessel()
            && host.interior_model(self.part).is_some()
    }

    /// GUI-draw phase: portraits sample the model, so it must be visible.
    pub fn on_gui<H: FlightState + InteriorModels + ?Sized>(&self, host: &mut H, gate: &CameraCullingGate) {
        if self.applies(&*host, gate) {
            host.set_model_visible(self.part, true);
        }
    }

    /// Post-render phase: hide the model unless the viewpoint is inside it.
    pub fn on_post_render<H: FlightState + InteriorModels + ?Sized>(&self, host: &mut H, gate: &CameraCullingGate) {
        if self.applies(&*host, gate) && !host.user_in_pod(self.part) {
            host.set_model_visible(self.part, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimHost;
    use engine_core::Vec3;

    fn setup() -> (SimHost, PartId, CameraCullingGate) {
        let mut host = SimHost::new();
        let v = host.add_vessel();
        let part = host.add_part(v, Vec3::ZERO, 1, &[]);
        host.set_active_vessel(Some(v));
        host.spawn_crew(part).unwrap();
        (host, part, CameraCullingGate::default())
    }

    #[test]
    fn closed_gate_leaves_model_alone() {
        let (mut host, part, gate) = setup();
        host.set_model_visible(part, false);
        FollowerVisibilityController::new(part).on_gui(&mut host, &gate);
        assert_eq!(host.model_visible(part), Some(false));
    }

    #[test]
    fn open_gate_shows_for_gui_then_hides_after_render() {
        let (mut host, part, mut gate) = setup();
        gate.open(&mut host);
        host.set_model_visible(part, false);
        let follower = FollowerVisibilityController::new(part);
        follower.on_gui(&mut host, &gate);
        assert_eq!(host.model_visible(part), Some(true));
        follower.on_post_render(&mut host, &gate);
        assert_eq!(host.model_visible(part), Some(false));
    }

    #[test]
    fn viewpoint_inside_keeps_model_visible_after_render() {
        let (mut host, part, mut gate) = setup();
        gate.open(&mut host);
        host.enter_first_person(part);
        let follower = FollowerVisibilityController::new(part);
        follower.on_gui(&mut host, &gate);
        follower.on_post_render(&mut host, &gate);
        assert_eq!(host.model_visible(part), Some(true));
    }

    #[test]
    fn inactive_vessel_is_ignored() {
        let (mut host, part, mut gate) = setup();
        gate.open(&mut host);
        let elsewhere = host.add_vessel();
        host.set_active_vessel(Some(elsewhere));
        host.set_model_visible(part, false);
        FollowerVisibilityController::new(part).on_gui(&mut host, &gate);
        assert_eq!(host.model_visible(part), Some(false));
    }

    #[test]
    fn entering_a_hidden_follower_shows_it_with_gate_closed() {
        let (mut host, part, mut gate) = setup();
        gate.open(&mut host);
        let follower = FollowerVisibilityController::new(part);
        follower.on_gui(&mut host, &gate);
        follower.on_post_render(&mut host, &gate);
        assert_eq!(host.model_visible(part), Some(false));
        gate.close(&mut host);
        host.enter_first_person(part);
        follower.on_gui(&mut host, &gate);
        follower.on_post_render(&mut host, &gate);
        assert_eq!(host.model_visible(part), Some(true));
    }
}
