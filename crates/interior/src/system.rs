//! Per-frame driver for every compartment in the scene.
//!
//! The host calls [`InteriorSystem::update`], [`InteriorSystem::gui_draw`] and
//! [`InteriorSystem::post_render`] once per frame, in that order. The order is
//! enforced with a [`FrameClock`]: a phase entered out of order is refused
//! rather than run against state the earlier phase has not produced yet.

use crate::config::{GateConfig, PodConfig};
use crate::follower::FollowerVisibilityController;
use crate::gate::CameraCullingGate;
use crate::host::{Host, SceneKind, StartState};
use crate::placement::InteriorPlacementController;
use crate::roster::{CrewRoster, CrewRosterSynchronizer};
use crate::view::ViewContext;
use engine_core::{FrameClock, FramePhase, PartId, PhaseError};

/// State shared by every compartment. Passed explicitly to whoever needs it.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    pub roster: CrewRoster,
    pub gate: CameraCullingGate,
}

impl SharedState {
    pub fn new(gate: GateConfig) -> Self {
        Self {
            roster: CrewRoster::new(),
            gate: CameraCullingGate::new(gate),
        }
    }
}

/// Owns the controllers, followers and shared state for one scene.
#[derive(Default)]
pub struct InteriorSystem {
    shared: SharedState,
    clock: FrameClock,
    pods: Vec<InteriorPlacementController>,
    followers: Vec<FollowerVisibilityController>,
}

impl InteriorSystem {
    pub fn new(gate: GateConfig) -> Self {
        Self {
            shared: SharedState::new(gate),
            ..Default::default()
        }
    }

    pub fn roster(&self) -> &CrewRoster {
        &self.shared.roster
    }

    pub fn gate(&self) -> &CameraCullingGate {
        &self.shared.gate
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    pub fn pod(&self, part: PartId) -> Option<&InteriorPlacementController> {
        self.pods.iter().find(|p| p.part() == part)
    }

    /// Start a compartment that owns its placement.
    pub fn add_pod<H: Host + ?Sized>(&mut self, host: &mut H, part: PartId, config: &PodConfig, state: StartState) {
        if self.pod(part).is_some() {
            log::warn!("{} already has a placement controller", part);
            return;
        }
        let controller = InteriorPlacementController::start(part, config, state, host, &mut self.shared);
        self.pods.push(controller);
    }

    /// Register a compartment with an interior but no placement controller.
    pub fn add_follower(&mut self, part: PartId) {
        if self.pod(part).is_some() || self.followers.iter().any(|f| f.part() == part) {
            log::warn!("{} is already managed", part);
            return;
        }
        self.followers.push(FollowerVisibilityController::new(part));
    }

    /// Tear a compartment down. Closes the gate if it owned placement.
    pub fn remove_compartment<H: Host + ?Sized>(&mut self, host: &mut H, part: PartId) {
        if let Some(i) = self.pods.iter().position(|p| p.part() == part) {
            let controller = self.pods.remove(i);
            controller.on_destroy(host, &mut self.shared);
        }
        self.followers.retain(|f| f.part() != part);
    }

    /// A compartment was packed (left physics range).
    pub fn pack_compartment<H: Host + ?Sized>(&mut self, host: &mut H, part: PartId) {
        if let Some(controller) = self.pods.iter().find(|p| p.part() == part) {
            controller.on_pack(host, &mut self.shared);
        }
    }

    /// The simulation paused; nothing owns the interiors while it is.
    pub fn on_pause<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.shared.gate.close(host);
    }

    /// General update phase.
    ///
    /// Every compartment refreshes first. Stowaways are then removed once for
    /// the active vessel before any compartment adds its seated crew, and
    /// placement runs last. Returns the view context applied per compartment.
    pub fn update<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Vec<(PartId, ViewContext)>, PhaseError> {
        self.clock.enter(FramePhase::Update)?;
        if host.scene_kind() != SceneKind::Flight {
            return Ok(Vec::new());
        }

        for pod in &mut self.pods {
            pod.refresh(host);
        }

        if let Some(active) = host.active_vessel() {
            let owns_active = self.pods.iter().any(|p| p.synchronizer(&*host).is_some());
            if owns_active {
                CrewRosterSynchronizer::new(active).remove_stowaways(&mut self.shared.roster, &*host);
                for pod in &self.pods {
                    pod.add_crew_portraits(&*host, &mut self.shared.roster);
                }
            }
        }

        let mut placed = Vec::with_capacity(self.pods.len());
        for pod in &mut self.pods {
            if let Some(context) = pod.place(host, &mut self.shared) {
                placed.push((pod.part(), context));
            }
        }
        Ok(placed)
    }

    /// GUI-draw phase: followers show their models for portrait sampling.
    pub fn gui_draw<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), PhaseError> {
        self.clock.enter(FramePhase::GuiDraw)?;
        for follower in &self.followers {
            follower.on_gui(host, &self.shared.gate);
        }
        Ok(())
    }

    /// Post-render phase: followers hide their models again.
    pub fn post_render<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), PhaseError> {
        self.clock.enter(FramePhase::PostRender)?;
        for follower in &self.followers {
            follower.on_post_render(host, &self.shared.gate);
        }
        Ok(())
    }

    /// All three phases in order.
    pub fn run_frame<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Vec<(PartId, ViewContext)>, PhaseError> {
        let placed = self.update(host)?;
        self.gui_draw(host)?;
        self.post_render(host)?;
        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FlightState, InteriorModels};
    use crate::sim::SimHost;
    use engine_core::{CrewId, Vec3, VesselId};
    use std::collections::BTreeSet;

    struct Ship {
        host: SimHost,
        system: InteriorSystem,
        vessel: VesselId,
        c: PartId,
        d: PartId,
        e: PartId,
    }

    /// C and D carry placement controllers, E is a follower.
    fn ship() -> Ship {
        let mut host = SimHost::new();
        host.add_shader("Transparent/Specular");
        let vessel = host.add_vessel();
        let c = host.add_part(vessel, Vec3::ZERO, 2, &["window"]);
        let d = host.add_part(vessel, Vec3::new(0.0, -2.0, 0.0), 2, &["window"]);
        let e = host.add_part(vessel, Vec3::new(0.0, -4.0, 0.0), 1, &[]);
        host.set_active_vessel(Some(vessel));
        host.spawn_crew(e).unwrap();
        let config = PodConfig {
            transparent_transforms: "window".to_string(),
            ..Default::default()
        };
        let mut system = InteriorSystem::new(GateConfig::default());
        system.add_pod(&mut host, c, &config, StartState::Flight);
        system.add_pod(&mut host, d, &config, StartState::Flight);
        system.add_follower(e);
        Ship {
            host,
            system,
            vessel,
            c,
            d,
            e,
        }
    }

    fn seated_in(host: &SimHost, vessel: VesselId, parts: &[PartId]) -> BTreeSet<CrewId> {
        parts
            .iter()
            .filter(|&&p| host.vessel_of(p) == Some(vessel))
            .flat_map(|&p| host.seat_occupants(p))
            .flatten()
            .collect()
    }

    #[test]
    fn roster_matches_seated_crew_every_frame() {
        let mut s = ship();
        let a = s.host.add_crew(s.c, 0).unwrap();
        s.host.add_crew(s.d, 1).unwrap();
        let probe_vessel = s.host.add_vessel();
        let probe = s.host.add_part(probe_vessel, Vec3::new(50.0, 0.0, 0.0), 1, &[]);
        s.system.shared.roster.add(CrewId(4242));

        s.system.run_frame(&mut s.host).unwrap();
        let parts = [s.c, s.d, s.e];
        let roster: BTreeSet<_> = s.system.roster().members().iter().copied().collect();
        assert_eq!(roster, seated_in(&s.host, s.vessel, &parts));

        // Crew member transfers to a vessel that is not active.
        assert!(s.host.move_crew(a, probe, 0));
        s.system.run_frame(&mut s.host).unwrap();
        let roster: BTreeSet<_> = s.system.roster().members().iter().copied().collect();
        assert_eq!(roster, seated_in(&s.host, s.vessel, &parts));
        assert!(!s.system.roster().contains(a));
        assert_eq!(s.system.roster().len(), roster.len());
    }

    #[test]
    fn exactly_one_context_per_pod_per_frame() {
        let mut s = ship();
        s.host.enter_first_person(s.d);
        let placed = s.system.run_frame(&mut s.host).unwrap();
        assert_eq!(
            placed,
            vec![(s.c, ViewContext::InteriorOtherPod), (s.d, ViewContext::InteriorOwnPod)]
        );
        assert_eq!(s.host.model_visible(s.c), Some(false));
        assert!(!s.system.gate().shows_interior());
    }

    #[test]
    fn follower_hidden_after_exterior_frame() {
        let mut s = ship();
        s.system.update(&mut s.host).unwrap();
        assert!(s.system.gate().shows_interior());
        s.system.gui_draw(&mut s.host).unwrap();
        assert_eq!(s.host.model_visible(s.e), Some(true));
        s.system.post_render(&mut s.host).unwrap();
        assert_eq!(s.host.model_visible(s.e), Some(false));
        assert_eq!(s.host.model_visible(s.c), Some(true));
    }

    #[test]
    fn phases_out_of_order_are_refused() {
        let mut s = ship();
        assert!(s.system.gui_draw(&mut s.host).is_err());
        s.system.update(&mut s.host).unwrap();
        s.system.post_render(&mut s.host).unwrap();
        let err = s.system.gui_draw(&mut s.host).unwrap_err();
        assert_eq!(err.attempted, FramePhase::GuiDraw);
        assert_eq!(s.system.frame_count(), 1);
    }

    #[test]
    fn docking_rebuilds_each_pod_once() {
        let mut s = ship();
        s.system.run_frame(&mut s.host).unwrap();
        let before = (s.host.construction_count(s.c), s.host.construction_count(s.d));
        let station = s.host.add_vessel();
        let hub = s.host.add_part(station, Vec3::new(0.0, 8.0, 0.0), 0, &[]);
        s.host.dock(s.vessel, station);
        s.system.run_frame(&mut s.host).unwrap();
        s.system.run_frame(&mut s.host).unwrap();
        assert_eq!(s.host.construction_count(s.c), before.0 + 1);
        assert_eq!(s.host.construction_count(s.d), before.1 + 1);
        assert_eq!(s.system.pod(s.c).and_then(|p| p.known_root()), Some(hub));
    }

    #[test]
    fn removing_a_pod_closes_the_gate() {
        let mut s = ship();
        s.system.run_frame(&mut s.host).unwrap();
        assert!(s.system.gate().shows_interior());
        s.system.remove_compartment(&mut s.host, s.c);
        assert!(!s.system.gate().shows_interior());
        assert!(s.system.pod(s.c).is_none());
    }

    #[test]
    fn pause_and_pack_close_the_gate() {
        let mut s = ship();
        s.system.run_frame(&mut s.host).unwrap();
        s.system.on_pause(&mut s.host);
        assert!(!s.system.gate().shows_interior());
        s.system.run_frame(&mut s.host).unwrap();
        s.system.pack_compartment(&mut s.host, s.d);
        assert!(!s.system.gate().shows_interior());
    }

    #[test]
    fn outside_flight_update_places_nothing() {
        let mut s = ship();
        s.host.set_scene_kind(SceneKind::Editor);
        assert!(s.system.update(&mut s.host).unwrap().is_empty());
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut s = ship();
        s.system.add_follower(s.c);
        s.system.add_pod(&mut s.host, s.c, &PodConfig::default(), StartState::Flight);
        let placed = s.system.run_frame(&mut s.host).unwrap();
        assert_eq!(placed.len(), 2);
    }
}
