//! Placement and visibility of a compartment's interior model.
//!
//! From outside, the model is hung under the compartment's own node so the
//! exterior camera sees it through the transparent hull. In first person it
//! goes back to the frame the host gave it in internal space, captured at the
//! last reset. That frame is only valid for one structural root and one
//! active vessel, so a change in either forces a reset.

use crate::config::PodConfig;
use crate::error::{InteriorError, Result};
use crate::host::{FlightState, Host, SceneKind, StartState};
use crate::roster::{CrewRoster, CrewRosterSynchronizer};
use crate::shaders::ShaderSwapManager;
use crate::system::SharedState;
use crate::view::ViewContext;
use engine_core::{NodeId, PartId, Quat, Transform, VesselId};
use std::f32::consts::FRAC_1_SQRT_2;

/// Maps the first-person internal frame onto the exterior part frame.
///
/// Used both when the model is previewed in the editor and when it is hung
/// under the part for the exterior view.
pub const CORRECTIVE_ROTATION: Quat = Quat::from_xyzw(0.0, FRAC_1_SQRT_2, -FRAC_1_SQRT_2, 0.0);

/// Blurb shown in the part's info panel.
pub const PART_INFO: &str = "The windows of this capsule have been carefully cleaned.";

/// Where the model sat in internal space after the last reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedFrame {
    pub parent: Option<NodeId>,
    pub local: Transform,
}

pub struct InteriorPlacementController {
    part: PartId,
    shaders: ShaderSwapManager,
    known_root: Option<PartId>,
    last_active_vessel: Option<VesselId>,
    frame: Option<CachedFrame>,
    warned_missing_model: bool,
}

impl InteriorPlacementController {
    /// Set up a compartment: swap its hull shaders, make sure it has a model
    /// and, in flight, take the first reset.
    pub fn start<H: Host + ?Sized>(
        part: PartId,
        config: &PodConfig,
        state: StartState,
        host: &mut H,
        shared: &mut SharedState,
    ) -> Self {
        log::info!("{}: cleaning pod windows", part);
        let mut controller = Self {
            part,
            shaders: ShaderSwapManager::build(host, part, config),
            known_root: None,
            last_active_vessel: None,
            frame: None,
            warned_missing_model: false,
        };

        if state == StartState::Editor {
            shared.gate.open_editor(host);
        }

        if host.interior_model(part).is_none() {
            if let Err(source) = host.create_interior_model(part) {
                log::error!("{}", InteriorError::ModelConstruction { part, source });
            }
        }

        match host.interior_model(part) {
            Some(model) if state == StartState::Editor => {
                if let Err(e) = host.set_local_transform(model, Transform::from_rotation(CORRECTIVE_ROTATION)) {
                    log::warn!("{}: could not orient editor preview: {}", part, e);
                }
            }
            Some(_) => {
                if let Err(e) = controller.reset_interior(host) {
                    log::error!("{}", e);
                }
            }
            None => {
                controller.warn_missing_model();
            }
        }
        controller
    }

    pub fn part(&self) -> PartId {
        self.part
    }

    pub fn info(&self) -> &'static str {
        PART_INFO
    }

    pub fn shaders(&self) -> &ShaderSwapManager {
        &self.shaders
    }

    /// Root the cached frame refers to.
    pub fn known_root(&self) -> Option<PartId> {
        self.known_root
    }

    /// Active vessel the cached frame refers to.
    pub fn last_active_vessel(&self) -> Option<VesselId> {
        self.last_active_vessel
    }

    pub fn cached_frame(&self) -> Option<CachedFrame> {
        self.frame
    }

    fn current_root<H: FlightState + ?Sized>(&self, host: &H) -> Option<PartId> {
        host.vessel_of(self.part).and_then(|v| host.root_part(v))
    }

    /// Log the missing model once per controller. Returns true if it logged.
    fn warn_missing_model(&mut self) -> bool {
        if self.warned_missing_model {
            return false;
        }
        log::error!("{}", InteriorError::MissingModel { part: self.part });
        self.warned_missing_model = true;
        true
    }

    /// Rebuild or re-seat the model and capture its first-person frame.
    ///
    /// On a root change the model is rebuilt from scratch, and a viewpoint
    /// inside it is kicked out first. A construction failure leaves the model
    /// absent and the cached identities untouched, so the next tick retries.
    pub fn reset_interior<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        if host.scene_kind() != SceneKind::Flight {
            return Ok(());
        }
        let part = self.part;
        log::info!("{}: resetting interior", part);

        let root = self.current_root(&*host);
        if root != self.known_root {
            if host.user_in_pod(part) {
                log::info!("{}: viewpoint is inside, forcing exterior view", part);
                host.force_exterior_view();
            }
            log::info!("{}: root changed, respawning interior model", part);
            host.create_interior_model(part)
                .map_err(|source| InteriorError::ModelConstruction { part, source })?;
        }

        let model = host
            .spawn_crew(part)
            .map_err(|source| InteriorError::ModelConstruction { part, source })?;
        let local = host
            .local_transform(model)
            .ok_or(InteriorError::MissingModel { part })?;
        self.frame = Some(CachedFrame {
            parent: host.parent(model),
            local,
        });
        self.known_root = root;
        self.last_active_vessel = host.active_vessel();
        Ok(())
    }

    /// One frame of work for this compartment alone.
    ///
    /// Returns the view context that was applied, or `None` when nothing was
    /// placed (outside flight, or no model).
    pub fn tick<H: Host + ?Sized>(&mut self, host: &mut H, shared: &mut SharedState) -> Option<ViewContext> {
        if host.scene_kind() != SceneKind::Flight {
            return None;
        }
        self.refresh(host);
        if let Some(sync) = self.synchronizer(&*host) {
            sync.synchronize(&mut shared.roster, &*host, self.part);
        }
        self.place(host, shared)
    }

    /// Reset if the root, the active vessel or the model itself changed.
    /// Returns true when a reset was attempted.
    pub fn refresh<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        let stale = self.current_root(&*host) != self.known_root
            || host.active_vessel() != self.last_active_vessel
            || host.interior_model(self.part).is_none();
        if !stale {
            return false;
        }
        if let Err(e) = self.reset_interior(host) {
            log::error!("{}", e);
        }
        if host.interior_model(self.part).is_none() {
            self.warn_missing_model();
        }
        true
    }

    /// Roster synchronizer for this compartment, if it belongs to the active vessel.
    pub fn synchronizer<H: FlightState + ?Sized>(&self, host: &H) -> Option<CrewRosterSynchronizer> {
        let active = host.active_vessel()?;
        (host.vessel_of(self.part) == Some(active)).then(|| CrewRosterSynchronizer::new(active))
    }

    /// Add this compartment's seated crew to the roster. Stowaways must already be gone.
    pub fn add_crew_portraits<H: Host + ?Sized>(&self, host: &H, roster: &mut CrewRoster) {
        if let Some(sync) = self.synchronizer(host) {
            sync.add_missing(roster, host, self.part);
        }
    }

    /// Put the model where the current view needs it.
    pub fn place<H: Host + ?Sized>(&mut self, host: &mut H, shared: &mut SharedState) -> Option<ViewContext> {
        let part = self.part;
        let model = host.interior_model(part)?;
        let context = ViewContext::of(&*host, part);
        match context {
            ViewContext::InteriorOwnPod | ViewContext::InteriorOtherPod => {
                if let Some(frame) = self.frame {
                    self.attach(host, model, frame.parent, frame.local);
                }
                host.set_model_visible(part, context == ViewContext::InteriorOwnPod);
                shared.gate.close(host);
                self.shaders.apply(host, false);
            }
            ViewContext::Exterior => {
                shared.gate.open(host);
                host.set_model_visible(part, true);
                self.shaders.apply(host, true);
                let node = host.part_node(part);
                self.attach(host, model, node, Transform::from_rotation(CORRECTIVE_ROTATION));
            }
        }
        Some(context)
    }

    fn attach<H: Host + ?Sized>(&self, host: &mut H, model: NodeId, parent: Option<NodeId>, local: Transform) {
        let result = host
            .set_parent(model, parent)
            .and_then(|()| host.set_local_transform(model, local));
        if let Err(e) = result {
            log::warn!("{}: could not place interior model: {}", self.part, e);
        }
    }

    /// The compartment is going away; don't leave the exterior camera showing interiors.
    pub fn on_destroy<H: Host + ?Sized>(&self, host: &mut H, shared: &mut SharedState) {
        shared.gate.close(host);
    }

    /// The part left physics range.
    pub fn on_pack<H: Host + ?Sized>(&self, host: &mut H, shared: &mut SharedState) {
        shared.gate.close(host);
    }
}
