//! Capabilities consumed from the host game.
//!
//! The controllers never own scene nodes, models or vessels. They hold ids and
//! ask the host through these traits, which keeps them testable against a
//! headless host (see [`crate::sim::SimHost`]).

use crate::HostError;
use engine_core::{CrewId, NodeId, PartId, ShaderId, Transform, VesselId};

/// Which scene the host has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Live simulation.
    Flight,
    /// Design/preview scene.
    Editor,
    /// Menus, map views and anything else without interiors.
    Other,
}

/// Scene a compartment was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartState {
    Editor,
    Flight,
}

/// Where the player's viewpoint currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Third-person view of the vessel.
    Exterior,
    /// First-person view from a seat inside some compartment.
    FirstPerson,
}

/// Vessel, part and viewpoint queries.
pub trait FlightState {
    fn scene_kind(&self) -> SceneKind;

    fn active_vessel(&self) -> Option<VesselId>;

    fn vessel_of(&self, part: PartId) -> Option<VesselId>;

    /// Structural root of `vessel`.
    fn root_part(&self, vessel: VesselId) -> Option<PartId>;

    /// The part's own scene node.
    fn part_node(&self, part: PartId) -> Option<NodeId>;

    fn camera_mode(&self) -> CameraMode;

    /// True when the first-person viewpoint is inside `part`.
    fn user_in_pod(&self, part: PartId) -> bool;

    /// Kick the viewpoint back to the exterior camera.
    fn force_exterior_view(&mut self);

    /// Vessel the crew member is physically aboard.
    fn crew_vessel(&self, crew: CrewId) -> Option<VesselId>;
}

/// Interior model lifecycle. Models are host-owned; callers only request.
pub trait InteriorModels {
    /// Root node of the part's interior model, if it exists.
    fn interior_model(&self, part: PartId) -> Option<NodeId>;

    /// Destroy any existing model and build a fresh one with all its props and seats.
    fn create_interior_model(&mut self, part: PartId) -> Result<NodeId, HostError>;

    /// Ensure the model exists, move it to its first-person location and seat the crew.
    fn spawn_crew(&mut self, part: PartId) -> Result<NodeId, HostError>;

    /// Occupant of every seat of the part's model, in seat order.
    fn seat_occupants(&self, part: PartId) -> Vec<Option<CrewId>>;

    fn set_model_visible(&mut self, part: PartId, visible: bool);
}

/// Scene hierarchy access.
pub trait SceneNodes {
    /// Search the part's model hierarchy for a node by name.
    fn find_model_node(&self, part: PartId, name: &str) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), HostError>;

    fn local_transform(&self, node: NodeId) -> Option<Transform>;

    fn set_local_transform(&mut self, node: NodeId, transform: Transform) -> Result<(), HostError>;

    /// Shader of the node's material, if it has one.
    fn shader(&self, node: NodeId) -> Option<ShaderId>;

    fn set_shader(&mut self, node: NodeId, shader: ShaderId) -> Result<(), HostError>;
}

pub trait ShaderLibrary {
    fn find_shader(&self, name: &str) -> Option<ShaderId>;
}

/// Camera culling masks, addressed by camera name.
pub trait CameraMasks {
    fn culling_mask(&self, camera: &str) -> Option<u32>;

    /// Returns false when no camera has that name.
    fn set_culling_mask(&mut self, camera: &str, mask: u32) -> bool;
}

/// Everything a placement controller needs from the host.
pub trait Host: FlightState + InteriorModels + SceneNodes + ShaderLibrary + CameraMasks {}

impl<T> Host for T where T: FlightState + InteriorModels + SceneNodes + ShaderLibrary + CameraMasks {}
