//! Headless host: vessels, parts, crew and cameras held in memory.
//!
//! Implements every host trait over an [`engine_core::SceneGraph`] so the
//! controllers can be driven without a game attached. Interior models are
//! built under a shared "internal space" node at a location that depends on
//! the part's offset from its vessel's root, which is what makes a root change
//! invalidate the cached frame.

use crate::host::{CameraMode, CameraMasks, FlightState, InteriorModels, SceneKind, SceneNodes, ShaderLibrary};
use crate::HostError;
use engine_core::{CrewId, NodeId, PartId, Quat, SceneGraph, ShaderId, Transform, Vec3, VesselId};
use std::collections::BTreeMap;

/// Shader every part surface starts with.
pub const DEFAULT_SURFACE_SHADER: &str = "KSP/Diffuse";

/// Rotation of internal space relative to the part frame.
const INTERNAL_SPACE_ROTATION: Quat = Quat::from_xyzw(
    -std::f32::consts::FRAC_1_SQRT_2,
    0.0,
    0.0,
    std::f32::consts::FRAC_1_SQRT_2,
);

/// Scale of internal space relative to flight space.
const INTERNAL_SPACE_SCALE: f32 = 0.1;

#[derive(Debug)]
struct SimVessel {
    root: PartId,
}

#[derive(Debug)]
struct SimPart {
    vessel: VesselId,
    node: NodeId,
    offset: Vec3,
    /// Assigned crew per seat, whether or not the model has spawned them.
    crew: Vec<Option<CrewId>>,
    model: Option<SimModel>,
}

#[derive(Debug)]
struct SimModel {
    node: NodeId,
    crew_spawned: bool,
}

/// In-memory host.
pub struct SimHost {
    pub scene: SceneGraph,
    scene_kind: SceneKind,
    camera_mode: CameraMode,
    user_pod: Option<PartId>,
    active_vessel: Option<VesselId>,
    internal_space: NodeId,
    vessels: BTreeMap<VesselId, SimVessel>,
    parts: BTreeMap<PartId, SimPart>,
    seats: BTreeMap<CrewId, (PartId, usize)>,
    shaders: BTreeMap<String, ShaderId>,
    cameras: BTreeMap<String, u32>,
    pending_failures: BTreeMap<PartId, u32>,
    constructions: BTreeMap<PartId, u32>,
    forced_exterior: u32,
    next_id: u32,
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimHost {
    /// A flight scene with no vessels, the stock cameras and surface shader.
    pub fn new() -> Self {
        let mut scene = SceneGraph::new();
        let internal_space = scene.spawn("InternalSpace", None, Transform::IDENTITY);
        let mut host = Self {
            scene,
            scene_kind: SceneKind::Flight,
            camera_mode: CameraMode::Exterior,
            user_pod: None,
            active_vessel: None,
            internal_space,
            vessels: BTreeMap::new(),
            parts: BTreeMap::new(),
            seats: BTreeMap::new(),
            shaders: BTreeMap::new(),
            cameras: BTreeMap::new(),
            pending_failures: BTreeMap::new(),
            constructions: BTreeMap::new(),
            forced_exterior: 0,
            next_id: 1,
        };
        host.add_shader(DEFAULT_SURFACE_SHADER);
        host.add_camera("Camera 00", 1);
        host.add_camera("Main Camera", 1);
        host
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_shader(&mut self, name: &str) -> ShaderId {
        if let Some(&id) = self.shaders.get(name) {
            return id;
        }
        let id = ShaderId(self.next_id());
        self.shaders.insert(name.to_string(), id);
        id
    }

    pub fn add_camera(&mut self, name: &str, mask: u32) {
        self.cameras.insert(name.to_string(), mask);
    }

    pub fn set_scene_kind(&mut self, kind: SceneKind) {
        self.scene_kind = kind;
    }

    /// Create an empty vessel. Its first part becomes the root.
    pub fn add_vessel(&mut self) -> VesselId {
        VesselId(self.next_id())
    }

    pub fn set_active_vessel(&mut self, vessel: Option<VesselId>) {
        self.active_vessel = vessel;
    }

    /// Add a part with `seat_count` seats and one see-through-capable node per surface name.
    pub fn add_part(&mut self, vessel: VesselId, offset: Vec3, seat_count: usize, surfaces: &[&str]) -> PartId {
        let part = PartId(self.next_id());
        let node = self.scene.spawn(&format!("part{}", part.0), None, Transform::from_position(offset));
        let surface_shader = self.add_shader(DEFAULT_SURFACE_SHADER);
        let model_root = self.scene.spawn("model", Some(node), Transform::IDENTITY);
        for name in surfaces {
            self.scene
                .spawn_with_material(name, Some(model_root), Transform::IDENTITY, surface_shader);
        }
        self.vessels.entry(vessel).or_insert(SimVessel { root: part });
        self.parts.insert(
            part,
            SimPart {
                vessel,
                node,
                offset,
                crew: vec![None; seat_count],
                model: None,
            },
        );
        part
    }

    /// Put a new crew member in `seat` of `part`.
    pub fn add_crew(&mut self, part: PartId, seat: usize) -> Option<CrewId> {
        let crew = CrewId(self.next_id());
        self.move_crew(crew, part, seat).then_some(crew)
    }

    /// Move a crew member to another seat, possibly on another vessel.
    pub fn move_crew(&mut self, crew: CrewId, part: PartId, seat: usize) -> bool {
        let free = self
            .parts
            .get(&part)
            .and_then(|p| p.crew.get(seat))
            .is_some_and(|s| s.is_none());
        if !free {
            return false;
        }
        if let Some((old_part, old_seat)) = self.seats.remove(&crew) {
            if let Some(p) = self.parts.get_mut(&old_part) {
                p.crew[old_seat] = None;
            }
        }
        if let Some(p) = self.parts.get_mut(&part) {
            p.crew[seat] = Some(crew);
        }
        self.seats.insert(crew, (part, seat));
        true
    }

    /// Merge `absorbed` into `into`. The merged vessel keeps `into`'s root.
    pub fn dock(&mut self, absorbed: VesselId, into: VesselId) {
        if absorbed == into || !self.vessels.contains_key(&into) {
            return;
        }
        self.vessels.remove(&absorbed);
        for part in self.parts.values_mut() {
            if part.vessel == absorbed {
                part.vessel = into;
            }
        }
        if self.active_vessel == Some(absorbed) {
            self.active_vessel = Some(into);
        }
    }

    /// Split `parts` off into a new vessel rooted at the first of them.
    pub fn undock(&mut self, parts: &[PartId]) -> Option<VesselId> {
        let root = *parts.first()?;
        let old = self.parts.get(&root)?.vessel;
        let vessel = self.add_vessel();
        for part in parts {
            if let Some(p) = self.parts.get_mut(part) {
                p.vessel = vessel;
            }
        }
        self.vessels.insert(vessel, SimVessel { root });
        if self.vessels.get(&old).is_some_and(|v| parts.contains(&v.root)) {
            let remaining = self.parts.iter().find(|(_, p)| p.vessel == old).map(|(id, _)| *id);
            match remaining {
                Some(new_root) => self.vessels.insert(old, SimVessel { root: new_root }),
                None => self.vessels.remove(&old),
            };
        }
        Some(vessel)
    }

    /// Move the viewpoint into first person in `part`. The entered interior is shown.
    pub fn enter_first_person(&mut self, part: PartId) {
        self.camera_mode = CameraMode::FirstPerson;
        self.user_pod = Some(part);
        self.set_model_visible(part, true);
    }

    pub fn exit_to_exterior(&mut self) {
        self.camera_mode = CameraMode::Exterior;
        self.user_pod = None;
    }

    /// Make the next `count` model constructions of `part` fail.
    pub fn fail_next_constructions(&mut self, part: PartId, count: u32) {
        self.pending_failures.insert(part, count);
    }

    /// Destroy the part's model without rebuilding it.
    pub fn destroy_model(&mut self, part: PartId) {
        if let Some(model) = self.parts.get_mut(&part).and_then(|p| p.model.take()) {
            let _ = self.scene.despawn_recursive(model.node);
        }
    }

    /// Successful model constructions of `part` so far.
    pub fn construction_count(&self, part: PartId) -> u32 {
        self.constructions.get(&part).copied().unwrap_or(0)
    }

    /// How many times the viewpoint was forced back to exterior.
    pub fn forced_exterior_count(&self) -> u32 {
        self.forced_exterior
    }

    pub fn internal_space(&self) -> NodeId {
        self.internal_space
    }

    pub fn model_parent(&self, part: PartId) -> Option<NodeId> {
        self.interior_model(part).and_then(|m| self.scene.parent(m).ok().flatten())
    }

    pub fn model_local(&self, part: PartId) -> Option<Transform> {
        self.interior_model(part).and_then(|m| self.scene.local_transform(m).ok())
    }

    pub fn model_visible(&self, part: PartId) -> Option<bool> {
        self.interior_model(part).and_then(|m| self.scene.is_visible(m).ok())
    }

    pub fn surface_shader(&self, part: PartId, name: &str) -> Option<ShaderId> {
        self.find_model_node(part, name).and_then(|n| self.scene.shader(n).ok())
    }

    pub fn shader_id(&self, name: &str) -> Option<ShaderId> {
        self.shaders.get(name).copied()
    }

    /// First-person location of the part's model inside internal space.
    fn internal_frame(&self, part: PartId) -> Transform {
        let Some(p) = self.parts.get(&part) else {
            return Transform::IDENTITY;
        };
        let root_offset = self
            .vessels
            .get(&p.vessel)
            .and_then(|v| self.parts.get(&v.root))
            .map_or(Vec3::ZERO, |r| r.offset);
        Transform::from_position_rotation((p.offset - root_offset) * INTERNAL_SPACE_SCALE, INTERNAL_SPACE_ROTATION)
    }

    fn build_model(&mut self, part: PartId) -> Result<NodeId, HostError> {
        self.destroy_model(part);
        if let Some(remaining) = self.pending_failures.get_mut(&part) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(HostError::new(format!("prop configuration of {} is broken", part)));
            }
        }
        let seat_count = match self.parts.get(&part) {
            Some(p) => p.crew.len(),
            None => return Err(HostError::new(format!("{} does not exist", part))),
        };
        let frame = self.internal_frame(part);
        let node = self
            .scene
            .spawn(&format!("interior{}", part.0), Some(self.internal_space), frame);
        for seat in 0..seat_count {
            self.scene.spawn(&format!("seat{}", seat), Some(node), Transform::IDENTITY);
        }
        if let Some(p) = self.parts.get_mut(&part) {
            p.model = Some(SimModel {
                node,
                crew_spawned: false,
            });
        }
        *self.constructions.entry(part).or_insert(0) += 1;
        Ok(node)
    }
}

impl FlightState for SimHost {
    fn scene_kind(&self) -> SceneKind {
        self.scene_kind
    }

    fn active_vessel(&self) -> Option<VesselId> {
        self.active_vessel
    }

    fn vessel_of(&self, part: PartId) -> Option<VesselId> {
        self.parts.get(&part).map(|p| p.vessel)
    }

    fn root_part(&self, vessel: VesselId) -> Option<PartId> {
        self.vessels.get(&vessel).map(|v| v.root)
    }

    fn part_node(&self, part: PartId) -> Option<NodeId> {
        self.parts.get(&part).map(|p| p.node)
    }

    fn camera_mode(&self) -> CameraMode {
        self.camera_mode
    }

    fn user_in_pod(&self, part: PartId) -> bool {
        self.camera_mode == CameraMode::FirstPerson && self.user_pod == Some(part)
    }

    fn force_exterior_view(&mut self) {
        self.forced_exterior += 1;
        self.exit_to_exterior();
    }

    fn crew_vessel(&self, crew: CrewId) -> Option<VesselId> {
        self.seats.get(&crew).and_then(|(part, _)| self.vessel_of(*part))
    }
}

impl InteriorModels for SimHost {
    fn interior_model(&self, part: PartId) -> Option<NodeId> {
        self.parts.get(&part).and_then(|p| p.model.as_ref()).map(|m| m.node)
    }

    fn create_interior_model(&mut self, part: PartId) -> Result<NodeId, HostError> {
        self.build_model(part)
    }

    fn spawn_crew(&mut self, part: PartId) -> Result<NodeId, HostError> {
        let node = match self.interior_model(part) {
            Some(node) => node,
            None => self.build_model(part)?,
        };
        let frame = self.internal_frame(part);
        let internal_space = self.internal_space;
        self.scene
            .set_parent(node, Some(internal_space))
            .and_then(|()| self.scene.set_local_transform(node, frame))
            .map_err(|e| HostError::new(e.to_string()))?;
        if let Some(model) = self.parts.get_mut(&part).and_then(|p| p.model.as_mut()) {
            model.crew_spawned = true;
        }
        Ok(node)
    }

    fn seat_occupants(&self, part: PartId) -> Vec<Option<CrewId>> {
        match self.parts.get(&part) {
            Some(SimPart {
                crew,
                model: Some(SimModel { crew_spawned: true, .. }),
                ..
            }) => crew.clone(),
            Some(SimPart { crew, model: Some(_), .. }) => vec![None; crew.len()],
            _ => Vec::new(),
        }
    }

    fn set_model_visible(&mut self, part: PartId, visible: bool) {
        if let Some(node) = self.interior_model(part) {
            let _ = self.scene.set_visible(node, visible);
        }
    }
}

impl SceneNodes for SimHost {
    fn find_model_node(&self, part: PartId, name: &str) -> Option<NodeId> {
        let node = self.parts.get(&part)?.node;
        self.scene.find_by_name(node, name)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.scene.parent(node).ok().flatten()
    }

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), HostError> {
        self.scene
            .set_parent(node, parent)
            .map_err(|e| HostError::new(e.to_string()))
    }

    fn local_transform(&self, node: NodeId) -> Option<Transform> {
        self.scene.local_transform(node).ok()
    }

    fn set_local_transform(&mut self, node: NodeId, transform: Transform) -> Result<(), HostError> {
        self.scene
            .set_local_transform(node, transform)
            .map_err(|e| HostError::new(e.to_string()))
    }

    fn shader(&self, node: NodeId) -> Option<ShaderId> {
        self.scene.shader(node).ok()
    }

    fn set_shader(&mut self, node: NodeId, shader: ShaderId) -> Result<(), HostError> {
        self.scene
            .set_shader(node, shader)
            .map_err(|e| HostError::new(e.to_string()))
    }
}

impl ShaderLibrary for SimHost {
    fn find_shader(&self, name: &str) -> Option<ShaderId> {
        self.shaders.get(name).copied()
    }
}

impl CameraMasks for SimHost {
    fn culling_mask(&self, camera: &str) -> Option<u32> {
        self.cameras.get(camera).copied()
    }

    fn set_culling_mask(&mut self, camera: &str, mask: u32) -> bool {
        match self.cameras.get_mut(camera) {
            Some(m) => {
                *m = mask;
                true
            }
            None => false,
        }
    }
}
