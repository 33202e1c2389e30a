//! Whether the exterior camera renders interior geometry.
//!
//! There is one gate per process. It is opened while interiors should be seen
//! through transparent hulls and closed on entering first person, on
//! compartment teardown and when the simulation pauses, so no interior is
//! left visible without an owner.

use crate::config::GateConfig;
use crate::error::{AssetKind, InteriorError, Result};
use crate::host::CameraMasks;

#[derive(Debug, Clone)]
pub struct CameraCullingGate {
    config: GateConfig,
    shows_interior: bool,
}

impl Default for CameraCullingGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

impl CameraCullingGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            shows_interior: false,
        }
    }

    /// True while the flight camera has been told to render interiors.
    pub fn shows_interior(&self) -> bool {
        self.shows_interior
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Add or remove the interior layers on one named camera. Does not touch
    /// the recorded gate state.
    pub fn set_camera<C: CameraMasks + ?Sized>(&self, cameras: &mut C, camera: &str, shows: bool) -> Result<()> {
        let layers = self.config.layer_mask();
        let mask = cameras
            .culling_mask(camera)
            .ok_or_else(|| InteriorError::asset(AssetKind::Camera, camera))?;
        let mask = if shows { mask | layers } else { mask & !layers };
        if cameras.set_culling_mask(camera, mask) {
            Ok(())
        } else {
            Err(InteriorError::asset(AssetKind::Camera, camera))
        }
    }

    /// Show interiors on the flight camera.
    pub fn open<C: CameraMasks + ?Sized>(&mut self, cameras: &mut C) {
        self.set_flight(cameras, true);
    }

    /// Hide interiors from the flight camera.
    pub fn close<C: CameraMasks + ?Sized>(&mut self, cameras: &mut C) {
        self.set_flight(cameras, false);
    }

    /// Show interiors on the editor camera for the design preview.
    pub fn open_editor<C: CameraMasks + ?Sized>(&self, cameras: &mut C) {
        if let Err(e) = self.set_camera(cameras, &self.config.editor_camera, true) {
            log::warn!("Editor preview left without interiors: {}", e);
        }
    }

    fn set_flight<C: CameraMasks + ?Sized>(&mut self, cameras: &mut C, shows: bool) {
        match self.set_camera(cameras, &self.config.flight_camera, shows) {
            Ok(()) => {
                if self.shows_interior != shows {
                    log::debug!("Culling gate {}", if shows { "opened" } else { "closed" });
                }
                self.shows_interior = shows;
            }
            Err(e) => log::warn!("Culling gate unchanged: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimHost;

    const LAYERS: u32 = (1 << 16) | (1 << 20);

    #[test]
    fn open_and_close_toggle_only_interior_layers() {
        let mut host = SimHost::new();
        host.add_camera("Camera 00", 0b101);
        let mut gate = CameraCullingGate::default();
        gate.open(&mut host);
        assert!(gate.shows_interior());
        assert_eq!(host.culling_mask("Camera 00"), Some(0b101 | LAYERS));
        gate.open(&mut host);
        assert_eq!(host.culling_mask("Camera 00"), Some(0b101 | LAYERS));
        gate.close(&mut host);
        assert!(!gate.shows_interior());
        assert_eq!(host.culling_mask("Camera 00"), Some(0b101));
    }

    #[test]
    fn missing_camera_leaves_state_unchanged() {
        let mut host = SimHost::new();
        let mut gate = CameraCullingGate::new(GateConfig {
            flight_camera: "Nonexistent".to_string(),
            ..Default::default()
        });
        gate.open(&mut host);
        assert!(!gate.shows_interior());
        assert_eq!(
            gate.set_camera(&mut host, "Nonexistent", true),
            Err(InteriorError::asset(AssetKind::Camera, "Nonexistent"))
        );
    }

    #[test]
    fn editor_camera_does_not_move_the_gate() {
        let mut host = SimHost::new();
        let gate = CameraCullingGate::default();
        gate.open_editor(&mut host);
        assert!(!gate.shows_interior());
        assert_eq!(host.culling_mask("Main Camera"), Some(1 | LAYERS));
        assert_eq!(host.culling_mask("Camera 00"), Some(1));
    }
}
