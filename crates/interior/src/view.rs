//! Viewpoint relative to a compartment.

use crate::host::{CameraMode, FlightState};
use engine_core::PartId;

/// Which viewpoint mode is active relative to a given compartment.
/// Derived every tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewContext {
    /// Third-person view.
    Exterior,
    /// First person inside this compartment.
    InteriorOwnPod,
    /// First person inside some other compartment.
    InteriorOtherPod,
}

impl ViewContext {
    pub fn of<H: FlightState + ?Sized>(host: &H, part: PartId) -> Self {
        match host.camera_mode() {
            CameraMode::Exterior => ViewContext::Exterior,
            CameraMode::FirstPerson if host.user_in_pod(part) => ViewContext::InteriorOwnPod,
            CameraMode::FirstPerson => ViewContext::InteriorOtherPod,
        }
    }
}
