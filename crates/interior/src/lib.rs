//! Transparent pod interiors.
//!
//! Decides, each frame, where a compartment's interior model sits, whether it
//! is visible and which shader its hull uses, as the viewpoint moves between
//! the exterior camera and first person and as docking changes the vessel's
//! structural root:
//! - [`placement`]: the per-compartment state machine
//! - [`shaders`]: transparent/original hull shader swapping
//! - [`gate`]: whether the exterior camera renders interiors
//! - [`roster`]: crew portrait roster reconciliation
//! - [`follower`]: visibility for compartments without placement
//! - [`system`]: the three-phase frame driver
//!
//! The host game is reached only through the traits in [`host`]; [`sim`]
//! provides an in-memory host.

pub mod config;
pub mod display;
pub mod error;
pub mod follower;
pub mod gate;
pub mod host;
pub mod placement;
pub mod roster;
pub mod shaders;
pub mod sim;
pub mod system;
pub mod view;

pub use config::{GateConfig, PodConfig};
pub use display::{HorizonDisplay, RenderTarget};
pub use error::{AssetKind, HostError, InteriorError};
pub use follower::FollowerVisibilityController;
pub use gate::CameraCullingGate;
pub use host::{CameraMode, Host, SceneKind, StartState};
pub use placement::{InteriorPlacementController, CORRECTIVE_ROTATION};
pub use roster::{CrewRoster, CrewRosterSynchronizer};
pub use shaders::ShaderSwapManager;
pub use sim::SimHost;
pub use system::{InteriorSystem, SharedState};
pub use view::ViewContext;
