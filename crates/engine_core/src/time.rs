//! Frame phase ordering for the host's per-frame callbacks.
//!
//! The host calls three phases per frame: a general update, a GUI draw and a
//! post-render pass. Work in later phases relies on state left by earlier
//! ones, so the order is checked rather than assumed.

use thiserror::Error;

/// One of the ordered callback points within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FramePhase {
    Update,
    GuiDraw,
    PostRender,
}

/// A phase was entered out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("frame {frame}: cannot enter {attempted:?} after {current:?}")]
pub struct PhaseError {
    pub frame: u64,
    pub current: Option<FramePhase>,
    pub attempted: FramePhase,
}

/// Tracks the current frame and the last phase entered within it.
#[derive(Debug, Default)]
pub struct FrameClock {
    frame_count: u64,
    phase: Option<FramePhase>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `phase`, validating it against the phase already entered this frame.
    ///
    /// `Update` always opens a new frame, so a host that skips the GUI or
    /// post-render pass on some frame is fine. `GuiDraw` may repeat within a
    /// frame (hosts issue several GUI events per frame). `PostRender` closes
    /// the frame; nothing but `Update` may follow it.
    pub fn enter(&mut self, phase: FramePhase) -> Result<(), PhaseError> {
        let allowed = match phase {
            FramePhase::Update => true,
            FramePhase::GuiDraw => matches!(
                self.phase,
                Some(FramePhase::Update) | Some(FramePhase::GuiDraw)
            ),
            FramePhase::PostRender => matches!(
                self.phase,
                Some(FramePhase::Update) | Some(FramePhase::GuiDraw)
            ),
        };
        if !allowed {
            return Err(PhaseError {
                frame: self.frame_count,
                current: self.phase,
                attempted: phase,
            });
        }
        if phase == FramePhase::Update {
            self.frame_count += 1;
        }
        self.phase = Some(phase);
        Ok(())
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Last phase entered, if any frame has started.
    pub fn phase(&self) -> Option<FramePhase> {
        self.phase
    }
}
