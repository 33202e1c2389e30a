//! Horizon instrument display.
//!
//! Stateless apart from a roll angle: each frame it clears its render target
//! and draws one textured quad rotated about the screen centre.

use engine_core::{Quat, Vec2, Vec3, Vec4};

/// Background colour the screen is cleared to.
pub const CLEAR_COLOR: Vec4 = Vec4::new(0.0, 0.0, 1.0, 1.0);

/// Where a display draws each frame. Coordinates are orthographic, `0..1`.
pub trait RenderTarget {
    fn clear(&mut self, color: Vec4);

    /// Draw a textured quad. Corners and UVs are listed clockwise from bottom-left.
    fn draw_quad(&mut self, texture: &str, corners: [Vec3; 4], uvs: [Vec2; 4]);
}

#[derive(Debug, Clone)]
pub struct HorizonDisplay {
    texture: String,
    roll_degrees: u32,
}

impl HorizonDisplay {
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
            roll_degrees: 0,
        }
    }

    pub fn roll_degrees(&self) -> u32 {
        self.roll_degrees
    }

    /// Advance the roll by one degree, wrapping at a full turn.
    pub fn update(&mut self) {
        self.roll_degrees = (self.roll_degrees + 1) % 360;
    }

    /// Draw into `target`. Returns false when there is no target this frame.
    pub fn render(&self, target: Option<&mut dyn RenderTarget>) -> bool {
        let Some(target) = target else {
            return false;
        };
        target.clear(CLEAR_COLOR);
        target.draw_quad(
            &self.texture,
            horizon_quad(self.roll_degrees as f32),
            [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)],
        );
        true
    }
}

/// Unit square rotated by `roll_degrees` about its centre.
pub fn horizon_quad(roll_degrees: f32) -> [Vec3; 4] {
    let center = Vec3::new(0.5, 0.5, 0.0);
    let rotation = Quat::from_rotation_z(roll_degrees.to_radians());
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    ]
    .map(|corner| rotation * (corner - center) + center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        clears: Vec<Vec4>,
        quads: Vec<(String, [Vec3; 4])>,
    }

    impl RenderTarget for Recorder {
        fn clear(&mut self, color: Vec4) {
            self.clears.push(color);
        }

        fn draw_quad(&mut self, texture: &str, corners: [Vec3; 4], _uvs: [Vec2; 4]) {
            self.quads.push((texture.to_string(), corners));
        }
    }

    #[test]
    fn no_target_means_nothing_drawn() {
        let display = HorizonDisplay::new("horizon");
        assert!(!display.render(None));
    }

    #[test]
    fn render_clears_then_draws_one_quad() {
        let display = HorizonDisplay::new("horizon");
        let mut screen = Recorder::default();
        assert!(display.render(Some(&mut screen)));
        assert_eq!(screen.clears, vec![CLEAR_COLOR]);
        assert_eq!(screen.quads.len(), 1);
        assert_eq!(screen.quads[0].0, "horizon");
        assert!(screen.quads[0].1[0].abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn roll_wraps_after_a_full_turn() {
        let mut display = HorizonDisplay::new("horizon");
        for _ in 0..359 {
            display.update();
        }
        assert_eq!(display.roll_degrees(), 359);
        display.update();
        assert_eq!(display.roll_degrees(), 0);
    }

    #[test]
    fn half_turn_swaps_opposite_corners() {
        let quad = horizon_quad(180.0);
        assert!(quad[0].abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-5));
        assert!(quad[2].abs_diff_eq(Vec3::new(0.0, 0.0, 0.0), 1e-5));
    }
}
