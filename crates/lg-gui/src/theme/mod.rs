//! Visual theme: color palette, shape constants, and canvas scaling.
//!
//! The canvas has the world's dimensions and is letterboxed into the
//! window. Canvas space is y-down; the world is y-up, so everything that
//! crosses the boundary goes through [`Canvas::to_screen`] or
//! [`Canvas::to_world`].

use lg_core::Vec2;
use lg_simulation::VisualTag;
use macroquad::prelude::*;

/// Initial window width in pixels.
pub const WINDOW_W: i32 = 800;
/// Initial window height in pixels.
pub const WINDOW_H: i32 = 600;

/// Pillow size on a bed.
pub const PILLOW_SIZE: (f32, f32) = (50.0, 20.0);
/// Gap between the pillow and the head of the bed.
pub const PILLOW_INSET: f32 = 5.0;

/// Gap between an actor's head and its thought text.
pub const MOOD_OFFSET: f32 = 15.0;
/// Font size for thought text.
pub const MOOD_FONT_SIZE: f32 = 20.0;

/// Flat palette for a white desk.
pub mod palette {
    use macroquad::prelude::Color;

    /// Letterbox bars.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Canvas background.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Actor on its feet.
    pub const ACTOR: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Actor dangling from the pointer.
    pub const ACTOR_LIFTED: Color = Color::new(0.3, 0.3, 0.3, 1.0);
    /// Actor asleep.
    pub const ACTOR_ASLEEP: Color = Color::new(0.1, 0.1, 0.1, 1.0);

    /// Ball lying or flying free.
    pub const BALL: Color = Color::new(0.6, 0.1, 0.1, 1.0);
    /// Ball held by the pointer.
    pub const BALL_LIFTED: Color = Color::new(0.8, 0.4, 0.4, 1.0);
    /// Ball in an actor's hand.
    pub const BALL_CARRIED: Color = Color::new(0.7, 0.2, 0.2, 1.0);

    /// Bed frame.
    pub const BED: Color = Color::new(0.2, 0.1, 0.05, 1.0);
    /// Bed frame with a sleeper.
    pub const BED_OCCUPIED: Color = Color::new(0.25, 0.13, 0.07, 1.0);
    /// Pillow.
    pub const PILLOW: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Footstep particles.
    pub const TRAIL: Color = Color::new(0.0, 0.0, 0.0, 0.7);
    /// Dust particles.
    pub const DUST: Color = Color::new(0.0, 0.0, 0.0, 0.8);
    /// Thought text.
    pub const MOOD: Color = Color::new(0.0, 0.0, 0.0, 1.0);
}

/// Fill color for an entity's visual state.
pub fn tag_color(tag: VisualTag) -> Color {
    match tag {
        VisualTag::ActorAwake => palette::ACTOR,
        VisualTag::ActorLifted => palette::ACTOR_LIFTED,
        VisualTag::ActorAsleep => palette::ACTOR_ASLEEP,
        VisualTag::BallFree => palette::BALL,
        VisualTag::BallLifted => palette::BALL_LIFTED,
        VisualTag::BallCarried => palette::BALL_CARRIED,
        VisualTag::BedEmpty => palette::BED,
        VisualTag::BedOccupied => palette::BED_OCCUPIED,
    }
}

/// Thought text color with the bubble's opacity applied.
pub fn mood_color(opacity: f32) -> Color {
    let mut color = palette::MOOD;
    color.a = opacity.clamp(0.0, 1.0);
    color
}

/// A world-sized canvas letterboxed into the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Canvas width in world units.
    pub width: f32,
    /// Canvas height in world units.
    pub height: f32,
}

impl Canvas {
    /// A canvas covering a `width` x `height` world.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert a y-up world point to y-down canvas space.
    pub fn to_screen(&self, point: Vec2) -> (f32, f32) {
        (point.x, self.height - point.y)
    }

    /// Convert a y-down canvas point to y-up world space.
    pub fn to_world(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, self.height - y)
    }

    /// Uniform scale and top-left offset that fit the canvas in a window.
    pub fn fit(&self, window_w: f32, window_h: f32) -> (f32, f32, f32) {
        let scale = (window_w / self.width).min(window_h / self.height);
        let offset_x = (window_w - self.width * scale) / 2.0;
        let offset_y = (window_h - self.height * scale) / 2.0;
        (scale, offset_x, offset_y)
    }

    /// Set up a `Camera2D` that maps the canvas to the current window.
    pub fn apply(&self) {
        let (scale, offset_x, offset_y) = self.fit(screen_width(), screen_height());

        set_camera(&Camera2D {
            zoom: vec2(2.0 / self.width, 2.0 / self.height),
            target: vec2(self.width / 2.0, self.height / 2.0),
            viewport: Some((
                offset_x as i32,
                offset_y as i32,
                (self.width * scale) as i32,
                (self.height * scale) as i32,
            )),
            ..Default::default()
        });
    }

    /// The mouse position in world coordinates.
    pub fn mouse_world_position(&self) -> Vec2 {
        let (mx, my) = mouse_position();
        let (scale, offset_x, offset_y) = self.fit(screen_width(), screen_height());
        self.to_world((mx - offset_x) / scale, (my - offset_y) / scale)
    }
}
