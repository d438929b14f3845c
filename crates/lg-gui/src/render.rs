//! Drawing: rotated rectangles for entities, specks for particles, and
//! thought text above actors.

use lg_core::{EntityKind, Vec2};
use lg_simulation::EntityView;
use macroquad::prelude::*;

use crate::particles::{Particle, ParticleKind};
use crate::theme::{
    Canvas, MOOD_FONT_SIZE, MOOD_OFFSET, PILLOW_INSET, PILLOW_SIZE, mood_color, palette, tag_color,
};

/// Draw every entity back to front, then the particles on top.
pub fn draw_scene(canvas: &Canvas, views: &[EntityView], particles: &[Particle]) {
    for view in views {
        draw_entity(canvas, view);
    }
    for particle in particles {
        draw_particle(canvas, particle);
    }
    for view in views {
        draw_mood(canvas, view);
    }
}

fn draw_entity(canvas: &Canvas, view: &EntityView) {
    let centre = view.position + view.size * 0.5;
    draw_rotated(canvas, centre, view.size, view.rotation, tag_color(view.tag));

    if view.kind == EntityKind::Bed {
        let (w, h) = PILLOW_SIZE;
        // Offset from the bed's centre to the pillow's, before rotation.
        let local = Vec2::new(0.0, view.size.y / 2.0 - PILLOW_INSET - h / 2.0);
        let pillow = centre + rotate(local, view.rotation);
        draw_rotated(canvas, pillow, Vec2::new(w, h), view.rotation, palette::PILLOW);
    }
}

/// Fill a `size` rectangle centred on `centre`, turned `rotation` radians
/// counter-clockwise in world space.
fn draw_rotated(canvas: &Canvas, centre: Vec2, size: Vec2, rotation: f32, color: Color) {
    let (x, y) = canvas.to_screen(centre);
    draw_rectangle_ex(
        x,
        y,
        size.x,
        size.y,
        DrawRectangleParams {
            offset: vec2(0.5, 0.5),
            // Flipping y turns counter-clockwise into clockwise.
            rotation: -rotation,
            color,
        },
    );
}

fn draw_particle(canvas: &Canvas, particle: &Particle) {
    let mut color = match particle.kind {
        ParticleKind::Dust => palette::DUST,
        ParticleKind::Trail => palette::TRAIL,
    };
    color.a *= particle.alpha();
    let (x, y) = canvas.to_screen(particle.position);
    let half = particle.size / 2.0;
    draw_rectangle(x - half, y - half, particle.size, particle.size, color);
}

fn draw_mood(canvas: &Canvas, view: &EntityView) {
    let Some(bubble) = view.mood else {
        return;
    };
    let opacity = bubble.opacity();
    if opacity <= 0.0 {
        return;
    }
    let text = bubble.mood.text();
    let dims = measure_text(text, None, MOOD_FONT_SIZE as u16, 1.0);
    let anchor = Vec2::new(
        view.position.x + view.size.x / 2.0,
        view.position.y + view.size.y + MOOD_OFFSET,
    );
    let (x, y) = canvas.to_screen(anchor);
    draw_text(text, x - dims.width / 2.0, y, MOOD_FONT_SIZE, mood_color(opacity));
}

fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!(r.x.abs() < 1e-6);
        assert!((r.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotate_zero_is_identity() {
        assert_eq!(rotate(Vec2::new(3.0, -2.0), 0.0), Vec2::new(3.0, -2.0));
    }
}
