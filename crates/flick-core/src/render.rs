//! Drawing primitives the level paints its overlays with.
//!
//! The runtime never talks to a canvas or GPU directly; a front-end implements
//! [`DrawSurface`] and hands it to [`Game::frame_drawn`](crate::game::Game::frame_drawn).

use crate::assets::ImageHandle;
use crate::color::Color;

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`.
    pub fn centered(center: [f32; 2], width: f32, height: f32) -> Self {
        Self::new(
            center[0] - width / 2.0,
            center[1] - height / 2.0,
            width,
            height,
        )
    }
}

/// Immediate-mode 2D drawing target.
pub trait DrawSurface {
    /// Global alpha for following draw calls, in `[0, 1]`.
    fn set_alpha(&mut self, alpha: f32);

    fn stroke_circle(&mut self, center: [f32; 2], radius: f32, line_width: f32, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn line(&mut self, from: [f32; 2], to: [f32; 2], line_width: f32, color: Color);

    /// Copies `source` out of the image into `destination`.
    fn draw_image(&mut self, image: &ImageHandle, source: Rect, destination: Rect);
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Alpha(f32),
    Circle {
        center: [f32; 2],
        radius: f32,
        line_width: f32,
        color: Color,
    },
    Rect(Rect, Color),
    Line {
        from: [f32; 2],
        to: [f32; 2],
        line_width: f32,
        color: Color,
    },
    Image {
        name: String,
        source: Rect,
        destination: Rect,
    },
}

/// Surface that records every call. Used by the headless runner and in tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> impl Iterator<Item = (&[f32; 2], f32)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle { center, radius, .. } => Some((center, *radius)),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::Alpha(alpha));
    }

    fn stroke_circle(&mut self, center: [f32; 2], radius: f32, line_width: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            line_width,
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect(rect, color));
    }

    fn line(&mut self, from: [f32; 2], to: [f32; 2], line_width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            line_width,
            color,
        });
    }

    fn draw_image(&mut self, image: &ImageHandle, source: Rect, destination: Rect) {
        self.commands.push(DrawCommand::Image {
            name: image.name().to_string(),
            source,
            destination,
        });
    }
}
