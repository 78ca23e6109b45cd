//! Clock hand outlines
//!
//! Outlines are given around the pivot at the origin, pointing to 12 o'clock.
//! Angles are in `0..FULL_TURN` and turn clockwise on screen.

use core::f32::consts::PI;

use embedded_graphics::geometry::Point;

use crate::config::FULL_TURN;

/// Points in each hand outline
pub const OUTLINE_POINTS: usize = 6;

pub type Outline = [Point; OUTLINE_POINTS];

pub const HOUR_POINTS: Outline = [
    Point::new(6, -37),
    Point::new(3, -40),
    Point::new(-3, -40),
    Point::new(-6, -37),
    Point::new(-6, 0),
    Point::new(6, 0),
];

pub const MINUTE_POINTS: Outline = [
    Point::new(5, -56),
    Point::new(3, -60),
    Point::new(-3, -60),
    Point::new(-5, -56),
    Point::new(-5, 0),
    Point::new(5, 0),
];

/// A hand outline placed on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hand {
    outline: &'static Outline,
    offset: Point,
    angle: i32,
}

impl Hand {
    pub const fn new(outline: &'static Outline) -> Self {
        Self {
            outline,
            offset: Point::zero(),
            angle: 0,
        }
    }

    /// Place the pivot at `offset`
    pub fn move_to(&mut self, offset: Point) {
        self.offset = offset;
    }

    pub fn rotate_to(&mut self, angle: i32) {
        self.angle = angle;
    }

    /// Copy of this hand turned to `angle`
    pub const fn rotated(mut self, angle: i32) -> Self {
        self.angle = angle;
        self
    }

    pub const fn angle(&self) -> i32 {
        self.angle
    }

    pub const fn offset(&self) -> Point {
        self.offset
    }

    /// Outline in canvas coordinates
    pub fn points(&self) -> Outline {
        let (sin, cos) = libm::sincosf(self.angle as f32 * 2.0 * PI / FULL_TURN as f32);
        (*self.outline).map(|p| {
            let x = p.x as f32 * cos - p.y as f32 * sin;
            let y = p.x as f32 * sin + p.y as f32 * cos;
            Point::new(libm::roundf(x) as i32, libm::roundf(y) as i32) + self.offset
        })
    }
}
