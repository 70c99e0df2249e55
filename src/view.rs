//! Globe rotation state and pointer interaction.
//!
//! Rotation is split in two: a base angle the render loop advances every
//! frame while the globe is not held, and a drag angle accumulated from
//! horizontal pointer movement. Neither is ever normalised.

use crate::projection::Marker;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Press { x: f64 },
    Move { x: f64 },
    Release,
    Leave,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub base_rotation: f64,
    pub drag_rotation: f64,
    dragging: bool,
    last_pointer_x: f64,
    drag_scale: f64,
}

impl ViewState {
    pub fn new(drag_scale: f64) -> Self {
        Self {
            base_rotation: 0.0,
            drag_rotation: 0.0,
            dragging: false,
            last_pointer_x: 0.0,
            drag_scale,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn rotation(&self) -> f64 {
        self.base_rotation + self.drag_rotation
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Press { x } => {
                self.dragging = true;
                self.last_pointer_x = x;
            }
            PointerEvent::Move { x } => {
                if self.dragging {
                    self.drag_rotation += (x - self.last_pointer_x) * self.drag_scale;
                    self.last_pointer_x = x;
                }
            }
            PointerEvent::Release | PointerEvent::Leave => self.dragging = false,
        }
    }

    /// Per-frame spin. Deliberately a fixed step, so the apparent speed
    /// follows the display refresh rate.
    pub fn advance(&mut self, step: f64) {
        if !self.dragging {
            self.base_rotation += step;
        }
    }
}

/// First visible marker whose centre lies strictly within `radius` of the click.
pub fn hit_test<'a>(markers: &'a [Marker], x: f64, y: f64, radius: f64) -> Option<&'a Marker> {
    markers.iter().find(|m| m.distance_to(x, y) < radius)
}
