//! Main-image interactions: free drag and scale, available only while the
//! base image is in edit mode.
//!
//! The gesture alters [`ImageTransform`] rather than entity state: offsets
//! move the image center away from the canvas center, and corner drags
//! scale it about that center. The offset is clamped so the image center
//! never leaves the canvas, which caps overhang at half the scaled size on
//! every side.

#[cfg(test)]
#[path = "image_control_test.rs"]
mod image_control_test;

use crate::consts::{CORNER_GRAB_PX, IMAGE_SCALE_MAX, IMAGE_SCALE_MIN};
use crate::engine::Action;
use crate::geometry::{CanvasSize, Point};
use crate::layout::{self, NaturalSize};
use crate::scene::{ImageTransform, Scene};

/// Active gesture on the base image.
#[derive(Debug, Clone, Copy)]
enum ImageGesture {
    Idle,
    /// Dragging the image; `grab` is the pointer offset from the image
    /// center at pointer-down.
    Dragging { grab: Point },
    /// Scaling from a corner; scale follows the ratio of the current
    /// pointer-to-center distance to the starting one.
    Resizing { start_dist: f64, start_scale: f64 },
}

/// Drag/scale state machine for the base image.
#[derive(Debug)]
pub struct ImageControl {
    gesture: ImageGesture,
}

impl Default for ImageControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageControl {
    #[must_use]
    pub fn new() -> Self {
        Self { gesture: ImageGesture::Idle }
    }

    /// True while a drag or resize is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, ImageGesture::Idle)
    }

    /// Abandon any in-progress gesture without emitting anything.
    pub fn cancel(&mut self) {
        self.gesture = ImageGesture::Idle;
    }

    /// Offer a pointer-down. Claims the event when the point falls inside
    /// the image's scaled bounding box; near a corner the gesture is a
    /// resize, anywhere else a drag.
    pub fn on_pointer_down(
        &mut self,
        point: Point,
        canvas: CanvasSize,
        natural: NaturalSize,
        transform: ImageTransform,
    ) -> bool {
        let rect = layout::image_rect(canvas, natural, transform);
        if !rect.contains(point) {
            return false;
        }
        let near_corner = rect.corners().iter().any(|corner| {
            (point.x - corner.x).abs() <= CORNER_GRAB_PX
                && (point.y - corner.y).abs() <= CORNER_GRAB_PX
        });
        let center = rect.center();
        self.gesture = if near_corner {
            ImageGesture::Resizing {
                start_dist: point.distance_to(center).max(1.0),
                start_scale: transform.scale,
            }
        } else {
            ImageGesture::Dragging {
                grab: Point::new(point.x - center.x, point.y - center.y),
            }
        };
        true
    }

    /// Advance the active gesture, writing the new transform to the scene.
    pub fn on_pointer_move(
        &mut self,
        point: Point,
        canvas: CanvasSize,
        scene: &mut Scene,
    ) -> Vec<Action> {
        match self.gesture {
            ImageGesture::Idle => Vec::new(),
            ImageGesture::Dragging { grab } => {
                let half_w = canvas.width / 2.0;
                let half_h = canvas.height / 2.0;
                let offset = Point::new(
                    (point.x - grab.x - half_w).clamp(-half_w, half_w),
                    (point.y - grab.y - half_h).clamp(-half_h, half_h),
                );
                scene.set_image_transform(ImageTransform {
                    offset,
                    scale: scene.image_transform.scale,
                });
                vec![
                    Action::ImageTransformChanged { transform: scene.image_transform },
                    Action::RenderNeeded { urgent: false },
                ]
            }
            ImageGesture::Resizing { start_dist, start_scale } => {
                let center = Point::new(
                    canvas.width / 2.0 + scene.image_transform.offset.x,
                    canvas.height / 2.0 + scene.image_transform.offset.y,
                );
                let scale = (start_scale * point.distance_to(center) / start_dist)
                    .clamp(IMAGE_SCALE_MIN, IMAGE_SCALE_MAX);
                scene.set_image_transform(ImageTransform {
                    offset: scene.image_transform.offset,
                    scale,
                });
                vec![
                    Action::ImageTransformChanged { transform: scene.image_transform },
                    Action::SetStatus(format!("Scale: {:.0}%", scale * 100.0)),
                    Action::RenderNeeded { urgent: false },
                ]
            }
        }
    }

    /// End the active gesture. The final state is already in the scene; a
    /// last urgent repaint settles the screen.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if !self.is_active() {
            return Vec::new();
        }
        self.gesture = ImageGesture::Idle;
        vec![Action::RenderNeeded { urgent: true }]
    }

    /// Snap the image back to its neutral transform.
    pub fn reset(scene: &mut Scene) -> Vec<Action> {
        scene.set_image_transform(ImageTransform::default());
        vec![
            Action::ImageTransformChanged { transform: scene.image_transform },
            Action::RenderNeeded { urgent: true },
        ]
    }
}
