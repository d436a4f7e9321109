//! Data models for workspace geometry, robot poses and motion policy
//!
//! This module provides:
//! - Workspace points in millimeters and distance/containment helpers
//! - Workspace bounds and capture tolerances
//! - Joint and Cartesian poses for the robot frame
//! - Motion policy (speeds, accelerations, hover offsets, blending)
//! - Robot setup context handed to the motion sink

pub mod motion;
pub mod robot;

pub use motion::{CartesianPose, JointPose, MotionParameters};
pub use robot::{Payload, RobotSetup};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the drawing workspace, in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate (mm)
    pub x: f64,
    /// Y coordinate (mm)
    pub y: f64,
}

impl Point2D {
    /// Create a new workspace point
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite(),
            "Point2D coordinates must be finite: x={x}, y={y}"
        );
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether `other` lies within `tolerance` of this point (inclusive)
    pub fn is_within(&self, other: &Point2D, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Rectangular workspace extent in millimeters (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceBounds {
    /// Minimum X (mm)
    pub min_x: f64,
    /// Maximum X (mm)
    pub max_x: f64,
    /// Minimum Y (mm)
    pub min_y: f64,
    /// Maximum Y (mm)
    pub max_y: f64,
}

impl WorkspaceBounds {
    /// Create bounds from explicit extents
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Create square bounds starting at the origin
    pub fn square(size_mm: f64) -> Self {
        Self::new(0.0, size_mm, 0.0, size_mm)
    }

    /// Whether the bounds describe a non-degenerate, finite rectangle
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }

    /// Whether a point lies inside the workspace (edges included)
    pub fn contains(&self, point: &Point2D) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Accept raw pointer coordinates, returning `None` when they fall outside
    /// the workspace or are not finite
    pub fn sample(&self, x: f64, y: f64) -> Option<Point2D> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let point = Point2D { x, y };
        self.contains(&point).then_some(point)
    }

    /// Width in millimeters
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height in millimeters
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl Default for WorkspaceBounds {
    fn default() -> Self {
        Self::square(300.0)
    }
}

/// Workspace and capture policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Sander radius in mm, used only for the hover indicator
    pub tool_radius_mm: f64,
    /// A sample this close to the last accepted point ends the path
    pub end_tolerance_mm: f64,
    /// Drawable area
    pub bounds: WorkspaceBounds,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            tool_radius_mm: 9.5,
            end_tolerance_mm: 2.0,
            bounds: WorkspaceBounds::default(),
        }
    }
}
