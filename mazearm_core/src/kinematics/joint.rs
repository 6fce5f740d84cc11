//! Single-axis revolute joints

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{MazeArmError, MazeArmResult};

/// Local axis a joint's free rotation acts around
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointAxis {
    X,
    #[default]
    Y,
    Z,
}

impl JointAxis {
    pub fn unit(&self) -> Unit<Vector3<f64>> {
        match self {
            JointAxis::X => Vector3::x_axis(),
            JointAxis::Y => Vector3::y_axis(),
            JointAxis::Z => Vector3::z_axis(),
        }
    }

    /// Drop the component along this axis, leaving the rotation plane
    pub fn project(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let mut projected = *v;
        match self {
            JointAxis::X => projected.x = 0.0,
            JointAxis::Y => projected.y = 0.0,
            JointAxis::Z => projected.z = 0.0,
        }
        projected
    }

    /// Angle of `v` within the rotation plane, increasing with positive
    /// rotation about this axis
    pub fn planar_angle(&self, v: &Vector3<f64>) -> f64 {
        match self {
            JointAxis::X => v.z.atan2(v.y),
            JointAxis::Y => v.x.atan2(v.z),
            JointAxis::Z => v.y.atan2(v.x),
        }
    }
}

/// Rotation limits in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    pub min: f64,
    pub max: f64,
}

impl JointLimits {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn from_degrees(min: f64, max: f64) -> Self {
        Self::new(min.to_radians(), max.to_radians())
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn clamp(&self, angle: f64) -> f64 {
        angle.clamp(self.min, self.max)
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min && angle <= self.max
    }
}

/// Intrinsic X-then-Y-then-Z Euler rotation (`Rx * Ry * Rz`)
pub fn orientation_from_euler_xyz(x: f64, y: f64, z: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z)
}

/// A joint of a linear chain.
///
/// Its local transform relative to the parent is
/// `offset * orientation * rotation(axis, angle)`: the fixed orientation
/// decides where the free axis ends up, the angle is the only solved value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub name: String,
    pub offset: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub axis: JointAxis,
    pub angle: f64,
    pub limits: Option<JointLimits>,
}

impl Joint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            axis: JointAxis::default(),
            angle: 0.0,
            limits: None,
        }
    }

    pub fn with_offset(mut self, x: f64, y: f64, z: f64) -> Self {
        self.offset = Vector3::new(x, y, z);
        self
    }

    pub fn with_orientation(mut self, orientation: UnitQuaternion<f64>) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_euler_xyz(self, x: f64, y: f64, z: f64) -> Self {
        self.with_orientation(orientation_from_euler_xyz(x, y, z))
    }

    pub fn with_axis(mut self, axis: JointAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_limits(mut self, min: f64, max: f64) -> Self {
        self.limits = Some(JointLimits::new(min, max));
        self
    }

    /// Free rotation alone
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&self.axis.unit(), self.angle)
    }

    /// Transform from this joint's frame to its parent's frame
    pub fn local_transform(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.offset),
            self.orientation * self.rotation(),
        )
    }

    pub(crate) fn validate(&self, index: usize) -> MazeArmResult<()> {
        if let Some(limits) = self.limits {
            if !limits.is_valid() {
                return Err(MazeArmError::InvalidLimits {
                    index,
                    min: limits.min,
                    max: limits.max,
                });
            }
        }
        Ok(())
    }
}
