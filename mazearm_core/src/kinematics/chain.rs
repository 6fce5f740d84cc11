//! Linear kinematic chain
//!
//! Joints are stored root first. The parent of joint `i` is joint `i - 1`;
//! the root has no parent and the last joint is the end-effector. World
//! transforms are composed from the root on every query, so they are never
//! stale after an angle changes.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Isometry3, Point3};
use serde::{Deserialize, Serialize};

use super::joint::{Joint, JointAxis, JointLimits};
use super::ArticulatedChain;
use crate::error::{MazeArmError, MazeArmResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicChain {
    joints: Vec<Joint>,
}

impl KinematicChain {
    pub fn new(joints: Vec<Joint>) -> MazeArmResult<Self> {
        if joints.is_empty() {
            return Err(MazeArmError::EmptyChain);
        }
        for (index, joint) in joints.iter().enumerate() {
            joint.validate(index)?;
        }
        Ok(Self { joints })
    }

    /// Planar arm with one Y-axis joint per link, links laid along local +Z.
    ///
    /// Layout: fixed root, one rotating joint per link length, then the tip.
    /// `planar(&[1.0, 0.8])` is a two-link arm with its shoulder at the origin.
    pub fn planar(link_lengths: &[f64]) -> Self {
        let mut joints = Vec::with_capacity(link_lengths.len() + 2);
        joints.push(Joint::new("root"));
        joints.push(Joint::new("joint_1"));

        for (i, &length) in link_lengths.iter().enumerate() {
            let name = if i + 1 == link_lengths.len() {
                "tip".to_string()
            } else {
                format!("joint_{}", i + 2)
            };
            joints.push(Joint::new(name).with_offset(0.0, 0.0, length));
        }

        Self { joints }
    }

    /// The six-axis desktop arm: a fixed base plus six links, every free
    /// rotation about the local Y axis.
    pub fn six_axis_arm() -> Self {
        let joints = vec![
            Joint::new("base"),
            Joint::new("link1")
                .with_offset(0.0, 0.2, 0.0)
                .with_angle(FRAC_PI_2)
                .with_limits(-180f64.to_radians(), 180f64.to_radians()),
            Joint::new("link2")
                .with_offset(0.0, 0.0, 0.1)
                .with_euler_xyz(FRAC_PI_2, 0.0, 0.0)
                .with_angle(-FRAC_PI_2)
                .with_limits(-270f64.to_radians(), -90f64.to_radians()),
            Joint::new("link3")
                .with_offset(-0.25, 0.0, 0.0)
                .with_limits(-150f64.to_radians(), 150f64.to_radians()),
            Joint::new("link4")
                .with_offset(-0.25, 0.03, 0.0)
                .with_angle(-FRAC_PI_2)
                .with_limits(-260f64.to_radians(), -80f64.to_radians()),
            Joint::new("link5")
                .with_offset(0.0, 0.0, 0.115)
                .with_euler_xyz(FRAC_PI_2, 0.0, 0.0)
                .with_limits(-168f64.to_radians(), 168f64.to_radians()),
            Joint::new("link6")
                .with_offset(0.0, 0.0, -0.085)
                .with_euler_xyz(FRAC_PI_2, 0.0, 0.0)
                .with_limits(-174f64.to_radians(), 174f64.to_radians()),
        ];

        Self { joints }
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joint(&self, index: usize) -> MazeArmResult<&Joint> {
        self.joints.get(index).ok_or(MazeArmError::JointOutOfRange {
            index,
            len: self.joints.len(),
        })
    }

    pub fn end_effector_index(&self) -> usize {
        self.joints.len() - 1
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        (index > 0 && index < self.joints.len()).then(|| index - 1)
    }

    /// World transform of joint `index`: root ∘ ... ∘ parent ∘ local
    pub fn world_transform(&self, index: usize) -> MazeArmResult<Isometry3<f64>> {
        self.joint(index)?;
        Ok(self.compose_to(index))
    }

    pub fn world_position(&self, index: usize) -> MazeArmResult<Point3<f64>> {
        Ok(self.world_transform(index)? * Point3::origin())
    }

    pub fn end_effector_position(&self) -> Point3<f64> {
        self.compose_to(self.end_effector_index()) * Point3::origin()
    }

    pub fn angle(&self, index: usize) -> MazeArmResult<f64> {
        Ok(self.joint(index)?.angle)
    }

    pub fn set_angle(&mut self, index: usize, angle: f64) -> MazeArmResult<()> {
        let len = self.joints.len();
        let joint = self
            .joints
            .get_mut(index)
            .ok_or(MazeArmError::JointOutOfRange { index, len })?;
        joint.angle = angle;
        Ok(())
    }

    /// Current free-rotation angles, root first
    pub fn angles(&self) -> Vec<f64> {
        self.joints.iter().map(|joint| joint.angle).collect()
    }

    /// Walk parents up to the root, prepending each ancestor's local transform
    fn compose_to(&self, index: usize) -> Isometry3<f64> {
        let mut world = self.joints[index].local_transform();
        let mut current = index;
        while let Some(parent) = self.parent(current) {
            world = self.joints[parent].local_transform() * world;
            current = parent;
        }
        world
    }
}

impl ArticulatedChain for KinematicChain {
    fn joint_count(&self) -> usize {
        self.joints.len()
    }

    fn world_transform(&self, index: usize) -> Isometry3<f64> {
        self.compose_to(index)
    }

    fn rotation_angle(&self, index: usize) -> f64 {
        self.joints[index].angle
    }

    fn set_rotation_angle(&mut self, index: usize, angle: f64) {
        self.joints[index].angle = angle;
    }

    fn rotation_axis(&self, index: usize) -> JointAxis {
        self.joints[index].axis
    }

    fn rotation_limits(&self, index: usize) -> Option<JointLimits> {
        self.joints[index].limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_empty_chain_rejected() {
        assert!(matches!(
            KinematicChain::new(Vec::new()),
            Err(MazeArmError::EmptyChain)
        ));
    }

    #[test]
    fn test_planar_layout() {
        let chain = KinematicChain::planar(&[1.0, 0.8]);
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.end_effector_index(), 3);
        assert_eq!(chain.parent(0), None);
        assert_eq!(chain.parent(3), Some(2));
        assert_eq!(chain.parent(4), None);
        assert_relative_eq!(
            chain.end_effector_position(),
            Point3::new(0.0, 0.0, 1.8),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_world_transform_composes_ancestors() {
        let mut chain = KinematicChain::planar(&[1.0, 1.0]);
        chain.set_angle(1, PI / 2.0).unwrap();

        // Shoulder turned a quarter: the whole arm now lies along +x
        assert_relative_eq!(
            chain.world_position(2).unwrap(),
            Point3::new(1.0, 0.0, 0.0),
            epsilon = 1e-12
        );

        chain.set_angle(2, -PI / 2.0).unwrap();
        assert_relative_eq!(
            chain.end_effector_position(),
            Point3::new(1.0, 0.0, 1.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_world_transform_is_parent_then_local() {
        let mut chain = KinematicChain::six_axis_arm();
        chain.set_angle(3, 0.4).unwrap();

        for i in 1..chain.len() {
            let parent = chain.parent(i).unwrap();
            let expected =
                chain.world_transform(parent).unwrap() * chain.joints()[i].local_transform();
            assert_relative_eq!(
                chain.world_position(i).unwrap(),
                expected * Point3::origin(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_joint_out_of_range() {
        let mut chain = KinematicChain::planar(&[1.0]);
        assert!(matches!(
            chain.set_angle(7, 0.0),
            Err(MazeArmError::JointOutOfRange { index: 7, len: 3 })
        ));
        assert!(chain.world_transform(3).is_err());
    }

    #[test]
    fn test_six_axis_arm_layout() {
        let arm = KinematicChain::six_axis_arm();
        assert_eq!(arm.len(), 7);
        assert!(arm.joints()[0].limits.is_none());
        assert!(arm.joints()[1..].iter().all(|j| j.limits.is_some()));
        assert!(arm.joints().iter().all(|j| j.axis == JointAxis::Y));
        // Shoulder sits 0.2 above the base
        assert_relative_eq!(
            arm.world_position(1).unwrap(),
            Point3::new(0.0, 0.2, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_trait_view_matches_inherent() {
        let chain = KinematicChain::six_axis_arm();
        let view: &dyn ArticulatedChain = &chain;
        assert_eq!(view.joint_count(), chain.len());
        assert_relative_eq!(
            view.world_position(6),
            chain.end_effector_position(),
            epsilon = 1e-12
        );
    }
}
