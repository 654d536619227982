//! 4x4 transformation matrices for scene nodes.
//!
//! This module provides the [`Transform`] value type used for both relative
//! and absolute node transforms. It wraps a column-major [`glam::Mat4`] and
//! follows the column-vector convention: a point `p` is transformed as
//! `M * p`, and `A * B` applies `B` first.
//!
//! # Conventions
//!
//! - Angles are in degrees.
//! - [`Transform::rotation`] is clockwise-positive: a positive angle turns
//!   clockwise when viewed from the positive end of the axis looking toward
//!   the origin.
//! - Scene nodes post-multiply (`relative = relative * m`), so each newly
//!   applied transform acts in the node's current local frame.
//!
//! # Example
//!
//! ```
//! use arbor_scene::Transform;
//! use glam::Vec3;
//!
//! // Rotate the local frame, then step forward along its z axis.
//! let m = Transform::rotation_x(90.0) * Transform::translation(Vec3::Z);
//! assert!((m.origin() - Vec3::Y).length() < 1e-5);
//! ```

use std::fmt;
use std::ops::{Mul, MulAssign};

use glam::{Mat4, Vec3, Vec4};

use crate::error::{SceneError, SceneResult};

/// A 4x4 affine or projective transformation.
#[derive(Clone, Copy, PartialEq)]
pub struct Transform(Mat4);

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform")
            .field(&self.0.to_cols_array_2d())
            .finish()
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self(Mat4::IDENTITY);

    /// Create the identity transform.
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Wrap a raw matrix.
    pub const fn from_mat4(matrix: Mat4) -> Self {
        Self(matrix)
    }

    /// The underlying matrix.
    pub const fn as_mat4(&self) -> &Mat4 {
        &self.0
    }

    /// Non-uniform scale along the three axes.
    pub fn scale(factors: Vec3) -> Self {
        Self(Mat4::from_scale(factors))
    }

    /// Translation by `offset`.
    pub fn translation(offset: Vec3) -> Self {
        Self(Mat4::from_translation(offset))
    }

    /// Rotation by `degrees` about `axis` using the axis-angle formula.
    ///
    /// The axis is normalized first; a zero-length axis yields the identity.
    /// See the module docs for the handedness of positive angles.
    pub fn rotation(degrees: f32, axis: Vec3) -> Self {
        let Some(k) = axis.try_normalize() else {
            return Self::IDENTITY;
        };
        let (s, c) = degrees.to_radians().sin_cos();
        let t = 1.0 - c;

        // c*I - s*[k]x + t*k*k^T, laid out column by column.
        Self(Mat4::from_cols(
            Vec4::new(t * k.x * k.x + c, t * k.x * k.y - s * k.z, t * k.x * k.z + s * k.y, 0.0),
            Vec4::new(t * k.x * k.y + s * k.z, t * k.y * k.y + c, t * k.y * k.z - s * k.x, 0.0),
            Vec4::new(t * k.x * k.z - s * k.y, t * k.y * k.z + s * k.x, t * k.z * k.z + c, 0.0),
            Vec4::W,
        ))
    }

    /// Rotation about the x axis.
    pub fn rotation_x(degrees: f32) -> Self {
        Self::rotation(degrees, Vec3::X)
    }

    /// Rotation about the y axis.
    pub fn rotation_y(degrees: f32) -> Self {
        Self::rotation(degrees, Vec3::Y)
    }

    /// Rotation about the z axis.
    pub fn rotation_z(degrees: f32) -> Self {
        Self::rotation(degrees, Vec3::Z)
    }

    /// Right-handed view matrix looking from `eye` toward `center`.
    ///
    /// The basis is `forward = normalize(center - eye)`,
    /// `right = normalize(forward × up)`, `up' = right × forward`; the rows
    /// hold `right`, `up'` and `-forward`, with the eye translation folded
    /// into the last column. This maps world space into view space, so it is
    /// the inverse of a camera's model transform.
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let forward = (center - eye).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);

        Self(Mat4::from_cols(
            Vec4::new(right.x, up.x, -forward.x, 0.0),
            Vec4::new(right.y, up.y, -forward.y, 0.0),
            Vec4::new(right.z, up.z, -forward.z, 0.0),
            Vec4::new(-right.dot(eye), -up.dot(eye), forward.dot(eye), 1.0),
        ))
    }

    /// Transform a point (w = 1).
    pub fn transform_point3(&self, point: Vec3) -> Vec3 {
        self.0.transform_point3(point)
    }

    /// Transform a direction (w = 0), ignoring translation.
    pub fn transform_vector3(&self, vector: Vec3) -> Vec3 {
        self.0.transform_vector3(vector)
    }

    /// Transform a homogeneous 4-component vector.
    pub fn transform_vec4(&self, vector: Vec4) -> Vec4 {
        self.0 * vector
    }

    /// The image of the origin, i.e. the translation part.
    pub fn origin(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }

    /// Matrix determinant.
    pub fn determinant(&self) -> f32 {
        self.0.determinant()
    }

    /// Inverse transform, or [`SceneError::NotInvertible`] for singular matrices.
    ///
    /// Only an exactly zero (or non-finite) determinant is rejected, so
    /// small but valid scales still invert.
    pub fn inverse(&self) -> SceneResult<Self> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(SceneError::NotInvertible { determinant });
        }
        Ok(Self(self.0.inverse()))
    }

    /// Transposed matrix.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Component-wise comparison within `max_abs_diff`.
    pub fn approx_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }
}

impl From<Mat4> for Transform {
    fn from(matrix: Mat4) -> Self {
        Self(matrix)
    }
}

impl From<Transform> for Mat4 {
    fn from(transform: Transform) -> Self {
        transform.0
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform(self.0 * rhs.0)
    }
}

impl MulAssign for Transform {
    fn mul_assign(&mut self, rhs: Transform) {
        self.0 *= rhs.0;
    }
}

impl Mul<Vec4> for Transform {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Vec4 {
        self.0 * rhs
    }
}

impl Mul<Vec3> for Transform {
    type Output = Vec3;

    /// Treats `rhs` as a point.
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform_point3(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const EPSILON: f32 = 1e-5;

    fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPSILON
    }

    #[test]
    fn test_identity() {
        assert_eq!(Transform::identity(), Transform::IDENTITY);
        assert_eq!(Transform::default().as_mat4(), &Mat4::IDENTITY);
        assert_eq!(Transform::IDENTITY.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_translation_moves_origin() {
        let t = Transform::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.origin(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t * Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
        // Directions ignore translation.
        assert_eq!(t.transform_vector3(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_scale() {
        let s = Transform::scale(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(s * Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
        assert!((s.determinant() - 24.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotation_is_clockwise_positive() {
        // Looking down +X, +90 turns +Z onto +Y.
        let r = Transform::rotation_x(90.0);
        assert!(approx_eq_vec3(r * Vec3::Z, Vec3::Y));
        assert!(approx_eq_vec3(r * Vec3::Y, Vec3::NEG_Z));

        let r = Transform::rotation_z(90.0);
        assert!(approx_eq_vec3(r * Vec3::X, Vec3::NEG_Y));

        let r = Transform::rotation_y(90.0);
        assert!(approx_eq_vec3(r * Vec3::X, Vec3::Z));
    }

    #[test]
    fn test_rotation_matches_negated_quaternion() {
        let axis = Vec3::new(1.0, 2.0, -0.5);
        let degrees = 37.0_f32;
        let ours = Transform::rotation(degrees, axis);
        let expected = Mat4::from_quat(Quat::from_axis_angle(
            axis.normalize(),
            -degrees.to_radians(),
        ));
        assert!(ours.approx_eq(&Transform::from(expected), EPSILON));
    }

    #[test]
    fn test_rotation_unnormalized_axis() {
        let a = Transform::rotation(30.0, Vec3::new(0.0, 5.0, 0.0));
        let b = Transform::rotation_y(30.0);
        assert!(a.approx_eq(&b, EPSILON));
    }

    #[test]
    fn test_rotation_zero_axis_is_identity() {
        assert_eq!(Transform::rotation(45.0, Vec3::ZERO), Transform::IDENTITY);
    }

    #[test]
    fn test_rotate_then_translate_in_local_frame() {
        let m = Transform::rotation_x(90.0) * Transform::translation(Vec3::new(0.0, 0.0, 1.0));
        assert!(
            approx_eq_vec3(m.origin(), Vec3::new(0.0, 1.0, 0.0)),
            "Expected (0, 1, 0), got {:?}",
            m.origin()
        );
    }

    #[test]
    fn test_composition_is_not_commutative() {
        let t = Transform::translation(Vec3::X);
        let r = Transform::rotation_z(90.0);
        assert!(!(t * r).approx_eq(&(r * t), EPSILON));
    }

    #[test]
    fn test_composition_is_associative() {
        let a = Transform::translation(Vec3::new(1.0, -2.0, 0.5));
        let b = Transform::rotation(33.0, Vec3::new(1.0, 1.0, 0.0));
        let c = Transform::scale(Vec3::new(2.0, 1.0, 0.5));
        assert!(((a * b) * c).approx_eq(&(a * (b * c)), EPSILON));
    }

    #[test]
    fn test_mul_assign() {
        let mut m = Transform::translation(Vec3::X);
        m *= Transform::translation(Vec3::Y);
        assert_eq!(m.origin(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_vec4_multiply() {
        let t = Transform::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t * Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(t.transform_vec4(Vec4::X), Vec4::X);
    }

    #[test]
    fn test_look_at_matches_glam() {
        let eye = Vec3::new(0.0, 2.0, 5.0);
        let ours = Transform::look_at(eye, Vec3::ZERO, Vec3::Y);
        let expected = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        assert!(ours.approx_eq(&Transform::from(expected), EPSILON));

        // The eye lands at the view-space origin, the target straight ahead.
        assert!(approx_eq_vec3(ours * eye, Vec3::ZERO));
        let target = ours * Vec3::ZERO;
        assert!(target.z < 0.0);
        assert!(target.x.abs() < EPSILON);
    }

    #[test]
    fn test_inverse() {
        let m = Transform::translation(Vec3::new(4.0, 0.0, -1.0))
            * Transform::rotation_y(25.0)
            * Transform::scale(Vec3::splat(2.0));
        let inv = m.inverse().unwrap();
        assert!((m * inv).approx_eq(&Transform::IDENTITY, EPSILON));
        assert!((inv * m).approx_eq(&Transform::IDENTITY, EPSILON));
    }

    #[test]
    fn test_inverse_of_singular_fails() {
        let err = Transform::scale(Vec3::new(1.0, 0.0, 1.0)).inverse().unwrap_err();
        assert!(matches!(err, SceneError::NotInvertible { determinant } if determinant == 0.0));
    }

    #[test]
    fn test_inverse_of_small_scale() {
        let m = Transform::scale(Vec3::splat(0.005));
        let inv = m.inverse().unwrap();
        let scaled = inv * Vec3::ONE;
        assert!((scaled - Vec3::splat(200.0)).abs().max_element() < 1e-3);
        assert!((m * inv).approx_eq(&Transform::IDENTITY, EPSILON));
    }

    #[test]
    fn test_inverse_of_non_finite_fails() {
        let m = Transform::scale(Vec3::new(f32::INFINITY, 1.0, 1.0));
        assert!(matches!(m.inverse(), Err(SceneError::NotInvertible { .. })));
    }

    #[test]
    fn test_transpose() {
        let r = Transform::rotation(72.0, Vec3::new(0.3, -1.0, 0.2));
        // Rotations are orthonormal: transpose is the inverse.
        assert!(r.transpose().approx_eq(&r.inverse().unwrap(), EPSILON));
        assert_eq!(r.transpose().transpose(), r);
    }
}
