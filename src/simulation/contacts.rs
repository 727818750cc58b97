//! Sphere vs. static plane constraint.
//!
//! Static planes act as half-spaces: the side their normal points to is free
//! space. A dynamic sphere that penetrates is pushed back along the normal and
//! loses the velocity component heading into the plane. Sphere-sphere and
//! kinematic-sphere pairs get no response.

use super::states::NVec3;
use super::world::{BodyKind, RigidBody, Shape};

#[derive(Debug, Clone, Copy)]
pub struct Halfspace {
    pub point: NVec3,
    pub normal: NVec3, // unit, points into free space
}

impl Halfspace {
    /// Half-space for a static plane body, `None` for anything else
    pub fn from_body(body: &RigidBody) -> Option<Self> {
        match (body.kind, body.shape) {
            (BodyKind::Static, Shape::Plane) => Some(Self {
                point: body.position,
                normal: body.plane_normal(),
            }),
            _ => None,
        }
    }

    /// Signed distance of `p` from the plane, positive in free space
    pub fn distance(&self, p: &NVec3) -> f64 {
        (p - self.point).dot(&self.normal)
    }
}

/// Push a dynamic sphere out of every plane it penetrates
pub fn constrain_sphere(body: &mut RigidBody, planes: &[Halfspace]) {
    if body.kind != BodyKind::Dynamic {
        return;
    }
    let Shape::Sphere { radius } = body.shape else {
        return;
    };

    for plane in planes {
        let penetration = radius - plane.distance(&body.position);
        if penetration <= 0.0 {
            continue;
        }
        body.position += penetration * plane.normal;

        let vn = body.velocity.dot(&plane.normal);
        if vn < 0.0 {
            body.velocity -= vn * plane.normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::NQuat;

    fn back_plane() -> Halfspace {
        let body = RigidBody::fixed(Shape::Plane).with_position(NVec3::new(0.0, 0.0, -0.7));
        Halfspace::from_body(&body).expect("static plane")
    }

    #[test]
    fn flipped_plane_faces_negative_z() {
        let body = RigidBody::fixed(Shape::Plane)
            .with_position(NVec3::new(0.0, 0.0, 0.7))
            .with_rotation(NQuat::from_euler_angles(std::f64::consts::PI, 0.0, 0.0));
        let plane = Halfspace::from_body(&body).expect("static plane");
        assert!((plane.normal - NVec3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn penetrating_sphere_is_pushed_out_and_stopped() {
        let mut body = RigidBody::dynamic(Shape::Sphere { radius: 0.2 }, 1.0)
            .with_position(NVec3::new(0.1, 0.0, -0.6));
        body.velocity = NVec3::new(1.0, 0.0, -2.0);

        constrain_sphere(&mut body, &[back_plane()]);

        assert!((body.position.z - (-0.5)).abs() < 1e-12);
        assert_eq!(body.position.x, 0.1);
        assert_eq!(body.velocity, NVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn separating_sphere_is_untouched() {
        let mut body = RigidBody::dynamic(Shape::Sphere { radius: 0.2 }, 1.0)
            .with_position(NVec3::new(0.0, 0.0, 0.3));
        body.velocity = NVec3::new(0.0, 0.0, -1.0);
        constrain_sphere(&mut body, &[back_plane()]);
        assert_eq!(body.position, NVec3::new(0.0, 0.0, 0.3));
        assert_eq!(body.velocity, NVec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn kinematic_sphere_passes_through() {
        let mut body = RigidBody::kinematic(Shape::Sphere { radius: 0.5 })
            .with_position(NVec3::new(0.0, 0.0, -2.0));
        constrain_sphere(&mut body, &[back_plane()]);
        assert_eq!(body.position.z, -2.0);
    }
}
