//! Fixed-step time integration for world bodies
//!
//! Semi-implicit Euler: damp, kick with the accumulated force, then drift
//! with the new velocity. Damping follows the per-second convention
//! `v *= (1 - damping)^dt`, so the decay rate does not depend on the step size.

use super::states::{NQuat, NVec3};
use super::world::{BodyKind, RigidBody};

/// Velocity scale applied over one step of length `dt`
pub fn damping_factor(damping: f64, dt: f64) -> f64 {
    (1.0 - damping.clamp(0.0, 1.0)).powf(dt)
}

/// Advance one body by `dt`. Static bodies never move.
pub fn integrate_body(body: &mut RigidBody, dt: f64, gravity: &NVec3) {
    match body.kind {
        BodyKind::Static => {}
        BodyKind::Kinematic => {
            // Drift only: kinematic bodies carry their own velocity
            body.position += dt * body.velocity;
            integrate_rotation(body, dt);
        }
        BodyKind::Dynamic => {
            let inv_mass = body.inv_mass();

            // Damp: v <- v * (1 - d)^dt
            body.velocity *= damping_factor(body.linear_damping, dt);

            // Kick: v <- v + dt * (F/m + g)
            let accel = body.force() * inv_mass + gravity;
            body.velocity += dt * accel;

            // Drift: x <- x + dt * v
            body.position += dt * body.velocity;

            if body.fixed_rotation {
                body.angular_velocity = NVec3::zeros();
                return;
            }
            body.angular_velocity *= damping_factor(body.angular_damping, dt);
            body.angular_velocity += dt * body.inv_inertia() * body.torque();
            integrate_rotation(body, dt);
        }
    }
}

fn integrate_rotation(body: &mut RigidBody, dt: f64) {
    let w = body.angular_velocity;
    if w.norm_squared() == 0.0 {
        return;
    }
    let dq = NQuat::from_scaled_axis(dt * w);
    body.quaternion = dq * body.quaternion;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::world::Shape;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn damping_factor_is_step_size_independent() {
        // one step of 2dt == two steps of dt
        let one = damping_factor(0.95, 2.0 * DT);
        let two = damping_factor(0.95, DT).powi(2);
        assert!((one - two).abs() < 1e-12);
        assert!(damping_factor(0.0, DT) == 1.0);
    }

    #[test]
    fn kinematic_body_ignores_force_and_gravity() {
        let mut body = RigidBody::kinematic(Shape::Sphere { radius: 0.5 })
            .with_position(NVec3::new(0.3, 0.2, 0.1));
        body.apply_force(&NVec3::new(100.0, 0.0, 0.0), &NVec3::zeros());
        integrate_body(&mut body, DT, &NVec3::new(0.0, -9.8, 0.0));
        assert_eq!(body.position, NVec3::new(0.3, 0.2, 0.1));
    }

    #[test]
    fn dynamic_kick_then_drift() {
        let mut body = RigidBody::dynamic(Shape::Sphere { radius: 0.2 }, 2.0);
        body.apply_force(&NVec3::new(4.0, 0.0, 0.0), &NVec3::zeros());
        integrate_body(&mut body, DT, &NVec3::zeros());

        // v = F/m dt, x = v dt
        let v = 2.0 * DT;
        assert!((body.velocity.x - v).abs() < 1e-12);
        assert!((body.position.x - v * DT).abs() < 1e-12);
    }

    #[test]
    fn fixed_rotation_keeps_orientation() {
        let mut body = RigidBody::dynamic(Shape::Sphere { radius: 0.2 }, 1.0).with_fixed_rotation(true);
        body.apply_force(&NVec3::new(0.0, 1.0, 0.0), &NVec3::new(0.2, 0.0, 0.0));
        integrate_body(&mut body, DT, &NVec3::zeros());
        assert_eq!(body.quaternion, NQuat::identity());

        let mut free = RigidBody::dynamic(Shape::Sphere { radius: 0.2 }, 1.0);
        free.apply_force(&NVec3::new(0.0, 1.0, 0.0), &NVec3::new(0.2, 0.0, 0.0));
        integrate_body(&mut free, DT, &NVec3::zeros());
        assert!(free.quaternion.angle() > 0.0);
    }
}
