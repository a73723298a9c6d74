use log::trace;

use crate::{
    collision::{ColliderId, CollisionLayers, RayCaster, RaycastProbe, Vec2},
    utils::sign,
};

/// Displacement one rider receives from a moving platform this step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassengerMovement {
    pub rider: ColliderId,
    pub displacement: Vec2,
    /// The rider is on top of the platform and should be treated as grounded.
    pub standing_on_platform: bool,
    /// Move the rider before the platform translates (pushed riders), or after (carried riders).
    pub move_before_platform: bool,
}

/// Probe around the platform for riders affected by `displacement`.
///
/// `probe` must already hold origins for the platform's pre-move position.
/// Results are appended to `out`; each rider appears at most once.
pub(crate) fn detect_passengers<W: RayCaster + ?Sized>(
    world: &W,
    probe: &RaycastProbe,
    displacement: Vec2,
    mask: CollisionLayers,
    out: &mut Vec<PassengerMovement>,
) {
    let skin = probe.skin();
    let origins = probe.origins();
    let spacing = probe.spacing();
    let direction_x = sign(displacement.x);
    let direction_y = sign(displacement.y);

    let mut record = |rider: ColliderId, displacement: Vec2, standing: bool, before: bool| {
        if out.iter().any(|p| p.rider == rider) {
            return;
        }
        trace!("platform rider {rider:?} pushed by {displacement:?} (standing={standing}, before={before})");
        out.push(PassengerMovement {
            rider,
            displacement,
            standing_on_platform: standing,
            move_before_platform: before,
        });
    };

    // Riders above a rising platform, or below a sinking one.
    if displacement.y != 0.0 {
        let ray_length = displacement.y.abs() + skin;
        for i in 0..spacing.vertical_count {
            let origin = origins.left(direction_y) + Vec2::x() * (spacing.vertical_spacing * i as f32);
            let Some(hit) = world.cast_ray(origin, Vec2::y() * direction_y, ray_length, mask) else {
                continue;
            };
            if hit.is_resting_contact() {
                continue;
            }
            let push_x = if direction_y > 0.0 { displacement.x } else { 0.0 };
            let push_y = displacement.y - (hit.distance - skin) * direction_y;
            record(hit.collider, Vec2::new(push_x, push_y), direction_y > 0.0, true);
        }
    }

    // Riders in front of a sideways-moving platform.
    if displacement.x != 0.0 {
        let ray_length = displacement.x.abs() + skin;
        for i in 0..spacing.horizontal_count {
            let origin = origins.bottom(direction_x) + Vec2::y() * (spacing.horizontal_spacing * i as f32);
            let Some(hit) = world.cast_ray(origin, Vec2::x() * direction_x, ray_length, mask) else {
                continue;
            };
            if hit.is_resting_contact() {
                continue;
            }
            let push_x = displacement.x - (hit.distance - skin) * direction_x;
            record(hit.collider, Vec2::new(push_x, -skin), false, true);
        }
    }

    // Riders on top of a platform moving down or purely sideways get carried afterwards.
    if direction_y < 0.0 || (displacement.y == 0.0 && displacement.x != 0.0) {
        let ray_length = 2.0 * skin;
        for i in 0..spacing.vertical_count {
            let origin = origins.top_left + Vec2::x() * (spacing.vertical_spacing * i as f32);
            let Some(hit) = world.cast_ray(origin, Vec2::y(), ray_length, mask) else {
                continue;
            };
            if hit.is_resting_contact() {
                continue;
            }
            record(hit.collider, displacement, true, false);
        }
    }
}
