//! Built-in demo level: flat ground, a walkable ramp, a too-steep slope, a
//! one-way ledge, a wall to slide on, and two moving platforms.

use kinematic::{
    ColliderShapeDef, CollisionLayers, PathSettings, PlatformSettings, Surface, Vec2,
    WorldStaticDef,
};

use crate::{
    config::PlatformConfig,
    scene::{PLATFORM_LAYER, PLAYER_LAYER, STATIC_LAYER},
    script::InputSegment,
};

pub fn player_spawn() -> Vec2 {
    Vec2::new(2.0, 3.0)
}

/// Players collide with the level and platforms, never with each other.
pub fn player_collision_mask() -> CollisionLayers {
    STATIC_LAYER | PLATFORM_LAYER
}

/// Platform defaults: carry players only.
pub fn platform_settings() -> PlatformSettings {
    PlatformSettings {
        passenger_mask: PLAYER_LAYER,
        ..PlatformSettings::default()
    }
}

pub fn demo_statics() -> Vec<WorldStaticDef> {
    let ramp_rise = 8.0 * 30f32.to_radians().tan();
    let steep_rise = 2.0 * 85f32.to_radians().tan();

    vec![
        WorldStaticDef::aabb(1, Vec2::new(-20.0, -1.0), Vec2::new(45.0, 0.0)),
        // 30° ramp up to a plateau.
        WorldStaticDef::new(
            2,
            Vec2::new(5.0, 0.0),
            ColliderShapeDef::Triangle {
                a: Vec2::zeros(),
                b: Vec2::new(8.0, 0.0),
                c: Vec2::new(8.0, ramp_rise),
            },
        ),
        WorldStaticDef::aabb(3, Vec2::new(13.0, 0.0), Vec2::new(20.0, ramp_rise)),
        // Too steep to stand on.
        WorldStaticDef::new(
            4,
            Vec2::new(-12.0, 0.0),
            ColliderShapeDef::Triangle {
                a: Vec2::zeros(),
                b: Vec2::new(2.0, 0.0),
                c: Vec2::new(0.0, steep_rise),
            },
        ),
        WorldStaticDef::aabb(5, Vec2::new(22.0, 3.0), Vec2::new(26.0, 3.3))
            .with_surface(Surface::OneWay),
        // Wall for sliding and wall jumps.
        WorldStaticDef::aabb(6, Vec2::new(43.0, 0.0), Vec2::new(45.0, 14.0)),
    ]
    .into_iter()
    .map(|def| def.with_layers(STATIC_LAYER))
    .collect()
}

pub fn demo_platforms() -> Vec<PlatformConfig> {
    let lift = PlatformSettings {
        path: PathSettings {
            local_waypoints: vec![Vec2::zeros(), Vec2::new(0.0, 4.0)],
            speed: 2.0,
            wait_time_secs: 0.5,
            ease_amount: 1.0,
            ..PathSettings::default()
        },
        ..platform_settings()
    };
    let shuttle = PlatformSettings {
        path: PathSettings {
            local_waypoints: vec![Vec2::zeros(), Vec2::new(6.0, 0.0)],
            speed: 2.5,
            wait_time_secs: 0.25,
            ..PathSettings::default()
        },
        ..platform_settings()
    };

    vec![
        PlatformConfig {
            position: Vec2::new(30.0, 0.75),
            half_extents: Vec2::new(1.5, 0.25),
            surface: Surface::Solid,
            settings: lift,
        },
        PlatformConfig {
            position: Vec2::new(34.0, 4.5),
            half_extents: Vec2::new(1.5, 0.25),
            surface: Surface::OneWay,
            settings: shuttle,
        },
    ]
}

/// Walk up the ramp, hop onto the ledge, drop through it, run into the wall and wall-jump off.
pub fn demo_script() -> Vec<InputSegment> {
    let right = Vec2::new(1.0, 0.0);
    let left = Vec2::new(-1.0, 0.0);
    let down = Vec2::new(0.0, -1.0);

    vec![
        InputSegment::new(1.0, 4.0, right),
        InputSegment::new(2.5, 2.9, Vec2::zeros()).with_jump(),
        InputSegment::new(4.0, 4.6, right).with_jump(),
        InputSegment::new(5.5, 5.8, down),
        InputSegment::new(6.5, 10.0, right),
        InputSegment::new(9.0, 9.3, left).with_jump(),
    ]
}
