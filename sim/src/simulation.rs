use std::time::Duration;

use kinematic::{
    ColliderId, CollisionState, Controller, Locomotion, LocomotionInput, Motion, MoveRequest,
    PlatformController, StaticWorld, Surface, TransportPhase, Vec2,
};
use tracing::{debug, trace, warn};

use crate::{
    SimConfig, SimError,
    scene::{BodyBox, PLATFORM_LAYER, PLAYER_LAYER, SceneCaster},
};

/// First id handed to moving bodies; level colliders use ids below it.
pub const FIRST_BODY_ID: u32 = 0x8000_0000;

pub struct Player {
    pub id: ColliderId,
    pub position: Vec2,
    controller: Controller,
    locomotion: Locomotion,
}

impl Player {
    #[inline]
    pub fn collisions(&self) -> &CollisionState {
        self.controller.collisions()
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.locomotion.velocity()
    }

    #[inline]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    #[inline]
    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    fn body(&self) -> BodyBox {
        BodyBox {
            id: self.id,
            center: self.position,
            half_extents: self.controller.half_extents(),
            layers: PLAYER_LAYER,
            surface: Surface::Solid,
        }
    }
}

pub struct Platform {
    pub id: ColliderId,
    pub surface: Surface,
    controller: PlatformController,
}

impl Platform {
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.controller.position()
    }

    #[inline]
    pub fn controller(&self) -> &PlatformController {
        &self.controller
    }

    fn body(&self) -> BodyBox {
        BodyBox {
            id: self.id,
            center: self.controller.position(),
            half_extents: self.controller.half_extents(),
            layers: PLATFORM_LAYER,
            surface: self.surface,
        }
    }
}

/// Fixed-step orchestrator: platforms with their riders first, then players.
pub struct Simulation {
    statics: StaticWorld,
    players: Vec<Player>,
    platforms: Vec<Platform>,
    /// Per-step snapshot of every moving box, kept in sync as bodies move.
    bodies: Vec<BodyBox>,
    now: Duration,
    steps: u64,
}

impl Simulation {
    /// Build the level and spawn one player from `config`.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        let statics = StaticWorld::build(config.statics.clone())?;
        let mut next_id = FIRST_BODY_ID;
        let mut take_id = || {
            let id = ColliderId(next_id);
            next_id += 1;
            id
        };

        let player = &config.player;
        let players = vec![Player {
            id: take_id(),
            position: player.spawn,
            controller: Controller::new(player.controller, player.half_extents)?,
            locomotion: Locomotion::new(player.locomotion)?,
        }];

        let platforms = config
            .platforms
            .iter()
            .map(|p| -> Result<Platform, SimError> {
                Ok(Platform {
                    id: take_id(),
                    surface: p.surface,
                    controller: PlatformController::new(&p.settings, p.half_extents, p.position)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "simulation built: {} statics, {} players, {} platforms",
            statics.len(),
            players.len(),
            platforms.len()
        );

        let mut sim = Self {
            statics,
            players,
            platforms,
            bodies: Vec::new(),
            now: Duration::ZERO,
            steps: 0,
        };
        sim.refresh_bodies();
        Ok(sim)
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[inline]
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    #[inline]
    pub fn statics(&self) -> &StaticWorld {
        &self.statics
    }

    /// Advance one fixed step. `inputs[i]` drives player `i`; missing entries idle.
    ///
    /// Returns the motion resolved for each player's own move.
    pub fn step(&mut self, dt: f32, inputs: &[LocomotionInput]) -> Vec<Motion> {
        let step = match Duration::try_from_secs_f32(dt) {
            Ok(step) if step > Duration::ZERO => step,
            _ => {
                warn!("ignoring step with invalid dt {dt}");
                return Vec::new();
            }
        };
        let now = self.now;
        self.refresh_bodies();

        for index in 0..self.platforms.len() {
            self.step_platform(index, dt, now);
        }

        let idle = LocomotionInput::default();
        let mut motions = Vec::with_capacity(self.players.len());
        for (index, player) in self.players.iter_mut().enumerate() {
            let input = inputs.get(index).unwrap_or(&idle);
            let desired = player
                .locomotion
                .desired_displacement(input, player.controller.collisions(), dt);

            let scene = SceneCaster::new(&self.statics, &self.bodies).excluding(player.id);
            let motion = player.controller.move_body(
                &scene,
                &mut player.position,
                MoveRequest::new(desired, now).with_input(input.direction),
            );
            player.locomotion.land(&motion.collisions, dt);
            sync_body(&mut self.bodies, player.id, player.position);

            trace!(
                "player {:?} at ({:.3}, {:.3}) moved ({:.4}, {:.4})",
                player.id,
                player.position.x,
                player.position.y,
                motion.displacement.x,
                motion.displacement.y
            );
            motions.push(motion);
        }

        self.steps += 1;
        self.now = self.now.saturating_add(step);
        motions
    }

    /// Two-phase transport for one platform.
    fn step_platform(&mut self, index: usize, dt: f32, now: Duration) {
        let platform = &mut self.platforms[index];
        platform.controller.advance(dt, now);
        {
            let scene = SceneCaster::new(&self.statics, &self.bodies).excluding(platform.id);
            platform.controller.detect_passengers(&scene);
        }

        carry_riders(
            &self.statics,
            &mut self.bodies,
            &mut self.players,
            &platform.controller,
            TransportPhase::BeforePlatform,
            now,
        );

        platform.controller.translate();
        sync_body(&mut self.bodies, platform.id, platform.controller.position());

        carry_riders(
            &self.statics,
            &mut self.bodies,
            &mut self.players,
            &platform.controller,
            TransportPhase::AfterPlatform,
            now,
        );
    }

    fn refresh_bodies(&mut self) {
        self.bodies.clear();
        self.bodies.extend(self.players.iter().map(Player::body));
        self.bodies.extend(self.platforms.iter().map(Platform::body));
    }
}

fn sync_body(bodies: &mut [BodyBox], id: ColliderId, center: Vec2) {
    if let Some(body) = bodies.iter_mut().find(|b| b.id == id) {
        body.center = center;
    }
}

fn carry_riders(
    statics: &StaticWorld,
    bodies: &mut [BodyBox],
    players: &mut [Player],
    platform: &PlatformController,
    phase: TransportPhase,
    now: Duration,
) {
    for movement in platform.riders(phase) {
        let Some(player) = players.iter_mut().find(|p| p.id == movement.rider) else {
            continue;
        };

        let request = MoveRequest::new(movement.displacement, now)
            .with_resting_on_platform(movement.standing_on_platform);
        {
            let scene = SceneCaster::new(statics, bodies).excluding(player.id);
            player
                .controller
                .move_body(&scene, &mut player.position, request);
        }
        sync_body(bodies, player.id, player.position);
    }
}
