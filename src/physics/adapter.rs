//! Adapter between pixel-space actors and the external physics world
//!
//! Translates actor boxes into body/fixture definitions at a fixed scale
//! (pixels per world unit), classifies bodies from the actor's kind tag, and
//! pushes per-step speed caps, impulses and forces through the engine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorKind};
use crate::physics::engine::{
    BodyHandle, BodyKind, ContactEvent, ContactTag, FixtureDef, FixtureRole, FixtureShape,
    PhysicsEngine,
};
use crate::tuning::Tuning;

/// Height of the ground sensor hung beneath a player body (pixels)
const BOTTOM_SENSOR_HEIGHT: f32 = 4.0;
/// Sensor width as a fraction of the body width, narrowed so wall contact
/// does not read as ground
const BOTTOM_SENSOR_WIDTH_RATIO: f32 = 0.8;

/// Per-actor link to an engine body, plus the state contact routing maintains
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsBinding {
    pub body: BodyHandle,
    /// Speed caps in pixels/sec, enforced against the engine each step
    pub max_speed: Option<f32>,
    pub max_speed_x: Option<f32>,
    /// Number of solid surfaces the bottom sensor currently touches
    pub ground_contacts: u32,
}

impl PhysicsBinding {
    pub fn new(body: BodyHandle) -> Self {
        Self {
            body,
            max_speed: None,
            max_speed_x: None,
            ground_contacts: 0,
        }
    }

    /// Grounded while at least one solid surface touches the bottom sensor.
    /// A counter rather than a flag: standing on two overlapping platforms
    /// and leaving one must stay grounded.
    #[inline]
    pub fn is_on_ground(&self) -> bool {
        self.ground_contacts > 0
    }
}

/// Material properties forwarded to fixture creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsProps {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for PhysicsProps {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

/// Owns the engine plus the pixel/world scale and solver iteration counts
pub struct PhysicsAdapter<E: PhysicsEngine> {
    engine: E,
    pixels_per_unit: f32,
    velocity_iterations: u32,
    position_iterations: u32,
}

impl<E: PhysicsEngine> PhysicsAdapter<E> {
    pub fn new(engine: E, tuning: &Tuning) -> Self {
        Self {
            engine,
            pixels_per_unit: tuning.pixels_per_unit,
            velocity_iterations: tuning.velocity_iterations,
            position_iterations: tuning.position_iterations,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[inline]
    pub fn to_world(&self, pixels: Vec2) -> Vec2 {
        pixels / self.pixels_per_unit
    }

    #[inline]
    pub fn to_pixels(&self, world: Vec2) -> Vec2 {
        world * self.pixels_per_unit
    }

    /// Create a body and fixtures for an actor and attach the binding.
    ///
    /// Classification follows the actor's kind tag: players and projectiles
    /// are dynamic, everything else is static; collectibles get a sensor
    /// fixture so they report contact without deflecting the player; players
    /// additionally get a narrow bottom sensor for ground detection.
    pub fn bind(&mut self, actor: &mut Actor, props: &PhysicsProps) {
        let kind = match actor.kind {
            ActorKind::Player | ActorKind::Projectile => BodyKind::Dynamic,
            ActorKind::Solid | ActorKind::Collectible | ActorKind::Generic => BodyKind::Static,
        };
        let role = match actor.kind {
            ActorKind::Player | ActorKind::Projectile => FixtureRole::Main,
            ActorKind::Collectible => FixtureRole::Collectible,
            ActorKind::Solid | ActorKind::Generic => FixtureRole::Solid,
        };

        let body = self.engine.create_body(kind, self.to_world(actor.center()));
        let half_extents = self.to_world(actor.size / 2.0);

        self.engine.attach_fixture(
            body,
            &FixtureDef {
                shape: FixtureShape::Box {
                    half_extents,
                    offset: Vec2::ZERO,
                },
                density: props.density,
                friction: props.friction,
                restitution: props.restitution,
                is_sensor: actor.kind == ActorKind::Collectible,
                tag: ContactTag {
                    actor: actor.id,
                    role,
                },
            },
        );

        if actor.kind == ActorKind::Player {
            let sensor_half = self.to_world(Vec2::new(
                actor.size.x * BOTTOM_SENSOR_WIDTH_RATIO / 2.0,
                BOTTOM_SENSOR_HEIGHT / 2.0,
            ));
            let sensor_offset = self.to_world(Vec2::new(0.0, -actor.size.y / 2.0));
            self.engine.attach_fixture(
                body,
                &FixtureDef {
                    shape: FixtureShape::Box {
                        half_extents: sensor_half,
                        offset: sensor_offset,
                    },
                    density: 0.0,
                    friction: 0.0,
                    restitution: 0.0,
                    is_sensor: true,
                    tag: ContactTag {
                        actor: actor.id,
                        role: FixtureRole::BottomSensor,
                    },
                },
            );
        }

        actor.physics = Some(PhysicsBinding::new(body));
        log::debug!("bound actor {} ({:?}) to body {:?}", actor.id, actor.kind, body);
    }

    /// Read the engine's velocity back, clamp to the binding's caps (given in
    /// pixels/sec), and write the result. Per-axis cap first, then the
    /// whole-vector cap, matching the kinematic integrator.
    pub fn enforce_speed_caps(&mut self, actor: &Actor) {
        let Some(binding) = &actor.physics else {
            return;
        };
        if binding.max_speed.is_none() && binding.max_speed_x.is_none() {
            return;
        }

        let mut velocity = self.to_pixels(self.engine.linear_velocity(binding.body));
        let before = velocity;
        if let Some(mx) = binding.max_speed_x {
            velocity.x = velocity.x.clamp(-mx, mx);
        }
        if let Some(m) = binding.max_speed {
            let speed = velocity.length();
            if speed > m {
                velocity *= m / speed;
            }
        }
        if velocity != before {
            let v = self.to_world(velocity);
            self.engine.set_linear_velocity(binding.body, v);
        }
    }

    /// Instantaneous velocity change, e.g. a jump. `impulse` in pixel units.
    pub fn apply_impulse(&mut self, actor: &Actor, impulse: Vec2) {
        if let Some(binding) = &actor.physics {
            self.engine.apply_impulse(binding.body, self.to_world(impulse));
        }
    }

    /// Continuous push over the next step, e.g. a thruster. `force` in pixel units.
    pub fn apply_force(&mut self, actor: &Actor, force: Vec2) {
        if let Some(binding) = &actor.physics {
            self.engine.apply_force(binding.body, self.to_world(force));
        }
    }

    /// Step the world; contact events come back for a separate routing pass
    pub fn step(&mut self, dt: f32) -> Vec<ContactEvent> {
        self.engine
            .step(dt, self.velocity_iterations, self.position_iterations)
    }

    /// Copy the engine's body position back onto the actor's box
    pub fn sync_actor(&self, actor: &mut Actor) {
        if let Some(binding) = &actor.physics {
            let center = self.to_pixels(self.engine.position(binding.body));
            actor.set_center(center);
        }
    }

    /// Destroy the actor's body and drop the binding
    pub fn release(&mut self, actor: &mut Actor) {
        if let Some(binding) = actor.physics.take() {
            self.engine.destroy_body(binding.body);
        }
    }
}
