//! Black-box interface to an external 2D rigid-body engine
//!
//! The engine owns bodies, fixtures and the solver; this crate only speaks
//! world units through this trait. Contact callbacks are surfaced as a queue
//! of typed events returned from `step`, so classification and response can
//! run as a separate, testable pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

/// Opaque body identity assigned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Static bodies never respond to forces; dynamic bodies do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Fixture geometry in world units, offset from the body origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureShape {
    Box { half_extents: Vec2, offset: Vec2 },
    Circle { radius: f32, offset: Vec2 },
}

/// Role a fixture plays in contact classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureRole {
    /// The body's primary collision shape
    Main,
    /// Sensor hung beneath a player body for ground detection
    BottomSensor,
    /// Removed on contact with a player's main fixture
    Collectible,
    /// Immovable level geometry
    Solid,
}

/// User data attached to a fixture, echoed back in contact events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTag {
    pub actor: ActorId,
    pub role: FixtureRole,
}

/// Everything the engine needs to attach one fixture
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureDef {
    pub shape: FixtureShape,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Sensors report contacts but never collide
    pub is_sensor: bool,
    pub tag: ContactTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// One fixture-pair transition reported by the engine during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: ContactTag,
    pub b: ContactTag,
    pub phase: ContactPhase,
}

/// Contract the external rigid-body world must satisfy. All positions,
/// velocities, forces and impulses are in world units; the adapter converts
/// from pixels.
pub trait PhysicsEngine {
    fn create_body(&mut self, kind: BodyKind, position: Vec2) -> BodyHandle;
    fn attach_fixture(&mut self, body: BodyHandle, def: &FixtureDef);
    fn destroy_body(&mut self, body: BodyHandle);

    /// Advance the world and return every contact transition that occurred,
    /// begin and end, in the order the engine observed them.
    fn step(
        &mut self,
        dt: f32,
        velocity_iterations: u32,
        position_iterations: u32,
    ) -> Vec<ContactEvent>;

    fn position(&self, body: BodyHandle) -> Vec2;
    fn linear_velocity(&self, body: BodyHandle) -> Vec2;
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Continuous push applied over the next step (thruster)
    fn apply_force(&mut self, body: BodyHandle, force: Vec2);
    /// Instantaneous velocity change (jump)
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2);
}
