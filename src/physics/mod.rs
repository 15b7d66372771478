//! External physics engine adapter
//!
//! The engine itself is a black box behind the [`PhysicsEngine`] trait; this
//! module owns the pixel/world translation, body classification, per-step
//! speed caps, and the contact-event routing that turns engine callbacks into
//! actor-level state.

pub mod adapter;
pub mod contact;
pub mod engine;

pub use adapter::{PhysicsAdapter, PhysicsBinding, PhysicsProps};
pub use contact::{ContactOutcome, classify, route_contacts};
pub use engine::{
    BodyHandle, BodyKind, ContactEvent, ContactPhase, ContactTag, FixtureDef, FixtureRole,
    FixtureShape, PhysicsEngine,
};
