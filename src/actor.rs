//! Actors: positioned, sized entities built from optional components
//!
//! A single concrete `Actor` replaces an inheritance chain: capabilities are
//! optional components (kinematics, animation selection, a physics-engine
//! binding) and game-specific classification is a plain tag. New entities
//! come from an [`ActorTemplate`] factory rather than cloning live actors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::kinematics::Kinematics;
use crate::physics::PhysicsBinding;
use crate::shape::{self, Polygon, ShapeKind};

/// Stable identity of an actor within a stage
pub type ActorId = u32;

/// Game-specific classification carried as data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActorKind {
    #[default]
    Generic,
    /// The player-controlled entity (gets a ground sensor when bound to physics)
    Player,
    /// Immovable level geometry
    Solid,
    /// Removed on contact with the player
    Collectible,
    /// Short-lived moving entity (laser, thrown object)
    Projectile,
}

/// Chooses which animation name is active; never touches assets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSelector {
    /// Name the renderer should play (e.g. "walk")
    pub active: String,
    /// Seconds since `active` last changed
    pub elapsed: f32,
    /// Name used while the actor is moving
    pub moving_name: String,
    /// Name used while the actor is at rest
    pub idle_name: String,
    /// Speed above which the moving name is selected
    pub move_threshold: f32,
}

impl AnimationSelector {
    pub fn new(moving_name: &str, idle_name: &str, move_threshold: f32) -> Self {
        Self {
            active: idle_name.to_string(),
            elapsed: 0.0,
            moving_name: moving_name.to_string(),
            idle_name: idle_name.to_string(),
            move_threshold,
        }
    }

    /// Switch the active name; elapsed time restarts only on a real change
    pub fn set_active(&mut self, name: &str) {
        if self.active != name {
            self.active = name.to_string();
            self.elapsed = 0.0;
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Pick moving vs idle name from the current speed
    pub fn select_by_speed(&mut self, speed: f32) {
        let name = if speed > self.move_threshold {
            self.moving_name.clone()
        } else {
            self.idle_name.clone()
        };
        self.set_active(&name);
    }
}

/// A positioned, sized, drawable entity participating in the simulation.
///
/// Position is the bottom-left corner of the actor's box in a y-up world;
/// rotation is degrees about the box center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub pos: Vec2,
    /// Position at the start of the current frame, for swept contact tests
    pub prev_pos: Vec2,
    pub size: Vec2,
    pub rotation_deg: f32,
    pub visible: bool,
    pub shape: ShapeKind,
    pub kinematics: Option<Kinematics>,
    pub animation: Option<AnimationSelector>,
    pub physics: Option<PhysicsBinding>,
}

impl Actor {
    pub fn new(id: ActorId, kind: ActorKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            prev_pos: pos,
            size,
            rotation_deg: 0.0,
            visible: true,
            shape: ShapeKind::Rectangle,
            kinematics: None,
            animation: None,
            physics: None,
        }
    }

    /// Center of the actor's box
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Center at the start of the current frame
    #[inline]
    pub fn prev_center(&self) -> Vec2 {
        self.prev_pos + self.size / 2.0
    }

    /// Place the box so its center lands on `center`
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size / 2.0;
    }

    /// Radius of the bounding circle around the box center
    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        self.size.max_element() / 2.0
    }

    /// Derive this actor's bounding polygon in world space
    pub fn bounding_polygon(&self) -> Polygon {
        match self.shape {
            ShapeKind::Rectangle => shape::rectangle(self.pos, self.size, self.rotation_deg),
            ShapeKind::Ellipse { inset } => {
                shape::ellipse_octagon(self.pos, self.size, inset, self.rotation_deg)
            }
        }
    }

    /// Bounding polygon of this actor's box grown by `margin` on every side,
    /// used for proximity queries
    pub fn grown_polygon(&self, margin: f32) -> Polygon {
        let pos = self.pos - Vec2::splat(margin);
        let size = self.size + Vec2::splat(2.0 * margin);
        match self.shape {
            ShapeKind::Rectangle => shape::rectangle(pos, size, self.rotation_deg),
            ShapeKind::Ellipse { inset } => {
                shape::ellipse_octagon(pos, size, inset, self.rotation_deg)
            }
        }
    }

    /// Advance motion and animation by one timestep. Records the pre-step
    /// position for this frame's swept collision tests.
    pub fn integrate(&mut self, dt: f32) {
        self.prev_pos = self.pos;
        if let Some(kin) = self.kinematics.as_mut() {
            self.pos += kin.integrate(dt);
        }
        if let Some(anim) = self.animation.as_mut() {
            anim.advance(dt);
        }
    }

    /// Rotate the sprite to point along the current motion angle
    pub fn face_motion_angle(&mut self) {
        if let Some(kin) = &self.kinematics {
            if kin.is_moving() {
                self.rotation_deg = kin.motion_angle_deg();
            }
        }
    }

    /// Update the animation selection from the current speed
    pub fn select_animation_by_speed(&mut self) {
        let speed = self.kinematics.as_ref().map(|k| k.speed()).unwrap_or(0.0);
        if let Some(anim) = self.animation.as_mut() {
            anim.select_by_speed(speed);
        }
    }
}

/// Immutable spawn descriptor: everything shared between instances of one
/// entity type. `spawn` produces a fresh actor; templates are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorTemplate {
    pub kind: ActorKind,
    pub size: Vec2,
    pub shape: ShapeKind,
    /// Spawn with a kinematics component when set
    pub max_speed: Option<f32>,
    pub max_speed_x: Option<f32>,
    pub max_speed_y: Option<f32>,
    pub deceleration: f32,
    pub kinematic: bool,
    /// Spawn with an animation selector when set: (moving, idle, threshold)
    pub animation: Option<(String, String, f32)>,
}

impl ActorTemplate {
    pub fn new(kind: ActorKind, size: Vec2) -> Self {
        Self {
            kind,
            size,
            shape: ShapeKind::Rectangle,
            max_speed: None,
            max_speed_x: None,
            max_speed_y: None,
            deceleration: 0.0,
            kinematic: false,
            animation: None,
        }
    }

    pub fn with_shape(mut self, shape: ShapeKind) -> Self {
        self.shape = shape;
        self
    }

    pub fn kinematic(mut self) -> Self {
        self.kinematic = true;
        self
    }

    pub fn with_max_speed(mut self, s: f32) -> Self {
        self.max_speed = Some(s);
        self.kinematic = true;
        self
    }

    pub fn with_deceleration(mut self, d: f32) -> Self {
        self.deceleration = d;
        self.kinematic = true;
        self
    }

    pub fn with_animation(mut self, moving: &str, idle: &str, threshold: f32) -> Self {
        self.animation = Some((moving.to_string(), idle.to_string(), threshold));
        self
    }

    /// Build a fresh actor at `pos` from this template
    pub fn spawn(&self, id: ActorId, pos: Vec2) -> Actor {
        let mut actor = Actor::new(id, self.kind, pos, self.size);
        actor.shape = self.shape;
        if self.kinematic {
            let mut kin = Kinematics::new();
            kin.max_speed = self.max_speed;
            kin.max_speed_x = self.max_speed_x;
            kin.max_speed_y = self.max_speed_y;
            kin.deceleration = self.deceleration;
            actor.kinematics = Some(kin);
        }
        if let Some((moving, idle, threshold)) = &self.animation {
            actor.animation = Some(AnimationSelector::new(moving, idle, *threshold));
        }
        actor
    }
}
