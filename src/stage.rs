//! Stage: actor storage and the per-frame driver
//!
//! One stage per screen. All mutation happens on the single simulation
//! thread; the only discipline required is ordering, which one frame follows
//! strictly: input-driven accelerations, kinematic integration for every
//! actor, collision passes against the freshly integrated positions, removal
//! application, external physics step with contact routing, then draw reads.
//! Destructive removal is deferred to a per-frame set so pairwise scans never
//! mutate the list they iterate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId, ActorTemplate};

/// Per-frame transient set of actors marked for destruction. Deduplicated:
/// marking twice destroys once.
#[derive(Debug, Clone, Default)]
pub struct RemovalSet {
    ids: Vec<ActorId>,
}

impl RemovalSet {
    pub fn mark(&mut self, id: ActorId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    fn take(&mut self) -> Vec<ActorId> {
        std::mem::take(&mut self.ids)
    }
}

/// Actor list plus frame bookkeeping. Actors are stored sorted by id, so
/// iteration order is deterministic across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    actors: Vec<Actor>,
    next_id: ActorId,
    /// Simulation frame counter
    pub frame: u64,
    #[serde(skip)]
    removals: RemovalSet,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    pub fn new() -> Self {
        Self {
            actors: Vec::new(),
            next_id: 1,
            frame: 0,
            removals: RemovalSet::default(),
        }
    }

    /// Allocate a fresh actor id
    pub fn next_actor_id(&mut self) -> ActorId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an actor from a template at `pos`
    pub fn spawn(&mut self, template: &ActorTemplate, pos: Vec2) -> ActorId {
        let id = self.next_actor_id();
        self.actors.push(template.spawn(id, pos));
        id
    }

    /// Insert a hand-built actor, assigning it a fresh id
    pub fn insert(&mut self, mut actor: Actor) -> ActorId {
        let id = self.next_actor_id();
        actor.id = id;
        actor.prev_pos = actor.pos;
        self.actors.push(actor);
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Actors the renderer should draw this frame
    pub fn visible_actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| a.visible)
    }

    /// Advance motion and animation for every actor. Collision checks this
    /// frame must run after this, against the advanced positions; resolving
    /// against stale positions tunnels.
    pub fn integrate_all(&mut self, dt: f32) {
        self.frame += 1;
        for actor in &mut self.actors {
            actor.integrate(dt);
        }
    }

    /// Mark an actor for destruction at the end of the frame's collision
    /// passes. Idempotent within the frame.
    pub fn mark_for_removal(&mut self, id: ActorId) {
        self.removals.mark(id);
    }

    pub fn removal_set(&self) -> &RemovalSet {
        &self.removals
    }

    /// Destroy every marked actor, invoking `on_destroy` exactly once per
    /// actor. Runs after all pairwise checks so multi-collision results are
    /// order-independent within the frame.
    pub fn apply_removals(&mut self, mut on_destroy: impl FnMut(&Actor)) {
        let marked = self.removals.take();
        if marked.is_empty() {
            return;
        }
        for id in &marked {
            match self.actors.iter().position(|a| a.id == *id) {
                Some(idx) => {
                    let actor = self.actors.remove(idx);
                    on_destroy(&actor);
                }
                // Already gone (marked in a previous frame and destroyed, or
                // never inserted); nothing to destroy.
                None => log::warn!("removal of unknown actor {id}"),
            }
        }
        log::debug!("frame {}: removed {} actors", self.frame, marked.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorKind;
    use crate::kinematics::Kinematics;

    fn moving_actor(pos: Vec2, velocity: Vec2) -> Actor {
        let mut actor = Actor::new(0, ActorKind::Generic, pos, Vec2::splat(10.0));
        let mut kin = Kinematics::new();
        kin.velocity = velocity;
        actor.kinematics = Some(kin);
        actor
    }

    #[test]
    fn test_ids_are_sequential_and_sorted() {
        let mut stage = Stage::new();
        let a = stage.insert(moving_actor(Vec2::ZERO, Vec2::ZERO));
        let b = stage.insert(moving_actor(Vec2::ZERO, Vec2::ZERO));
        assert!(b > a);
        let ids: Vec<_> = stage.actors().iter().map(|a| a.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_integrate_all_advances_every_actor() {
        let mut stage = Stage::new();
        stage.insert(moving_actor(Vec2::ZERO, Vec2::new(60.0, 0.0)));
        stage.insert(moving_actor(Vec2::new(0.0, 5.0), Vec2::new(0.0, -60.0)));

        stage.integrate_all(1.0);
        assert_eq!(stage.frame, 1);
        assert_eq!(stage.actors()[0].pos, Vec2::new(60.0, 0.0));
        assert_eq!(stage.actors()[1].pos, Vec2::new(0.0, -55.0));
        // Previous positions retained for swept tests
        assert_eq!(stage.actors()[0].prev_pos, Vec2::ZERO);
    }

    #[test]
    fn test_double_removal_destroys_once() {
        let mut stage = Stage::new();
        let id = stage.insert(moving_actor(Vec2::ZERO, Vec2::ZERO));

        // Two lasers hit the same rock in one frame
        stage.mark_for_removal(id);
        stage.mark_for_removal(id);
        assert_eq!(stage.removal_set().len(), 1);

        let mut destroyed = 0;
        stage.apply_removals(|_| destroyed += 1);
        assert_eq!(destroyed, 1);
        assert!(stage.is_empty());

        // The set drains with the frame
        assert!(stage.removal_set().is_empty());
    }

    #[test]
    fn test_breakout_frame_ordering() {
        use crate::collision;
        use crate::shape::ShapeKind;
        use crate::tuning::Tuning;

        let tuning = Tuning::default();
        let mut stage = Stage::new();

        let mut ball = Actor::new(
            0,
            ActorKind::Projectile,
            Vec2::new(20.0, 40.0),
            Vec2::splat(10.0),
        );
        ball.shape = ShapeKind::ellipse();
        let mut kin = Kinematics::new();
        kin.set_velocity(240.0, 0.0);
        ball.kinematics = Some(kin);
        let ball_id = stage.insert(ball);

        let brick = Actor::new(
            0,
            ActorKind::Solid,
            Vec2::new(32.0, 20.0),
            Vec2::new(20.0, 50.0),
        );
        let brick_id = stage.insert(brick);

        // Integration first; the collision pass sees advanced positions
        stage.integrate_all(1.0 / 24.0);

        let (head, tail) = stage.actors_mut().split_at_mut(1);
        let (ball, brick) = (&mut head[0], &tail[0]);
        assert!(collision::overlaps(ball, brick, &tuning));

        let report = collision::bounce_off_rect(ball, brick);
        assert!(report.reversed_x);
        assert!(!report.corner);
        collision::overlaps_resolve(ball, brick, &tuning);

        // Brick destruction is deferred past the pairwise scan
        stage.mark_for_removal(brick_id);
        let mut destroyed = Vec::new();
        stage.apply_removals(|a| destroyed.push(a.id));
        assert_eq!(destroyed, vec![brick_id]);

        let ball = stage.get(ball_id).unwrap();
        assert!(ball.kinematics.as_ref().unwrap().velocity.x < 0.0);
    }

    #[test]
    fn test_removal_deferred_until_applied() {
        let mut stage = Stage::new();
        let id = stage.insert(moving_actor(Vec2::ZERO, Vec2::ZERO));
        stage.mark_for_removal(id);
        // Still present mid-scan
        assert!(stage.get(id).is_some());
        stage.apply_removals(|_| {});
        assert!(stage.get(id).is_none());
    }
}
