//! Contact event classification and routing
//!
//! Classification is a pure function of the two fixture tags; routing applies
//! the resulting mutations (ground counters, pickup removal, animation
//! switch) to the stage. Keeping the two separate makes the rules testable
//! without an engine.

use crate::physics::engine::{ContactEvent, ContactPhase, FixtureRole};
use crate::actor::ActorId;
use crate::stage::Stage;

/// State mutation a contact event calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// A collectible touched a player's main fixture; remove it
    RemoveCollectible(ActorId),
    /// A solid surface started touching this actor's bottom sensor
    GroundBegin(ActorId),
    /// A solid surface stopped touching this actor's bottom sensor
    GroundEnd(ActorId),
}

/// Map one contact transition to its outcome. Only collectible pickup and
/// ground sensing are meaningful; every other pairing is inert.
pub fn classify(event: &ContactEvent) -> Option<ContactOutcome> {
    use FixtureRole::*;

    let (a, b) = (event.a, event.b);
    match event.phase {
        ContactPhase::Begin => {
            if a.role == Collectible && b.role == Main {
                return Some(ContactOutcome::RemoveCollectible(a.actor));
            }
            if b.role == Collectible && a.role == Main {
                return Some(ContactOutcome::RemoveCollectible(b.actor));
            }
            if a.role == Solid && b.role == BottomSensor {
                return Some(ContactOutcome::GroundBegin(b.actor));
            }
            if b.role == Solid && a.role == BottomSensor {
                return Some(ContactOutcome::GroundBegin(a.actor));
            }
            None
        }
        // Only the ground-sensor pairing matters on separation
        ContactPhase::End => {
            if a.role == Solid && b.role == BottomSensor {
                return Some(ContactOutcome::GroundEnd(b.actor));
            }
            if b.role == Solid && a.role == BottomSensor {
                return Some(ContactOutcome::GroundEnd(a.actor));
            }
            None
        }
    }
}

/// Consume one step's contact events and mutate stage state.
///
/// Collectible removal goes through the stage's removal set, so a pickup
/// touched by several fixtures in the same step is still destroyed once.
/// The ground counter clamps at zero: an end without a matching begin (seen
/// during rapid destruction) is logged and ignored rather than wedging
/// `is_on_ground` false forever.
pub fn route_contacts(events: &[ContactEvent], stage: &mut Stage) {
    for event in events {
        let Some(outcome) = classify(event) else {
            continue;
        };
        match outcome {
            ContactOutcome::RemoveCollectible(id) => {
                log::debug!("collectible {id} picked up");
                stage.mark_for_removal(id);
            }
            ContactOutcome::GroundBegin(id) => {
                if let Some(actor) = stage.get_mut(id) {
                    if let Some(phys) = actor.physics.as_mut() {
                        phys.ground_contacts += 1;
                    }
                    if let Some(anim) = actor.animation.as_mut() {
                        let idle = anim.idle_name.clone();
                        anim.set_active(&idle);
                    }
                }
            }
            ContactOutcome::GroundEnd(id) => {
                if let Some(actor) = stage.get_mut(id) {
                    if let Some(phys) = actor.physics.as_mut() {
                        if phys.ground_contacts == 0 {
                            log::warn!(
                                "ground-contact underflow for actor {id}: end without begin"
                            );
                        } else {
                            phys.ground_contacts -= 1;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, ActorKind, AnimationSelector};
    use crate::physics::adapter::PhysicsBinding;
    use crate::physics::engine::{BodyHandle, ContactTag};
    use glam::Vec2;

    fn tag(actor: ActorId, role: FixtureRole) -> ContactTag {
        ContactTag { actor, role }
    }

    fn begin(a: ContactTag, b: ContactTag) -> ContactEvent {
        ContactEvent {
            a,
            b,
            phase: ContactPhase::Begin,
        }
    }

    fn end(a: ContactTag, b: ContactTag) -> ContactEvent {
        ContactEvent {
            a,
            b,
            phase: ContactPhase::End,
        }
    }

    fn player_on_stage() -> (Stage, ActorId) {
        let mut stage = Stage::new();
        let mut player = Actor::new(0, ActorKind::Player, Vec2::ZERO, Vec2::splat(50.0));
        player.physics = Some(PhysicsBinding::new(BodyHandle(0)));
        player.animation = Some(AnimationSelector::new("walk", "stand", 1.0));
        let id = stage.insert(player);
        (stage, id)
    }

    #[test]
    fn test_classification_is_symmetric() {
        let coin = tag(9, FixtureRole::Collectible);
        let main = tag(1, FixtureRole::Main);
        assert_eq!(
            classify(&begin(coin, main)),
            Some(ContactOutcome::RemoveCollectible(9))
        );
        assert_eq!(
            classify(&begin(main, coin)),
            Some(ContactOutcome::RemoveCollectible(9))
        );

        let solid = tag(2, FixtureRole::Solid);
        let sensor = tag(1, FixtureRole::BottomSensor);
        assert_eq!(
            classify(&begin(solid, sensor)),
            Some(ContactOutcome::GroundBegin(1))
        );
        assert_eq!(
            classify(&end(sensor, solid)),
            Some(ContactOutcome::GroundEnd(1))
        );
    }

    #[test]
    fn test_inert_pairings() {
        let main = tag(1, FixtureRole::Main);
        let solid = tag(2, FixtureRole::Solid);
        let coin = tag(9, FixtureRole::Collectible);
        // Body landing on ground without the sensor: no outcome
        assert_eq!(classify(&begin(main, solid)), None);
        // Collectible pickup has no end-phase meaning
        assert_eq!(classify(&end(coin, main)), None);
        // Collectible brushing the ground sensor is not ground
        assert_eq!(classify(&begin(coin, tag(1, FixtureRole::BottomSensor))), None);
    }

    #[test]
    fn test_ground_counter_across_two_platforms() {
        let (mut stage, player) = player_on_stage();
        let sensor = tag(player, FixtureRole::BottomSensor);
        let platform_a = tag(100, FixtureRole::Solid);
        let platform_b = tag(101, FixtureRole::Solid);

        let grounded = |stage: &Stage| {
            stage
                .get(player)
                .unwrap()
                .physics
                .as_ref()
                .unwrap()
                .is_on_ground()
        };
        let contacts = |stage: &Stage| {
            stage
                .get(player)
                .unwrap()
                .physics
                .as_ref()
                .unwrap()
                .ground_contacts
        };

        route_contacts(&[begin(platform_a, sensor)], &mut stage);
        assert_eq!(contacts(&stage), 1);
        assert!(grounded(&stage));

        route_contacts(&[begin(platform_b, sensor)], &mut stage);
        assert_eq!(contacts(&stage), 2);

        route_contacts(&[end(platform_a, sensor)], &mut stage);
        assert_eq!(contacts(&stage), 1);
        assert!(grounded(&stage));

        route_contacts(&[end(platform_b, sensor)], &mut stage);
        assert_eq!(contacts(&stage), 0);
        assert!(!grounded(&stage));
    }

    #[test]
    fn test_landing_switches_animation_to_idle() {
        let (mut stage, player) = player_on_stage();
        stage
            .get_mut(player)
            .unwrap()
            .animation
            .as_mut()
            .unwrap()
            .set_active("walk");

        let sensor = tag(player, FixtureRole::BottomSensor);
        route_contacts(&[begin(tag(50, FixtureRole::Solid), sensor)], &mut stage);

        let anim = stage.get(player).unwrap().animation.as_ref().unwrap();
        assert_eq!(anim.active, "stand");
    }

    #[test]
    fn test_underflow_clamps_at_zero() {
        let (mut stage, player) = player_on_stage();
        let sensor = tag(player, FixtureRole::BottomSensor);

        route_contacts(&[end(tag(50, FixtureRole::Solid), sensor)], &mut stage);
        let phys = stage.get(player).unwrap().physics.as_ref().unwrap();
        assert_eq!(phys.ground_contacts, 0);
        assert!(!phys.is_on_ground());

        // A later begin still works normally
        route_contacts(&[begin(tag(50, FixtureRole::Solid), sensor)], &mut stage);
        assert!(stage.get(player).unwrap().physics.as_ref().unwrap().is_on_ground());
    }

    #[test]
    fn test_simultaneous_pickups_remove_once() {
        let (mut stage, player) = player_on_stage();
        let mut coin = Actor::new(0, ActorKind::Collectible, Vec2::ZERO, Vec2::splat(16.0));
        coin.physics = Some(PhysicsBinding::new(BodyHandle(1)));
        let coin_id = stage.insert(coin);

        let main = tag(player, FixtureRole::Main);
        let coin_tag = tag(coin_id, FixtureRole::Collectible);
        // Two fixture pairs report the same pickup in one step
        route_contacts(&[begin(coin_tag, main), begin(main, coin_tag)], &mut stage);

        let mut destroyed = Vec::new();
        stage.apply_removals(|actor| destroyed.push(actor.id));
        assert_eq!(destroyed, vec![coin_id]);
    }
}
