//! Physics plugin: Avian setup, ground sensing and the `PhysicsBody` adapter.
//!
//! ```text
//! FixedUpdate:      refresh_ground_sensors  (ShapeHits from the last step -> GroundSensor)
//!                   controller ticks        (read GroundSensor, write LinearVelocity)
//! FixedPostUpdate:  Avian step -> CollisionStart messages -> reactions
//! ```

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::{layers::Layer, tunables::Tunables};
use crate::control::PhysicsBody;

/// Ordering anchor for systems that read ground contact.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroundSensing;

/// Latest ground contact of a body, refreshed every fixed tick.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct GroundSensor {
    pub grounded: bool,
}

pub fn plugin(app: &mut App) {
    let tunables = app.world().resource::<Tunables>().clone();
    app.add_plugins(PhysicsPlugins::default().with_length_unit(tunables.pixels_per_meter));
    app.insert_resource(Gravity(Vec2::NEG_Y * tunables.gravity));
    app.add_systems(FixedUpdate, refresh_ground_sensors.in_set(GroundSensing));
}

/// Downward shape cast slightly narrower than the body, so walls don't count as ground.
pub fn ground_caster(size: Vec2) -> ShapeCaster {
    ShapeCaster::new(
        Collider::rectangle(size.x * 0.9, size.y * 0.9),
        Vec2::ZERO,
        0.0,
        Dir2::NEG_Y,
    )
    .with_max_distance(size.y * 0.05 + 2.0)
    .with_max_hits(1)
    .with_query_filter(SpatialQueryFilter::from_mask(Layer::World))
}

pub fn refresh_ground_sensors(mut q: Query<(&ShapeHits, &mut GroundSensor)>) {
    for (hits, mut sensor) in &mut q {
        let grounded = hits.iter().next().is_some();
        if sensor.grounded != grounded {
            sensor.grounded = grounded;
        }
    }
}

/// `PhysicsBody` over one entity's Avian components, borrowed for a single tick.
pub struct AvianBody<'a> {
    position: Vec2,
    velocity: &'a mut LinearVelocity,
    gravity: &'a mut GravityScale,
    grounded: bool,
}

impl<'a> AvianBody<'a> {
    pub fn new(
        transform: &Transform,
        velocity: &'a mut LinearVelocity,
        gravity: &'a mut GravityScale,
        grounded: bool,
    ) -> Self {
        Self { position: transform.translation.truncate(), velocity, gravity, grounded }
    }
}

impl PhysicsBody for AvianBody<'_> {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity.0
    }

    fn set_velocity_x(&mut self, vx: f32) {
        self.velocity.x = vx;
    }

    fn set_velocity_y(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    fn is_on_ground(&self) -> bool {
        self.grounded
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity.0 = if enabled { 1.0 } else { 0.0 };
    }
}

/// Order a `CollisionStart` as `(matching, other)` by gameplay owner (body if any, else collider).
pub fn split_contact(ev: &CollisionStart, is_match: impl Fn(Entity) -> bool) -> Option<(Entity, Entity)> {
    let first = ev.body1.unwrap_or(ev.collider1);
    let second = ev.body2.unwrap_or(ev.collider2);
    if is_match(first) {
        Some((first, second))
    } else if is_match(second) {
        Some((second, first))
    } else {
        None
    }
}
