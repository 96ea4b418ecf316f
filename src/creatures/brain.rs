//! Creature decision rules, free of ECS access.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use super::components::Brain;
use crate::core::SimError;

/// Horizontal distance between two points.
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Unit direction for a heading angle.
pub fn heading_vector(heading: f32) -> Vec3 {
    Vec3::new(heading.cos(), 0.0, heading.sin())
}

/// Heading angle pointing from `from` to `to`.
pub fn heading_towards(from: Vec3, to: Vec3) -> f32 {
    f32::atan2(to.z - from.z, to.x - from.x)
}

pub fn random_heading(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.0..TAU)
}

/// Delay until the next heading change, uniform in `bounds`.
pub fn random_interval(bounds: (f32, f32), rng: &mut impl Rng) -> f32 {
    let low = bounds.0.max(0.1);
    let high = bounds.1.max(low);
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// New heading after a wander timer fires: a turn of up to 90° either way.
pub fn turn_heading(heading: f32, rng: &mut impl Rng) -> f32 {
    heading + rng.gen_range(-PI / 2.0..PI / 2.0)
}

/// Keep a wanderer inside its radius by pointing it home once it strays.
pub fn bound_heading(position: Vec3, home: Vec3, radius: f32, heading: f32) -> f32 {
    if ground_distance(position, home) > radius {
        heading_towards(position, home)
    } else {
        heading
    }
}

/// Offset to move this frame along `heading`.
pub fn step_offset(heading: f32, speed: f32, delta: f32) -> Result<Vec3, SimError> {
    let offset = heading_vector(heading) * speed * delta;
    if offset.is_finite() {
        Ok(offset)
    } else {
        Err(SimError::NumericInstability(format!("heading {heading}")))
    }
}

/// Result of a periodic detection check.
pub fn after_detection(brain: Brain, distance: f32, detection_range: f32) -> Brain {
    match brain {
        Brain::Dead => Brain::Dead,
        _ if distance > detection_range => Brain::Wandering,
        Brain::Wandering => Brain::Aggressive,
        engaged => engaged,
    }
}

/// Per-frame range check while engaged with the player.
pub fn after_pursuit(brain: Brain, distance: f32, attack_range: f32) -> Brain {
    match brain {
        Brain::Aggressive if distance <= attack_range => Brain::Attacking,
        Brain::Attacking if distance > attack_range => Brain::Aggressive,
        other => other,
    }
}

pub fn attack_ready(last: Option<Duration>, now: Duration, cooldown: f32) -> bool {
    last.map_or(true, |last| {
        now.saturating_sub(last) >= Duration::from_secs_f32(cooldown.max(0.0))
    })
}
