//! Hit resolution for player swings.
//!
//! One policy everywhere: a target is hit when it is within range on the
//! ground plane and inside the attacker's facing cone.

use bevy::prelude::*;

use super::components::{CombatConfig, Swing};
use crate::core::EntityId;

/// A target damaged by a swing.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub target: EntityId,
    pub amount: f32,
}

/// Facing-cone test on the horizontal plane.
///
/// `min_dot` is the cosine of the cone's half angle (0.7 is roughly 45°).
/// A target standing exactly on the attacker counts as hit.
pub fn in_hit_cone(origin: Vec3, facing: Vec3, target: Vec3, range: f32, min_dot: f32) -> bool {
    let to_target = Vec3::new(target.x - origin.x, 0.0, target.z - origin.z);
    let distance = to_target.length();
    if !distance.is_finite() || distance > range {
        return false;
    }
    if distance <= f32::EPSILON {
        return true;
    }

    let facing = Vec3::new(facing.x, 0.0, facing.z).normalize_or_zero();
    if facing == Vec3::ZERO {
        return false;
    }
    facing.dot(to_target / distance) > min_dot
}

/// Evaluate a swing against candidate targets. Targets already hit by this
/// swing are skipped, so calling this again for the same swing is harmless.
pub fn resolve_swing<'a>(
    swing: &mut Swing,
    origin: Vec3,
    facing: Vec3,
    config: &CombatConfig,
    candidates: impl IntoIterator<Item = (&'a EntityId, Vec3)>,
) -> Vec<Hit> {
    let range = config.range(swing.kind);
    let amount = config.damage(swing.kind);

    candidates
        .into_iter()
        .filter(|(_, position)| in_hit_cone(origin, facing, *position, range, config.hit_cone))
        .filter(|(id, _)| swing.try_hit(id))
        .map(|(id, _)| Hit {
            target: id.clone(),
            amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AttackKind;

    #[test]
    fn target_in_front_is_hit_and_behind_is_missed() {
        let facing = Vec3::NEG_Z;
        assert!(in_hit_cone(Vec3::ZERO, facing, Vec3::new(0.0, 0.0, -2.0), 3.0, 0.7));
        assert!(!in_hit_cone(Vec3::ZERO, facing, Vec3::new(0.0, 0.0, 2.0), 3.0, 0.7));
    }

    #[test]
    fn range_and_cone_edges() {
        let facing = Vec3::NEG_Z;
        // Out of range straight ahead.
        assert!(!in_hit_cone(Vec3::ZERO, facing, Vec3::new(0.0, 0.0, -3.5), 3.0, 0.7));
        // 60 degrees off the facing direction.
        let side = Vec3::new(60f32.to_radians().sin(), 0.0, -60f32.to_radians().cos()) * 2.0;
        assert!(!in_hit_cone(Vec3::ZERO, facing, side, 3.0, 0.7));
        // Height difference is ignored.
        assert!(in_hit_cone(Vec3::ZERO, facing, Vec3::new(0.0, 5.0, -1.0), 3.0, 0.7));
        // Degenerate facing never hits anything at range.
        assert!(!in_hit_cone(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 0.0, -1.0), 3.0, 0.7));
    }

    #[test]
    fn heavy_swings_reach_further() {
        let config = CombatConfig::default();
        let far = EntityId::new("far");
        let targets = [(&far, Vec3::new(0.0, 0.0, -3.5))];

        let mut light = Swing::new(1, AttackKind::Light);
        assert!(resolve_swing(&mut light, Vec3::ZERO, Vec3::NEG_Z, &config, targets).is_empty());

        let mut heavy = Swing::new(2, AttackKind::Heavy);
        let hits = resolve_swing(&mut heavy, Vec3::ZERO, Vec3::NEG_Z, &config, targets);
        assert_eq!(hits, vec![Hit { target: far.clone(), amount: 25.0 }]);
    }

    #[test]
    fn re_evaluating_a_swing_does_not_double_hit() {
        let config = CombatConfig::default();
        let near = EntityId::new("near");
        let targets = [(&near, Vec3::new(0.5, 0.0, -1.0))];
        let mut swing = Swing::new(1, AttackKind::Light);

        let first = resolve_swing(&mut swing, Vec3::ZERO, Vec3::NEG_Z, &config, targets);
        let second = resolve_swing(&mut swing, Vec3::ZERO, Vec3::NEG_Z, &config, targets);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }
}
