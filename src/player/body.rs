//! The rigid-body operations the controller needs, behind a trait.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::core::{player_id, SimError};

/// A handle onto a physics body. Calls on a handle whose backing body is
/// gone return `SimError::InvalidHandle`.
pub trait PhysicsBody {
    fn position(&self) -> Result<Vec3, SimError>;
    fn linear_velocity(&self) -> Result<Vec3, SimError>;
    fn set_position(&mut self, position: Vec3) -> Result<(), SimError>;
    fn set_linear_velocity(&mut self, velocity: Vec3) -> Result<(), SimError>;
    fn apply_impulse(&mut self, impulse: Vec3) -> Result<(), SimError>;
    fn wake_up(&mut self) -> Result<(), SimError>;
}

/// Rapier-backed body assembled from an entity's components.
pub struct RapierBody<'w> {
    pub transform: Mut<'w, Transform>,
    pub velocity: Option<Mut<'w, Velocity>>,
    pub impulse: Option<Mut<'w, ExternalImpulse>>,
    pub sleeping: Option<Mut<'w, Sleeping>>,
}

fn missing(what: &str) -> SimError {
    warn!("Player body has no {}", what);
    SimError::InvalidHandle(player_id().to_string())
}

impl PhysicsBody for RapierBody<'_> {
    fn position(&self) -> Result<Vec3, SimError> {
        Ok(self.transform.translation)
    }

    fn linear_velocity(&self) -> Result<Vec3, SimError> {
        self.velocity
            .as_ref()
            .map(|velocity| velocity.linvel)
            .ok_or_else(|| missing("velocity"))
    }

    fn set_position(&mut self, position: Vec3) -> Result<(), SimError> {
        self.transform.translation = position;
        Ok(())
    }

    fn set_linear_velocity(&mut self, linvel: Vec3) -> Result<(), SimError> {
        let velocity = self.velocity.as_mut().ok_or_else(|| missing("velocity"))?;
        velocity.linvel = linvel;
        Ok(())
    }

    fn apply_impulse(&mut self, impulse: Vec3) -> Result<(), SimError> {
        let external = self.impulse.as_mut().ok_or_else(|| missing("impulse"))?;
        external.impulse += impulse;
        Ok(())
    }

    fn wake_up(&mut self) -> Result<(), SimError> {
        if let Some(sleeping) = self.sleeping.as_mut() {
            sleeping.sleeping = false;
        }
        Ok(())
    }
}

/// In-memory body for controller tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct TestBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub impulse: Vec3,
    pub detached: bool,
}

#[cfg(test)]
impl TestBody {
    fn check(&self) -> Result<(), SimError> {
        if self.detached {
            Err(SimError::InvalidHandle("test-body".to_string()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
impl PhysicsBody for TestBody {
    fn position(&self) -> Result<Vec3, SimError> {
        self.check()?;
        Ok(self.position)
    }

    fn linear_velocity(&self) -> Result<Vec3, SimError> {
        self.check()?;
        Ok(self.velocity)
    }

    fn set_position(&mut self, position: Vec3) -> Result<(), SimError> {
        self.check()?;
        self.position = position;
        Ok(())
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) -> Result<(), SimError> {
        self.check()?;
        self.velocity = velocity;
        Ok(())
    }

    fn apply_impulse(&mut self, impulse: Vec3) -> Result<(), SimError> {
        self.check()?;
        self.impulse += impulse;
        Ok(())
    }

    fn wake_up(&mut self) -> Result<(), SimError> {
        self.check()
    }
}
