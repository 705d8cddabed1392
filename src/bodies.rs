//! Moving bodies: balls and alpha particles
//!
//! Both kinds of body share the same discrete collision primitives: a
//! directional probe against a rectangle plus a velocity mirror. Link
//! bookkeeping lives in [`crate::links`]; the fields here only cache the
//! derived charge so observers never see a stale value.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::PADDLE_IMPULSE_DIV;
use crate::geom::{Circle, Rect, mirror_over};
use crate::links::{AlphaId, BallId};

/// Runtime behaviour of a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallKind {
    Normal,
    /// Passes through blocks it destroys while `lifetime` is still
    /// non-negative; once the lifetime decays below zero the charge is
    /// spent and the ball behaves like a normal one again.
    SuperCharged { lifetime: i32 },
}

/// A ball: the primary moving body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub circle: Circle,
    pub velocity: IVec2,
    pub kind: BallKind,
    /// Derived from the link structure; rewritten by every link
    /// mutation, +1 while unlinked.
    pub charge: i32,
}

impl Ball {
    pub fn new(id: BallId, circle: Circle, velocity: IVec2) -> Self {
        Self { id, circle, velocity, kind: BallKind::Normal, charge: 1 }
    }

    pub fn supercharged(id: BallId, circle: Circle, velocity: IVec2, lifetime: i32) -> Self {
        Self { id, circle, velocity, kind: BallKind::SuperCharged { lifetime }, charge: 1 }
    }

    #[inline]
    pub fn center(&self) -> IVec2 {
        self.circle.center()
    }

    /// Whether the supercharge is present and not yet decayed
    pub fn supercharge_active(&self) -> bool {
        matches!(self.kind, BallKind::SuperCharged { lifetime } if lifetime >= 0)
    }

    /// Translate by `v`; a live supercharge also burns `elapsed` off its
    /// remaining lifetime.
    pub fn move_by(&mut self, v: IVec2, elapsed: i32) {
        if let BallKind::SuperCharged { lifetime } = &mut self.kind
            && *lifetime >= 0
        {
            *lifetime -= elapsed;
        }
        self.circle = self.circle.with_center(self.circle.center() + v);
    }

    /// Mirrored velocity if this ball is moving into `rect`, else None
    pub fn bounce_on(&self, rect: &Rect) -> Option<IVec2> {
        rect.collide_with(&self.circle)
            .filter(|&dir| self.velocity.dot(dir) > 0)
            .map(|dir| mirror_over(self.velocity, dir))
    }

    /// True iff a collision direction exists and the ball is moving
    /// into the surface (grazing or departing does not count)
    pub fn collides_with(&self, rect: &Rect) -> bool {
        self.bounce_on(rect).is_some()
    }

    pub fn hit_wall(&mut self, rect: &Rect) {
        if let Some(v) = self.bounce_on(rect) {
            self.velocity = v;
        }
    }

    /// Bounce plus a fifth of the paddle's own velocity
    pub fn hit_paddle(&mut self, rect: &Rect, paddle_vel: IVec2) {
        if let Some(v) = self.bounce_on(rect) {
            self.velocity = v + paddle_vel / PADDLE_IMPULSE_DIV;
        }
    }

    /// Block response. A live supercharge sails through blocks it
    /// destroys; it still bounces off blocks that merely change state.
    pub fn hit_block(&mut self, rect: &Rect, destroyed: bool) {
        if self.supercharge_active() && destroyed {
            return;
        }
        if let Some(v) = self.bounce_on(rect) {
            self.velocity = v;
        }
    }

    /// Independent copy at the same location with a new id and velocity;
    /// the copy starts unlinked (and therefore at charge +1).
    pub fn clone_with_velocity(&self, id: BallId, velocity: IVec2) -> Ball {
        Ball { id, circle: self.circle, velocity, kind: self.kind, charge: 1 }
    }
}

/// Fixed charge carried by every alpha particle
pub const ALPHA_CHARGE: i32 = 1;

/// An alpha decay particle: moves and bounces like a ball, but never
/// interacts with blocks and carries no runtime-type polymorphism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alpha {
    pub id: AlphaId,
    pub circle: Circle,
    pub velocity: IVec2,
}

impl Alpha {
    pub fn new(id: AlphaId, circle: Circle, velocity: IVec2) -> Self {
        Self { id, circle, velocity }
    }

    #[inline]
    pub fn center(&self) -> IVec2 {
        self.circle.center()
    }

    pub fn move_by(&mut self, v: IVec2) {
        self.circle = self.circle.with_center(self.circle.center() + v);
    }

    pub fn bounce_on(&self, rect: &Rect) -> Option<IVec2> {
        rect.collide_with(&self.circle)
            .filter(|&dir| self.velocity.dot(dir) > 0)
            .map(|dir| mirror_over(self.velocity, dir))
    }

    pub fn collides_with(&self, rect: &Rect) -> bool {
        self.bounce_on(rect).is_some()
    }

    /// Mirror only. The magnetism kick to linked balls is applied by
    /// the tick pipeline, which owns the link structure.
    pub fn hit_wall(&mut self, rect: &Rect) {
        if let Some(v) = self.bounce_on(rect) {
            self.velocity = v;
        }
    }

    pub fn hit_paddle(&mut self, rect: &Rect, paddle_vel: IVec2) {
        if let Some(v) = self.bounce_on(rect) {
            self.velocity = v + paddle_vel / PADDLE_IMPULSE_DIV;
        }
    }

    /// Annihilate into an anti-particle: a normal ball at this alpha's
    /// location with the given velocity.
    pub fn to_ball(&self, id: BallId, velocity: IVec2) -> Ball {
        Ball::new(id, self.circle, velocity)
    }
}
