//! Symmetric ball<->alpha adjacency
//!
//! Balls and alphas live in independently owned collections; their
//! association is a set of undirected edges keyed by stable ids, so
//! neither side owns the other and removal on either side can sever
//! cleanly. Every mutation updates both directions before returning and
//! rewrites the cached charge of every ball the edge touches, so no
//! half-updated link or stale charge is ever observable.
//!
//! Charge rule: an unlinked ball sits at +1. A linked ball's magnitude
//! is the largest linked-ball count over its alphas; the sign is
//! positive iff the ball's linked-alpha count is even.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::bodies::Ball;

/// Stable identity of a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Stable identity of an alpha particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AlphaId(pub u32);

/// Stable identity of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// The edge set, indexed from both sides. Ordered maps keep iteration
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    ball_to_alphas: BTreeMap<BallId, BTreeSet<AlphaId>>,
    alpha_to_balls: BTreeMap<AlphaId, BTreeSet<BallId>>,
}

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alphas linked to `ball`, in id order
    pub fn alphas_of(&self, ball: BallId) -> impl Iterator<Item = AlphaId> + '_ {
        self.ball_to_alphas.get(&ball).into_iter().flatten().copied()
    }

    /// Balls linked to `alpha`, in id order
    pub fn balls_of(&self, alpha: AlphaId) -> impl Iterator<Item = BallId> + '_ {
        self.alpha_to_balls.get(&alpha).into_iter().flatten().copied()
    }

    pub fn is_linked(&self, ball: BallId, alpha: AlphaId) -> bool {
        self.ball_to_alphas
            .get(&ball)
            .is_some_and(|set| set.contains(&alpha))
    }

    fn alpha_count(&self, ball: BallId) -> usize {
        self.ball_to_alphas.get(&ball).map_or(0, BTreeSet::len)
    }

    fn ball_count(&self, alpha: AlphaId) -> usize {
        self.alpha_to_balls.get(&alpha).map_or(0, BTreeSet::len)
    }

    /// Charge a ball must carry under the current edge set
    pub fn charge_of(&self, ball: BallId) -> i32 {
        let magnitude = self
            .alphas_of(ball)
            .map(|alpha| self.ball_count(alpha) as i32)
            .max()
            .unwrap_or(1);
        if self.alpha_count(ball) % 2 == 0 {
            magnitude
        } else {
            -magnitude
        }
    }

    /// Add the edge (idempotent) and refresh every affected charge.
    pub fn link(&mut self, balls: &mut [Ball], ball: BallId, alpha: AlphaId) {
        self.ball_to_alphas.entry(ball).or_default().insert(alpha);
        self.alpha_to_balls.entry(alpha).or_default().insert(ball);
        self.refresh_charges(balls, ball, alpha);
    }

    /// Remove the edge (idempotent) and refresh every affected charge.
    pub fn unlink(&mut self, balls: &mut [Ball], ball: BallId, alpha: AlphaId) {
        if let Some(set) = self.ball_to_alphas.get_mut(&ball) {
            set.remove(&alpha);
            if set.is_empty() {
                self.ball_to_alphas.remove(&ball);
            }
        }
        if let Some(set) = self.alpha_to_balls.get_mut(&alpha) {
            set.remove(&ball);
            if set.is_empty() {
                self.alpha_to_balls.remove(&alpha);
            }
        }
        self.refresh_charges(balls, ball, alpha);
    }

    /// Drop every edge of `ball` (it is about to leave the field).
    pub fn sever_ball(&mut self, balls: &mut [Ball], ball: BallId) {
        for alpha in self.alphas_of(ball).collect::<Vec<_>>() {
            self.unlink(balls, ball, alpha);
        }
    }

    /// Drop every edge of `alpha` (it is about to leave the field).
    pub fn sever_alpha(&mut self, balls: &mut [Ball], alpha: AlphaId) {
        for ball in self.balls_of(alpha).collect::<Vec<_>>() {
            self.unlink(balls, ball, alpha);
        }
    }

    /// Rewrite the cached charge of the touched ball and of every ball
    /// sharing `alpha`; one alpha's link count feeds into all of its
    /// balls' magnitudes.
    fn refresh_charges(&self, balls: &mut [Ball], ball: BallId, alpha: AlphaId) {
        let mut affected: BTreeSet<BallId> = self.balls_of(alpha).collect();
        affected.insert(ball);
        for id in affected {
            if let Some(b) = balls.iter_mut().find(|b| b.id == id) {
                b.charge = self.charge_of(id);
            }
        }
    }
}
