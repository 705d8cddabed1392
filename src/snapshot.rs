//! Immutable snapshots for external observers
//!
//! Query results are plain values: a renderer or test harness gets the
//! body's geometry, velocity, charge and peer ids without any handle
//! into the engine's mutable arenas.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::bodies::{ALPHA_CHARGE, Alpha, Ball, BallKind};
use crate::geom::Circle;
use crate::links::{AlphaId, BallId, Links};

/// Value copy of a ball and its link neighbourhood
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub id: BallId,
    pub circle: Circle,
    pub velocity: IVec2,
    pub kind: BallKind,
    pub charge: i32,
    /// Ids of linked alphas, in id order
    pub linked_alphas: Vec<AlphaId>,
}

impl BallSnapshot {
    pub fn capture(ball: &Ball, links: &Links) -> Self {
        Self {
            id: ball.id,
            circle: ball.circle,
            velocity: ball.velocity,
            kind: ball.kind,
            charge: ball.charge,
            linked_alphas: links.alphas_of(ball.id).collect(),
        }
    }
}

/// Value copy of an alpha and its link neighbourhood
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphaSnapshot {
    pub id: AlphaId,
    pub circle: Circle,
    pub velocity: IVec2,
    pub charge: i32,
    /// Ids of linked balls, in id order
    pub linked_balls: Vec<BallId>,
}

impl AlphaSnapshot {
    pub fn capture(alpha: &Alpha, links: &Links) -> Self {
        Self {
            id: alpha.id,
            circle: alpha.circle,
            velocity: alpha.velocity,
            charge: ALPHA_CHARGE,
            linked_balls: links.balls_of(alpha.id).collect(),
        }
    }
}
