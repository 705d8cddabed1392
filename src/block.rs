//! Block state machine
//!
//! Blocks never move. Each hit yields a successor block (or none when
//! the block is destroyed) and may transform the impacting ball or the
//! paddle.

use serde::{Deserialize, Serialize};

use crate::bodies::{Ball, BallKind};
use crate::consts::{REPLICATOR_PADDLE_COUNT, SUPERCHARGED_LIFETIME};
use crate::geom::Rect;
use crate::links::BlockId;
use crate::paddle::Paddle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Destroyed by any hit
    Normal,
    /// Takes `lives` hits; destroyed only when the last life goes
    Sturdy { lives: u32 },
    /// Destroyed like Normal, but turns the paddle into a replicator
    Replicator,
    /// Destroyed like Normal, but supercharges the impacting ball
    PowerupBall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub rect: Rect,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(id: BlockId, rect: Rect, kind: BlockKind) -> Self {
        Self { id, rect, kind }
    }

    /// Successor after a hit; None means the block is destroyed
    pub fn state_after_hit(&self) -> Option<Block> {
        match self.kind {
            BlockKind::Sturdy { lives } if lives > 1 => Some(Block {
                kind: BlockKind::Sturdy { lives: lives - 1 },
                ..*self
            }),
            _ => None,
        }
    }

    /// Transform the impacting ball in place. Only the powerup block
    /// does anything: the ball's kind changes, its links and charge
    /// survive untouched.
    pub fn transform_ball_after_hit(&self, ball: &mut Ball) {
        if self.kind == BlockKind::PowerupBall {
            ball.kind = BallKind::SuperCharged { lifetime: SUPERCHARGED_LIFETIME };
        }
    }

    /// Paddle state after this block was hit
    pub fn paddle_after_hit(&self, paddle: &Paddle) -> Paddle {
        if self.kind == BlockKind::Replicator {
            Paddle::replicating(paddle.center, REPLICATOR_PADDLE_COUNT)
        } else {
            *paddle
        }
    }
}
