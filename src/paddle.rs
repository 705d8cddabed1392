//! Paddle state machine
//!
//! A paddle is a fixed-size rectangle identified by its center. The
//! replicating variant spawns extra balls on each hit and counts down
//! to a normal paddle.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PADDLE_HEIGHT, PADDLE_WIDTH};
use crate::geom::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleKind {
    Normal,
    /// Spawns `count` balls per hit; collapses to Normal at count <= 2
    Replicating { count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    pub center: IVec2,
    pub kind: PaddleKind,
}

impl Paddle {
    pub fn normal(center: IVec2) -> Self {
        Self { center, kind: PaddleKind::Normal }
    }

    pub fn replicating(center: IVec2, count: u32) -> Self {
        Self { center, kind: PaddleKind::Replicating { count } }
    }

    /// Rectangle occupied by this paddle in the field
    pub fn location(&self) -> Rect {
        let half = IVec2::new(PADDLE_WIDTH / 2, PADDLE_HEIGHT / 2);
        Rect::new(self.center - half, self.center + half)
    }

    /// How many balls a hit on this paddle leaves on the field
    /// (1 = just the incoming ball, no clones)
    pub fn spawn_count(&self) -> u32 {
        match self.kind {
            PaddleKind::Normal => 1,
            PaddleKind::Replicating { count } => count,
        }
    }

    /// Successor state after being hit by a ball
    pub fn state_after_hit(&self) -> Paddle {
        let kind = match self.kind {
            PaddleKind::Normal => PaddleKind::Normal,
            PaddleKind::Replicating { count } if count > 2 => {
                PaddleKind::Replicating { count: count - 1 }
            }
            PaddleKind::Replicating { .. } => PaddleKind::Normal,
        };
        Paddle { center: self.center, kind }
    }

    /// Translate by `v`, clamping the center so the paddle stays fully
    /// inside `field` horizontally.
    pub fn moved_within(&self, v: IVec2, field: &Rect) -> Paddle {
        let bounds = field.minus_margin_xy(PADDLE_WIDTH / 2, 0);
        Paddle {
            center: bounds.constrain_point(self.center + v),
            kind: self.kind,
        }
    }
}
