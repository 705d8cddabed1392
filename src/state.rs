//! Game state: ownership, construction and queries
//!
//! `GameState` exclusively owns every body on the field plus the link
//! structure between balls and alphas. All mutation goes through the
//! tick pipeline (`crate::tick`), the paddle movement operations and
//! the explicit link/unlink operations; queries hand out borrowed
//! slices or value snapshots.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::Block;
use crate::bodies::{Alpha, Ball};
use crate::consts::{PADDLE_SPEED, WALL_DEPTH};
use crate::geom::Rect;
use crate::links::{AlphaId, BallId, Links};
use crate::paddle::Paddle;
use crate::snapshot::{AlphaSnapshot, BallSnapshot};

/// Construction errors. Anything beyond construction is a programming
/// error and panics instead (see the crate-level error discipline).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("field corner {0} must lie strictly down-and-right of the origin")]
    DegenerateField(IVec2),
    #[error("{body} {id} is not fully inside the field")]
    OutOfField { body: &'static str, id: u32 },
    #[error("duplicate {body} id {id}")]
    DuplicateId { body: &'static str, id: u32 },
}

/// Complete engine state for one running game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Bottom-right field corner; the top-left corner is the origin
    pub(crate) bottom_right: IVec2,
    /// Oversized off-field rectangles: top, right, left. There is no
    /// bottom wall; bodies falling past the bottom edge are removed.
    pub(crate) walls: [Rect; 3],
    /// Id-sorted body collections
    pub(crate) balls: Vec<Ball>,
    pub(crate) alphas: Vec<Alpha>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) paddle: Paddle,
    pub(crate) links: Links,
    next_id: u32,
}

fn check_unique_sorted<T>(items: &mut Vec<T>, body: &'static str, id_of: impl Fn(&T) -> u32) -> Result<(), GameError> {
    items.sort_by_key(&id_of);
    for pair in items.windows(2) {
        if id_of(&pair[0]) == id_of(&pair[1]) {
            return Err(GameError::DuplicateId { body, id: id_of(&pair[0]) });
        }
    }
    Ok(())
}

impl GameState {
    /// Build a state from initial entity lists, as supplied by a level
    /// loader. Bodies start unlinked; use [`GameState::link`] to set up
    /// pre-linked fixtures.
    pub fn new(
        mut balls: Vec<Ball>,
        mut alphas: Vec<Alpha>,
        mut blocks: Vec<Block>,
        paddle: Paddle,
        bottom_right: IVec2,
    ) -> Result<GameState, GameError> {
        if bottom_right.x <= 0 || bottom_right.y <= 0 {
            return Err(GameError::DegenerateField(bottom_right));
        }
        let field = Rect::new(IVec2::ZERO, bottom_right);

        if !field.contains_rect(&paddle.location()) {
            return Err(GameError::OutOfField { body: "paddle", id: 0 });
        }
        for block in &blocks {
            if !field.contains_rect(&block.rect) {
                return Err(GameError::OutOfField { body: "block", id: block.id.0 });
            }
        }
        for ball in &balls {
            if !field.contains_circle(&ball.circle) {
                return Err(GameError::OutOfField { body: "ball", id: ball.id.0 });
            }
        }
        for alpha in &alphas {
            if !field.contains_circle(&alpha.circle) {
                return Err(GameError::OutOfField { body: "alpha", id: alpha.id.0 });
            }
        }

        check_unique_sorted(&mut balls, "ball", |b| b.id.0)?;
        check_unique_sorted(&mut alphas, "alpha", |a| a.id.0)?;
        check_unique_sorted(&mut blocks, "block", |b| b.id.0)?;

        // No links yet, so every ball sits at the unlinked charge.
        for ball in &mut balls {
            ball.charge = 1;
        }

        let next_id = balls
            .iter()
            .map(|b| b.id.0)
            .chain(alphas.iter().map(|a| a.id.0))
            .chain(blocks.iter().map(|b| b.id.0))
            .max()
            .map_or(1, |max| max + 1);

        let w = bottom_right.x;
        let h = bottom_right.y;
        let walls = [
            Rect::new(IVec2::new(0, -WALL_DEPTH), IVec2::new(w, 0)),
            Rect::new(IVec2::new(w, 0), IVec2::new(w + WALL_DEPTH, h)),
            Rect::new(IVec2::new(-WALL_DEPTH, 0), IVec2::new(0, h)),
        ];

        Ok(GameState {
            bottom_right,
            walls,
            balls,
            alphas,
            blocks,
            paddle,
            links: Links::new(),
            next_id,
        })
    }

    /// The playing field: origin to the bottom-right corner
    pub fn field(&self) -> Rect {
        Rect::new(IVec2::ZERO, self.bottom_right)
    }

    pub fn bottom_right(&self) -> IVec2 {
        self.bottom_right
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn alphas(&self) -> &[Alpha] {
        &self.alphas
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Value snapshots of every ball, in id order
    pub fn ball_snapshots(&self) -> Vec<BallSnapshot> {
        self.balls
            .iter()
            .map(|b| BallSnapshot::capture(b, &self.links))
            .collect()
    }

    /// Value snapshots of every alpha, in id order
    pub fn alpha_snapshots(&self) -> Vec<AlphaSnapshot> {
        self.alphas
            .iter()
            .map(|a| AlphaSnapshot::capture(a, &self.links))
            .collect()
    }

    /// Link a ball and an alpha. Panics when either id is not on the
    /// field (caller bug).
    pub fn link(&mut self, ball: BallId, alpha: AlphaId) {
        assert!(self.balls.iter().any(|b| b.id == ball), "no such ball {ball:?}");
        assert!(self.alphas.iter().any(|a| a.id == alpha), "no such alpha {alpha:?}");
        self.links.link(&mut self.balls, ball, alpha);
    }

    /// Sever a ball/alpha link; a no-op when they are not linked.
    pub fn unlink(&mut self, ball: BallId, alpha: AlphaId) {
        self.links.unlink(&mut self.balls, ball, alpha);
    }

    /// Move the paddle right, clamped to the field
    pub fn move_paddle_right(&mut self, elapsed: i32) {
        self.paddle = self.paddle.moved_within(PADDLE_SPEED * elapsed, &self.field());
    }

    /// Move the paddle left, clamped to the field
    pub fn move_paddle_left(&mut self, elapsed: i32) {
        self.paddle = self.paddle.moved_within(PADDLE_SPEED * -elapsed, &self.field());
    }

    /// The player has won: no blocks left and at least one ball alive
    pub fn is_won(&self) -> bool {
        self.blocks.is_empty() && !self.is_dead()
    }

    /// The player has lost: no balls left on the field
    pub fn is_dead(&self) -> bool {
        self.balls.is_empty()
    }

    pub(crate) fn next_ball_id(&mut self) -> BallId {
        BallId(self.bump_id())
    }

    pub(crate) fn next_alpha_id(&mut self) -> AlphaId {
        AlphaId(self.bump_id())
    }

    fn bump_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
