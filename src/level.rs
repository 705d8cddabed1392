//! Text level loader
//!
//! A level is an 8x10 character grid over the 50000x30000 field. Each
//! cell is 5000x3750 field units:
//!
//! - `#` normal block, `S` sturdy block (3 lives), `R` replicator
//!   block, `!` powerup block
//! - `o` ball at the cell center, `=` paddle at the cell center
//! - space leaves the cell empty; any other character is an error

use glam::IVec2;
use thiserror::Error;

use crate::block::{Block, BlockKind};
use crate::bodies::{Alpha, Ball};
use crate::geom::{Circle, Rect};
use crate::links::{BallId, BlockId};
use crate::paddle::Paddle;
use crate::state::{GameError, GameState};

const FIELD_SIZE: IVec2 = IVec2::new(50_000, 30_000);
const GRID_ROWS: usize = 8;
const GRID_COLS: usize = 10;
const CELL_SIZE: IVec2 =
    IVec2::new(FIELD_SIZE.x / GRID_COLS as i32, FIELD_SIZE.y / GRID_ROWS as i32);

const BLOCK_MARGIN: IVec2 = IVec2::new(20, 20);
const BLOCK_SHRINK: i32 = 70;

const INIT_BALL_DIAMETER: i32 = 700;
const INIT_BALL_VELOCITY: IVec2 = IVec2::new(4, 5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("unknown tile {tile:?} at row {row}, column {col}")]
    UnknownTile { tile: char, row: usize, col: usize },
    #[error("level defines no paddle")]
    MissingPaddle,
    #[error("level has {rows} rows, grid allows {GRID_ROWS}")]
    TooManyRows { rows: usize },
    #[error("row {row} has {len} columns, grid allows {GRID_COLS}")]
    RowTooLong { row: usize, len: usize },
}

/// Entity lists produced by [`parse`], ready to become a [`GameState`]
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
    pub paddle: Paddle,
    pub bottom_right: IVec2,
}

impl LevelLayout {
    /// Build the initial game state. No alphas exist at level start.
    pub fn into_state(self) -> Result<GameState, GameError> {
        GameState::new(self.balls, Vec::<Alpha>::new(), self.blocks, self.paddle, self.bottom_right)
    }
}

/// Parse a level description into its entity lists. Ids are assigned
/// from a single counter in scan order (left to right, top to bottom).
pub fn parse(description: &str) -> Result<LevelLayout, LevelError> {
    let rows = description.lines().count();
    if rows > GRID_ROWS {
        return Err(LevelError::TooManyRows { rows });
    }

    let mut balls = Vec::new();
    let mut blocks = Vec::new();
    let mut paddle = None;
    let mut next_id: u32 = 1;

    for (row, line) in description.lines().enumerate() {
        let len = line.chars().count();
        if len > GRID_COLS {
            return Err(LevelError::RowTooLong { row, len });
        }
        for (col, tile) in line.chars().enumerate() {
            let origin = IVec2::new(col as i32, row as i32) * CELL_SIZE;
            match tile {
                '#' | 'S' | 'R' | '!' => {
                    let id = BlockId(next_id);
                    next_id += 1;
                    blocks.push(block_in_cell(id, origin, tile));
                }
                'o' => {
                    let id = BallId(next_id);
                    next_id += 1;
                    balls.push(Ball::new(
                        id,
                        Circle::new(origin + CELL_SIZE / 2, INIT_BALL_DIAMETER),
                        INIT_BALL_VELOCITY,
                    ));
                }
                '=' => paddle = Some(Paddle::normal(origin + CELL_SIZE / 2)),
                ' ' => {}
                _ => return Err(LevelError::UnknownTile { tile, row, col }),
            }
        }
    }

    let paddle = paddle.ok_or(LevelError::MissingPaddle)?;
    log::info!(
        "level parsed: {} balls, {} blocks, paddle at {}",
        balls.len(),
        blocks.len(),
        paddle.center
    );
    Ok(LevelLayout { balls, blocks, paddle, bottom_right: FIELD_SIZE })
}

fn block_in_cell(id: BlockId, cell_origin: IVec2, tile: char) -> Block {
    let top_left = cell_origin + BLOCK_MARGIN;
    let bottom_right = top_left + CELL_SIZE - IVec2::splat(BLOCK_SHRINK);
    let kind = match tile {
        'S' => BlockKind::Sturdy { lives: 3 },
        'R' => BlockKind::Replicator,
        '!' => BlockKind::PowerupBall,
        _ => BlockKind::Normal,
    };
    Block::new(id, Rect::new(top_left, bottom_right), kind)
}
