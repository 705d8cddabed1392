//! Radiobreak - deterministic physics core for a block-breaking game
//!
//! Advances balls, a paddle and alpha decay particles on an integer
//! grid, resolves collisions against walls, blocks and the paddle, and
//! maintains the symmetric ball<->alpha linkage that drives the
//! magnetism effect.
//!
//! Core modules:
//! - `geom`: integer vectors, circles, axis-aligned rectangles
//! - `bodies`: moving entities (balls, alphas) and their hit responses
//! - `links`: symmetric ball<->alpha adjacency and charge bookkeeping
//! - `paddle` / `block`: hit-response state machines
//! - `state`: the owning game state, construction and queries
//! - `tick`: the fixed-order per-tick resolution pipeline
//! - `level`: text map loader producing initial entity lists
//!
//! The whole crate is single-threaded and deterministic: no clocks, no
//! RNG, stable id-sorted iteration everywhere.

pub mod block;
pub mod bodies;
pub mod geom;
pub mod level;
pub mod links;
pub mod magnet;
pub mod paddle;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use block::{Block, BlockKind};
pub use bodies::{Alpha, Ball, BallKind};
pub use geom::{Circle, Rect};
pub use level::{LevelError, LevelLayout};
pub use links::{AlphaId, BallId, BlockId, Links};
pub use paddle::{Paddle, PaddleKind};
pub use snapshot::{AlphaSnapshot, BallSnapshot};
pub use state::{GameError, GameState};

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Upper bound on the elapsed time accepted by a single tick
    pub const MAX_ELAPSED_TIME: i32 = 50;

    /// Paddle dimensions (integer field units)
    pub const PADDLE_WIDTH: i32 = 3000;
    pub const PADDLE_HEIGHT: i32 = 500;

    /// Paddle velocity per unit of elapsed time, scaled by direction
    pub const PADDLE_SPEED: IVec2 = IVec2::new(10, 0);

    /// Hard cap on balls spawned by one paddle hit
    pub const MAX_BALL_REPLICATE: usize = 5;

    /// Velocity perturbations applied to replicated balls, indexed by
    /// clone number (index 0 belongs to the original ball)
    pub const BALL_VEL_VARIATIONS: [IVec2; MAX_BALL_REPLICATE] = [
        IVec2::new(0, 0),
        IVec2::new(2, -2),
        IVec2::new(-2, 2),
        IVec2::new(2, 2),
        IVec2::new(-2, -2),
    ];

    /// Velocity offset applied to alphas emitted on a paddle hit and to
    /// anti-balls emitted when an alpha strikes the paddle
    pub const SPAWN_VEL_OFFSET: IVec2 = IVec2::new(-2, -2);

    /// Remaining lifetime granted by a powerup block
    pub const SUPERCHARGED_LIFETIME: i32 = 10000;

    /// Replication count granted by a replicator block
    pub const REPLICATOR_PADDLE_COUNT: u32 = 4;

    /// Thickness of the off-field wall rectangles
    pub const WALL_DEPTH: i32 = 1000;

    /// Fraction of the paddle velocity imparted to a bouncing body
    pub const PADDLE_IMPULSE_DIV: i32 = 5;
}
