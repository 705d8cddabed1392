//! The per-tick resolution pipeline
//!
//! One tick advances the whole field by a bounded elapsed time, in a
//! fixed order that the correctness of the engine depends on:
//!
//! 1. move every ball and alpha (explicit Euler, velocity x elapsed)
//! 2. bounce balls, then alphas, off the three outer walls
//! 3. remove bodies fallen past the bottom edge, severing their links
//! 4. resolve at most one ball/block collision per ball
//! 5. resolve ball/paddle collisions (alpha emission, replication)
//! 6. resolve alpha/paddle collisions (anti-ball emission)
//! 7. clamp every surviving body back inside the field
//!
//! Bodies spawned in steps 5 and 6 sit out the rest of the tick; the
//! paddle stages iterate id snapshots taken before any spawning.

use glam::IVec2;

use crate::bodies::Alpha;
use crate::consts::{
    BALL_VEL_VARIATIONS, MAX_BALL_REPLICATE, MAX_ELAPSED_TIME, PADDLE_SPEED, SPAWN_VEL_OFFSET,
};
use crate::geom::DOWN;
use crate::links::{AlphaId, BallId};
use crate::magnet::magnet_velocity;
use crate::state::GameState;

impl GameState {
    /// Advance the simulation by `elapsed` time units with the paddle
    /// moving in `paddle_dir` (-1, 0 or +1).
    ///
    /// Panics when `elapsed` is outside `0..=MAX_ELAPSED_TIME` or
    /// `paddle_dir` outside `-1..=1` (caller bug).
    pub fn tick(&mut self, paddle_dir: i32, elapsed: i32) {
        assert!(
            (0..=MAX_ELAPSED_TIME).contains(&elapsed),
            "elapsed {elapsed} outside 0..={MAX_ELAPSED_TIME}"
        );
        assert!((-1..=1).contains(&paddle_dir), "paddle_dir {paddle_dir} outside -1..=1");

        let paddle_vel = PADDLE_SPEED * paddle_dir;

        self.step_bodies(elapsed);
        self.bounce_balls_on_walls();
        self.bounce_alphas_on_walls();
        self.remove_fallen_balls();
        self.remove_fallen_alphas();
        self.collide_balls_with_blocks();

        // Id snapshots: bodies spawned below join the field next tick.
        let ball_ids: Vec<BallId> = self.balls.iter().map(|b| b.id).collect();
        let alpha_ids: Vec<AlphaId> = self.alphas.iter().map(|a| a.id).collect();
        self.collide_balls_with_paddle(&ball_ids, paddle_vel);
        self.collide_alphas_with_paddle(&alpha_ids, paddle_vel);

        self.clamp_bodies();
    }

    fn step_bodies(&mut self, elapsed: i32) {
        for ball in &mut self.balls {
            ball.move_by(ball.velocity * elapsed, elapsed);
        }
        for alpha in &mut self.alphas {
            alpha.move_by(alpha.velocity * elapsed);
        }
    }

    fn bounce_balls_on_walls(&mut self) {
        for ball in &mut self.balls {
            for wall in &self.walls {
                ball.hit_wall(wall);
            }
        }
    }

    /// Walls mirror the alpha, and the bounce yanks every linked ball
    /// via the magnetism law, evaluated at the alpha's post-bounce
    /// center.
    fn bounce_alphas_on_walls(&mut self) {
        let walls = self.walls;
        for i in 0..self.alphas.len() {
            for wall in &walls {
                if !self.alphas[i].collides_with(wall) {
                    continue;
                }
                self.alphas[i].hit_wall(wall);
                let alpha_id = self.alphas[i].id;
                let alpha_center = self.alphas[i].center();
                for ball_id in self.links.balls_of(alpha_id).collect::<Vec<_>>() {
                    if let Some(ball) = self.balls.iter_mut().find(|b| b.id == ball_id) {
                        ball.velocity =
                            magnet_velocity(alpha_center, ball.center(), ball.charge, ball.velocity);
                    }
                }
            }
        }
    }

    fn fallen(&self, lowest_y: i32) -> bool {
        lowest_y > self.bottom_right.y
    }

    fn remove_fallen_balls(&mut self) {
        let dead: Vec<BallId> = self
            .balls
            .iter()
            .filter(|b| self.fallen(b.circle.outermost(DOWN).y))
            .map(|b| b.id)
            .collect();
        for id in dead {
            log::debug!("ball {id:?} fell out of the field");
            self.links.sever_ball(&mut self.balls, id);
            self.balls.retain(|b| b.id != id);
        }
    }

    fn remove_fallen_alphas(&mut self) {
        let dead: Vec<AlphaId> = self
            .alphas
            .iter()
            .filter(|a| self.fallen(a.circle.outermost(DOWN).y))
            .map(|a| a.id)
            .collect();
        for id in dead {
            log::debug!("alpha {id:?} fell out of the field");
            self.links.sever_alpha(&mut self.balls, id);
            self.alphas.retain(|a| a.id != id);
        }
    }

    /// At most one block collision per ball per tick, resolved against
    /// the first colliding block in collection order.
    fn collide_balls_with_blocks(&mut self) {
        for i in 0..self.balls.len() {
            let hit = self
                .blocks
                .iter()
                .position(|blk| self.balls[i].collides_with(&blk.rect));
            let Some(bi) = hit else { continue };

            let block = self.blocks[bi];
            let destroyed = match block.state_after_hit() {
                Some(next) => {
                    self.blocks[bi] = next;
                    false
                }
                None => {
                    self.blocks.remove(bi);
                    true
                }
            };
            log::debug!(
                "ball {:?} hit block {:?} ({:?}), destroyed={destroyed}",
                self.balls[i].id,
                block.id,
                block.kind
            );

            self.balls[i].hit_block(&block.rect, destroyed);
            self.paddle = block.paddle_after_hit(&self.paddle);
            block.transform_ball_after_hit(&mut self.balls[i]);

            if self.blocks.is_empty() {
                log::info!("last block destroyed");
            }
        }
    }

    /// A ball striking the paddle always emits one linked alpha; a
    /// replicating paddle additionally clones the ball with the fixed
    /// velocity perturbation table.
    fn collide_balls_with_paddle(&mut self, ball_ids: &[BallId], paddle_vel: IVec2) {
        for &id in ball_ids {
            let rect = self.paddle.location();
            let Some(idx) = self.balls.iter().position(|b| b.id == id) else {
                continue;
            };
            if !self.balls[idx].collides_with(&rect) {
                continue;
            }
            self.balls[idx].hit_paddle(&rect, paddle_vel);

            let alpha_id = self.next_alpha_id();
            let alpha = Alpha::new(alpha_id, self.balls[idx].circle, paddle_vel + SPAWN_VEL_OFFSET);
            log::debug!("ball {id:?} hit the paddle, emitting alpha {alpha_id:?}");
            self.alphas.push(alpha);
            self.links.link(&mut self.balls, id, alpha_id);

            let spawn = (self.paddle.spawn_count() as usize).min(MAX_BALL_REPLICATE);
            for variation in BALL_VEL_VARIATIONS.iter().take(spawn).skip(1) {
                let clone_id = self.next_ball_id();
                let velocity = self.balls[idx].velocity + *variation;
                let clone = self.balls[idx].clone_with_velocity(clone_id, velocity);
                self.balls.push(clone);
            }

            self.paddle = self.paddle.state_after_hit();
        }
    }

    /// An alpha striking the paddle bounces and annihilates into an
    /// anti-ball linked back to it. The paddle state does not advance.
    fn collide_alphas_with_paddle(&mut self, alpha_ids: &[AlphaId], paddle_vel: IVec2) {
        for &id in alpha_ids {
            let rect = self.paddle.location();
            let Some(idx) = self.alphas.iter().position(|a| a.id == id) else {
                continue;
            };
            if !self.alphas[idx].collides_with(&rect) {
                continue;
            }
            self.alphas[idx].hit_paddle(&rect, paddle_vel);

            let ball_id = self.next_ball_id();
            let anti = self.alphas[idx].to_ball(ball_id, self.alphas[idx].velocity + SPAWN_VEL_OFFSET);
            log::debug!("alpha {id:?} hit the paddle, emitting anti-ball {ball_id:?}");
            self.balls.push(anti);
            self.links.link(&mut self.balls, ball_id, id);
        }
    }

    /// Pure position correction after bounce overshoot; velocities are
    /// left alone.
    fn clamp_bodies(&mut self) {
        let field = self.field();
        for ball in &mut self.balls {
            let fixed = field.constrain_circle(&ball.circle);
            ball.move_by(fixed.center() - ball.circle.center(), 0);
        }
        for alpha in &mut self.alphas {
            let fixed = field.constrain_circle(&alpha.circle);
            alpha.move_by(fixed.center() - alpha.circle.center());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockKind};
    use crate::bodies::{Ball, BallKind};
    use crate::consts::SUPERCHARGED_LIFETIME;
    use crate::geom::{Circle, Rect};
    use crate::links::BlockId;
    use crate::paddle::{Paddle, PaddleKind};

    const FIELD: IVec2 = IVec2::new(50_000, 30_000);

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn far_paddle() -> Paddle {
        Paddle::normal(IVec2::new(25_000, 28_000))
    }

    fn ball_at(id: u32, center: IVec2, velocity: IVec2) -> Ball {
        Ball::new(BallId(id), Circle::new(center, 700), velocity)
    }

    fn alpha_at(id: u32, center: IVec2, velocity: IVec2) -> Alpha {
        Alpha::new(AlphaId(id), Circle::new(center, 700), velocity)
    }

    fn state_with(balls: Vec<Ball>, alphas: Vec<Alpha>, blocks: Vec<Block>) -> GameState {
        init_logging();
        GameState::new(balls, alphas, blocks, far_paddle(), FIELD).unwrap()
    }

    #[test]
    fn test_bodies_move_by_velocity_times_elapsed() {
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(5000, 5000), IVec2::new(4, 5))],
            vec![alpha_at(2, IVec2::new(9000, 5000), IVec2::new(-2, 3))],
            vec![],
        );
        state.tick(0, 10);
        assert_eq!(state.balls()[0].center(), IVec2::new(5040, 5050));
        assert_eq!(state.alphas()[0].center(), IVec2::new(8980, 5030));
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(5000, 400), IVec2::new(0, -10))],
            vec![],
            vec![],
        );
        // After moving 50*10=500 up, the ball overlaps the top wall.
        state.tick(0, 50);
        assert_eq!(state.balls()[0].velocity, IVec2::new(0, 10));
        // Clamping pulled it back inside the field.
        assert!(state.field().contains_circle(&state.balls()[0].circle));
    }

    #[test]
    fn test_fallen_ball_is_removed_and_game_lost() {
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(5000, 29_500), IVec2::new(0, 5))],
            vec![],
            vec![],
        );
        // Paddle is elsewhere; ball falls past the bottom edge.
        for _ in 0..5 {
            state.tick(0, 50);
        }
        assert!(state.balls().is_empty());
        assert!(state.is_dead());
    }

    #[test]
    fn test_fallen_alpha_severs_links() {
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(5000, 5000), IVec2::new(0, 0))],
            vec![alpha_at(2, IVec2::new(9000, 29_500), IVec2::new(0, 10))],
            vec![],
        );
        state.link(BallId(1), AlphaId(2));
        assert_eq!(state.balls()[0].charge, -1);

        state.tick(0, 50);
        assert!(state.alphas().is_empty());
        assert_eq!(state.links().alphas_of(BallId(1)).count(), 0);
        assert_eq!(state.balls()[0].charge, 1);
    }

    #[test]
    fn test_sturdy_block_with_one_life_is_destroyed_and_ball_bounces() {
        let block = Block::new(
            BlockId(10),
            Rect::new(IVec2::new(4000, 1000), IVec2::new(8000, 2000)),
            BlockKind::Sturdy { lives: 1 },
        );
        // Ball just below the block moving straight up.
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(6000, 2400), IVec2::new(0, -10))],
            vec![],
            vec![block],
        );
        state.tick(0, 10);
        assert!(state.blocks().is_empty());
        assert_eq!(state.balls()[0].velocity, IVec2::new(0, 10));
        assert!(state.is_won());
    }

    #[test]
    fn test_sturdy_block_with_lives_survives_and_decrements() {
        let block = Block::new(
            BlockId(10),
            Rect::new(IVec2::new(4000, 1000), IVec2::new(8000, 2000)),
            BlockKind::Sturdy { lives: 3 },
        );
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(6000, 2400), IVec2::new(0, -10))],
            vec![],
            vec![block],
        );
        state.tick(0, 10);
        assert_eq!(state.blocks().len(), 1);
        assert_eq!(state.blocks()[0].kind, BlockKind::Sturdy { lives: 2 });
        assert_eq!(state.balls()[0].velocity, IVec2::new(0, 10));
    }

    #[test]
    fn test_replicator_block_upgrades_paddle_on_hit() {
        let block = Block::new(
            BlockId(10),
            Rect::new(IVec2::new(4000, 1000), IVec2::new(8000, 2000)),
            BlockKind::Replicator,
        );
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(6000, 2400), IVec2::new(0, -10))],
            vec![],
            vec![block],
        );
        state.tick(0, 10);
        assert!(state.blocks().is_empty());
        assert_eq!(state.paddle().kind, PaddleKind::Replicating { count: 4 });
    }

    #[test]
    fn test_powerup_block_supercharges_ball_and_keeps_links() {
        let block = Block::new(
            BlockId(10),
            Rect::new(IVec2::new(4000, 1000), IVec2::new(8000, 2000)),
            BlockKind::PowerupBall,
        );
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(6000, 2400), IVec2::new(0, -10))],
            vec![alpha_at(2, IVec2::new(20_000, 5000), IVec2::ZERO)],
            vec![block],
        );
        state.link(BallId(1), AlphaId(2));

        state.tick(0, 10);
        assert_eq!(
            state.balls()[0].kind,
            BallKind::SuperCharged { lifetime: SUPERCHARGED_LIFETIME }
        );
        assert!(state.links().is_linked(BallId(1), AlphaId(2)));
        assert_eq!(state.balls()[0].charge, -1);
    }

    #[test]
    fn test_supercharged_ball_passes_through_destroyed_block() {
        let block = Block::new(
            BlockId(10),
            Rect::new(IVec2::new(4000, 1000), IVec2::new(8000, 2000)),
            BlockKind::Normal,
        );
        let mut state = state_with(
            vec![Ball::supercharged(
                BallId(1),
                Circle::new(IVec2::new(6000, 2400), 700),
                IVec2::new(0, -10),
                SUPERCHARGED_LIFETIME,
            )],
            vec![],
            vec![block],
        );
        state.tick(0, 10);
        assert!(state.blocks().is_empty());
        assert_eq!(state.balls()[0].velocity, IVec2::new(0, -10), "no bounce while charged");
    }

    #[test]
    fn test_only_first_block_is_resolved_per_tick() {
        // Up-and-right into a corner: the top probe lands in the first
        // block and the right probe in the second; both register a
        // collision, only the first resolves.
        let first = Block::new(
            BlockId(10),
            Rect::new(IVec2::new(8000, 1000), IVec2::new(12_000, 2000)),
            BlockKind::Normal,
        );
        let second = Block::new(
            BlockId(11),
            Rect::new(IVec2::new(8700, 2000), IVec2::new(12_000, 3000)),
            BlockKind::Normal,
        );
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(8300, 2200), IVec2::new(10, -10))],
            vec![],
            vec![first, second],
        );
        state.tick(0, 10);
        assert_eq!(state.blocks().len(), 1);
        assert_eq!(state.blocks()[0].id, BlockId(11), "second block untouched");
        assert_eq!(state.balls()[0].velocity, IVec2::new(10, 10));
    }

    #[test]
    fn test_paddle_hit_emits_linked_alpha() {
        let paddle = far_paddle();
        let rect = paddle.location();
        // Ball resting just above the paddle, moving down into it.
        let start = IVec2::new(25_000, rect.top_left().y - 400);
        let mut state = state_with(vec![ball_at(1, start, IVec2::new(0, 10))], vec![], vec![]);

        state.tick(1, 10);
        assert_eq!(state.alphas().len(), 1, "paddle hit emits exactly one alpha");
        let alpha = &state.alphas()[0];
        assert_eq!(alpha.velocity, IVec2::new(10, 0) + SPAWN_VEL_OFFSET);
        assert!(state.links().is_linked(BallId(1), alpha.id));
        assert_eq!(state.balls()[0].charge, -1);
        // Bounce plus a fifth of the paddle velocity
        assert_eq!(state.balls()[0].velocity, IVec2::new(2, -10));
    }

    #[test]
    fn test_replicating_paddle_clones_balls_with_velocity_table() {
        let paddle = Paddle::replicating(IVec2::new(25_000, 28_000), 4);
        init_logging();
        let start = IVec2::new(25_000, paddle.location().top_left().y - 400);
        let mut state = GameState::new(
            vec![ball_at(1, start, IVec2::new(0, 10))],
            vec![],
            vec![],
            paddle,
            FIELD,
        )
        .unwrap();

        state.tick(0, 10);
        assert_eq!(state.balls().len(), 4, "three clones join the original");
        let base = state.balls()[0].velocity;
        assert_eq!(base, IVec2::new(0, -10));
        let clone_vels: Vec<IVec2> = state.balls()[1..].iter().map(|b| b.velocity).collect();
        assert_eq!(
            clone_vels,
            [base + IVec2::new(2, -2), base + IVec2::new(-2, 2), base + IVec2::new(2, 2)]
        );
        // Clones start unlinked
        for clone in &state.balls()[1..] {
            assert_eq!(state.links().alphas_of(clone.id).count(), 0);
            assert_eq!(clone.charge, 1);
        }
        assert_eq!(state.paddle().kind, PaddleKind::Replicating { count: 3 });
    }

    #[test]
    fn test_alpha_paddle_hit_emits_linked_anti_ball() {
        let paddle = far_paddle();
        let start = IVec2::new(25_000, paddle.location().top_left().y - 400);
        let mut state = state_with(vec![], vec![alpha_at(5, start, IVec2::new(0, 10))], vec![]);

        state.tick(0, 10);
        assert_eq!(state.balls().len(), 1, "annihilation emits one anti-ball");
        let anti = &state.balls()[0];
        assert_eq!(anti.kind, BallKind::Normal);
        // Post-bounce alpha velocity plus the fixed offset
        let alpha_vel = state.alphas()[0].velocity;
        assert_eq!(anti.velocity, alpha_vel + SPAWN_VEL_OFFSET);
        assert!(state.links().is_linked(anti.id, AlphaId(5)));
        assert_eq!(anti.charge, -1);
        // The paddle state never advances on alpha hits.
        assert_eq!(state.paddle().kind, PaddleKind::Normal);
    }

    #[test]
    fn test_spawned_alpha_sits_out_the_rest_of_the_tick() {
        // The alpha emitted by a ball/paddle hit overlaps the paddle at
        // birth; if it joined step 6 it would immediately annihilate
        // into an anti-ball.
        let paddle = far_paddle();
        let start = IVec2::new(25_000, paddle.location().top_left().y - 400);
        let mut state = state_with(vec![ball_at(1, start, IVec2::new(0, 10))], vec![], vec![]);

        state.tick(0, 10);
        assert_eq!(state.alphas().len(), 1);
        assert_eq!(state.balls().len(), 1, "no anti-ball from the newborn alpha");
    }

    #[test]
    fn test_alpha_wall_bounce_applies_magnetism_to_linked_balls() {
        // Alpha heading into the left wall; linked ball far away and
        // slow, so the magnetism law redirects it.
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(20_000, 10_000), IVec2::new(0, 5))],
            vec![alpha_at(2, IVec2::new(300, 10_000), IVec2::new(-10, 0))],
            vec![],
        );
        state.link(BallId(1), AlphaId(2));

        state.tick(0, 10);
        // Alpha mirrored off the left wall.
        assert_eq!(state.alphas()[0].velocity, IVec2::new(10, 0));
        // Ball redirected along the ball->alpha axis. Charge is -1, so
        // it points away from the alpha: straight +x at its own speed.
        let expected = magnet_velocity(
            state.alphas()[0].center(),
            state.balls()[0].center(),
            -1,
            IVec2::new(0, 5),
        );
        assert_eq!(state.balls()[0].velocity, expected);
        assert_eq!(state.balls()[0].velocity, IVec2::new(5, 0));
    }

    #[test]
    fn test_magnetism_reaches_across_the_whole_field() {
        // Linked pair at nearly opposite field corners: the squared
        // ball/alpha distance does not fit in i32, so the redirect has
        // to survive without overflowing.
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(49_600, 29_000), IVec2::new(0, 5))],
            vec![alpha_at(2, IVec2::new(700, 15_000), IVec2::new(-10, 0))],
            vec![],
        );
        state.link(BallId(1), AlphaId(2));

        state.tick(0, 50);
        assert_eq!(state.alphas()[0].velocity, IVec2::new(10, 0));
        // Charge -1 pushes the ball away from the alpha at its own
        // speed: (49400, 14250) scaled to length 5.
        assert_eq!(state.balls()[0].velocity, IVec2::new(5, 1));
    }

    #[test]
    fn test_tick_zero_elapsed_is_a_no_op_for_positions() {
        let mut state = state_with(
            vec![ball_at(1, IVec2::new(5000, 5000), IVec2::new(4, 5))],
            vec![],
            vec![],
        );
        state.tick(0, 0);
        assert_eq!(state.balls()[0].center(), IVec2::new(5000, 5000));
    }

    #[test]
    #[should_panic]
    fn test_oversized_elapsed_is_a_caller_bug() {
        let mut state = state_with(vec![], vec![], vec![]);
        state.tick(0, MAX_ELAPSED_TIME + 1);
    }
}
