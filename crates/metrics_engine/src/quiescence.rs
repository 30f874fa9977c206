//! Capture-only search below the nominal depth.
//!
//! Stand pat on the static score, then try captures best victim first.
//! The result never drops below the stand-pat score unless the side to move
//! has no legal move at all.

use chess_core::{MoveGenerator, Position};

use crate::ordering::order_captures;
use crate::search::{Node, SearchSession, DELTA_MARGIN, QS_MAX_DEPTH};

/// Captures whose attacker outweighs the victim by this much are skipped
/// when the victim is defended.
const LOSING_EXCHANGE: i32 = 6;

impl<G: MoveGenerator> SearchSession<G> {
    pub(crate) fn quiescence(
        &mut self,
        pos: &mut Position,
        mut alpha: f64,
        beta: f64,
        ply: usize,
        qs_depth: u8,
    ) -> Node {
        if self.tick() {
            return Node::ABORTED;
        }

        let side = pos.side_to_move();
        let mut moves = self.legal_moves(pos, side);
        if moves.is_empty() {
            return Node::terminal(pos.in_check(side), ply);
        }

        let (stand, metrics) = self.static_eval(pos);
        let mut best = Node {
            score: stand,
            leaf: Some(metrics),
        };
        if stand >= beta || qs_depth >= QS_MAX_DEPTH {
            return best;
        }
        if stand > alpha {
            alpha = stand;
        }

        moves.retain(|mv| mv.is_capture());
        order_captures(&mut moves);

        for mv in moves {
            if self.config.quiescence_pruning {
                let victim = mv.captured.map_or(0, |k| k.value());
                if stand + victim as f64 * self.profile.material() + DELTA_MARGIN < alpha {
                    self.stats.delta_prunes += 1;
                    continue;
                }
                if mv.piece.value() - victim >= LOSING_EXCHANGE
                    && pos.is_square_attacked(mv.to, side.other())
                {
                    self.stats.losing_exchange_skips += 1;
                    continue;
                }
            }

            let undo = pos.make_move(mv);
            let child = self.quiescence(pos, -beta, -alpha, ply + 1, qs_depth + 1);
            pos.unmake_move(undo);
            if self.tc.is_stopped() {
                return Node::ABORTED;
            }

            let score = -child.score;
            if score > best.score {
                best = Node {
                    score,
                    leaf: child.leaf,
                };
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }
        best
    }
}
