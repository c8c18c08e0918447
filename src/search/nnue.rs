//! Optional neural-network evaluator.
//!
//! A fixed-shape feedforward scorer over 768 piece-square inputs
//! (12 pieces x 64 squares) with one clipped-ReLU hidden layer of 128
//! units and a single output neuron, quantized to i16 weights. Networks
//! are loaded with bincode from the path given by the `NNUEFile` option
//! and used instead of the hand-crafted evaluation when `UseNNUE` is set.

use crate::board::{Board, Color};
use crate::utils::pop_lsb;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const INPUTS: usize = 768;
pub const HIDDEN: usize = 128;

/// Fixed-point scale of the quantized weights.
const QUANT: i32 = 64;
/// Output scaling into centipawns.
const OUTPUT_SCALE: i32 = 16;
/// Clipped-ReLU ceiling.
const CRELU_MAX: i32 = 127;

/// Networks never speak in mate scores.
const NET_CLAMP: i32 = 25_000;

#[derive(Serialize, Deserialize)]
pub struct Network {
    /// INPUTS x HIDDEN, input-major.
    input_weights: Vec<i16>,
    input_bias: Vec<i16>,
    /// HIDDEN x 1.
    output_weights: Vec<i16>,
    output_bias: i32,
}

impl Network {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| format!("cannot read network file: {}", e))?;
        let net: Network =
            bincode::deserialize(&bytes).map_err(|e| format!("cannot decode network: {}", e))?;
        net.check_shape()?;
        Ok(net)
    }

    fn check_shape(&self) -> Result<(), String> {
        if self.input_weights.len() != INPUTS * HIDDEN {
            return Err(format!(
                "input layer has {} weights, expected {}",
                self.input_weights.len(),
                INPUTS * HIDDEN
            ));
        }
        if self.input_bias.len() != HIDDEN {
            return Err(format!(
                "hidden bias has {} entries, expected {}",
                self.input_bias.len(),
                HIDDEN
            ));
        }
        if self.output_weights.len() != HIDDEN {
            return Err(format!(
                "output layer has {} weights, expected {}",
                self.output_weights.len(),
                HIDDEN
            ));
        }
        Ok(())
    }

    /// Feature index of a piece on a square, from White's view.
    #[inline(always)]
    fn feature(piece_index: usize, sq: usize) -> usize {
        piece_index * 64 + sq
    }

    /// Forward pass. Pure function of the board; centipawns from the side
    /// to move's perspective.
    pub fn evaluate(&self, board: &Board) -> i32 {
        let mut hidden = [0i32; HIDDEN];
        for (h, &b) in hidden.iter_mut().zip(self.input_bias.iter()) {
            *h = b as i32;
        }

        for piece in 0..12usize {
            let mut bb = board.pieces[piece];
            while bb != 0 {
                let sq = pop_lsb(&mut bb) as usize;
                let base = Self::feature(piece, sq) * HIDDEN;
                let weights = &self.input_weights[base..base + HIDDEN];
                for (h, &w) in hidden.iter_mut().zip(weights.iter()) {
                    *h += w as i32;
                }
            }
        }

        let mut output = self.output_bias;
        for (h, &w) in hidden.iter().zip(self.output_weights.iter()) {
            let activated = (*h).clamp(0, CRELU_MAX);
            output += activated * w as i32;
        }

        let white_score = output * OUTPUT_SCALE / (QUANT * QUANT);
        let score = match board.side_to_move {
            Color::White => white_score,
            Color::Black => -white_score,
        };
        score.clamp(-NET_CLAMP, NET_CLAMP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_net() -> Network {
        // Weighted so that white material on any square pushes the output
        // up and black material pushes it down.
        let mut input_weights = vec![0i16; INPUTS * HIDDEN];
        for piece in 0..12usize {
            let sign: i16 = if piece < 6 { 1 } else { -1 };
            for sq in 0..64 {
                input_weights[Network::feature(piece, sq) * HIDDEN] = sign * 8;
            }
        }
        Network {
            input_weights,
            input_bias: vec![0; HIDDEN],
            output_weights: vec![64; HIDDEN],
            output_bias: 0,
        }
    }

    #[test]
    fn shape_validation_rejects_truncated_net() {
        let mut net = tiny_net();
        net.output_weights.pop();
        assert!(net.check_shape().is_err());
    }

    #[test]
    fn perspective_flips_with_side_to_move() {
        use std::str::FromStr;
        let net = tiny_net();
        let white_view =
            crate::board::Board::from_str("4k3/8/8/8/8/8/4Q3/4K3 w - - 0 1").unwrap();
        let black_view =
            crate::board::Board::from_str("4k3/8/8/8/8/8/4Q3/4K3 b - - 0 1").unwrap();
        let w = net.evaluate(&white_view);
        let b = net.evaluate(&black_view);
        assert!(w > 0);
        assert_eq!(w, -b);
    }

    #[test]
    fn balanced_position_scores_zero() {
        let net = tiny_net();
        let board = crate::board::Board::new();
        assert_eq!(net.evaluate(&board), 0);
    }
}
