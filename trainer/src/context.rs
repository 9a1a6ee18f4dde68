use candle_core::{DType, Device, Tensor};
use candle_nn::{loss, AdamW, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use chess::Board;
use model::checkpoint;
use model::encoding::{encode_board, NUM_FEATURES};
use model::Network;
use std::path::Path;
use thiserror::Error;

use crate::engine::{EngineError, Score, Scorer};
use crate::games::Game;
use crate::progress::EpochProgressBar;
use crate::replay::{self, IllegalMove};

const CENTIPAWN_SCALE: f32 = 100.0;

#[derive(Debug, Error)]
pub enum TrainError {
    /// The run is aborted on the first move that cannot be replayed
    #[error("game {game}, ply {ply}: {source}")]
    IllegalMove {
        game: usize,
        ply: usize,
        #[source]
        source: IllegalMove,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Model(#[from] candle_core::Error),
}

/// All mutable state of one training run: the evaluator network, its
/// parameters and optimizer, and the device tensors live on.
pub struct TrainingContext {
    network: Network,
    varmap: VarMap,
    optimizer: AdamW,
    device: Device,
    depth: u8,
}

impl TrainingContext {
    pub fn new(device: &Device, learning_rate: f64, depth: u8) -> Result<Self, TrainError> {
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let network = Network::new(&vs)?;

        let optimizer = AdamW::new(
            varmap.all_vars(),
            ParamsAdamW {
                lr: learning_rate,
                ..Default::default()
            },
        )?;

        Ok(Self {
            network,
            varmap,
            optimizer,
            device: device.clone(),
            depth,
        })
    }

    /// Runs the full training schedule, returning each epoch's average
    /// loss. Any failure aborts the run on the spot.
    pub fn train<S: Scorer>(
        &mut self,
        games: &[Game],
        scorer: &mut S,
        epochs: usize,
    ) -> Result<Vec<f32>, TrainError> {
        let steps_per_epoch: usize = games.iter().map(|game| game.moves.len()).sum();
        let mut epoch_losses = Vec::with_capacity(epochs);

        for epoch in 1..=epochs {
            let avg_loss = self.train_epoch(games, scorer, epoch, epochs, steps_per_epoch)?;
            log::info!("Epoch {}/{}: avg loss {:.5}", epoch, epochs, avg_loss);
            epoch_losses.push(avg_loss);
        }

        Ok(epoch_losses)
    }

    fn train_epoch<S: Scorer>(
        &mut self,
        games: &[Game],
        scorer: &mut S,
        epoch: usize,
        epochs: usize,
        steps_per_epoch: usize,
    ) -> Result<f32, TrainError> {
        let progress = EpochProgressBar::new(epoch, epochs, steps_per_epoch);

        let mut loss_sum = 0f32;
        let mut steps = 0usize;

        for (game_idx, game) in games.iter().enumerate() {
            let mut board = Board::default();

            for (ply, notation) in game.moves.iter().enumerate() {
                board = replay::apply(&board, notation).map_err(|source| {
                    TrainError::IllegalMove {
                        game: game_idx,
                        ply,
                        source,
                    }
                })?;

                let loss = self.train_step(&board, scorer)?;
                loss_sum += loss;
                steps += 1;
                progress.update(loss_sum / steps as f32);
            }
        }

        let avg_loss = loss_sum / steps.max(1) as f32;
        progress.finish(avg_loss);

        Ok(avg_loss)
    }

    /// One move's worth of training: score the position, encode it, and
    /// nudge the network towards the engine's judgment.
    fn train_step<S: Scorer>(&mut self, board: &Board, scorer: &mut S) -> Result<f32, TrainError> {
        let score = scorer.evaluate(board, self.depth)?;
        let target = normalize(score);

        let features = encode_board(board);
        let x = Tensor::from_slice(&features, (1, NUM_FEATURES), &self.device)?;
        let y = Tensor::from_slice(&[target], (1, 1), &self.device)?;

        let prediction = self.network.forward(&x)?;
        let loss = loss::mse(&prediction, &y)?;
        self.optimizer.backward_step(&loss)?;

        Ok(loss.to_scalar::<f32>()?)
    }

    pub fn save(&self, path: &Path) -> candle_core::Result<()> {
        checkpoint::save(&self.varmap, path)
    }
}

/// Brings an engine score onto the training scale: the mate sentinel
/// first, then centipawns to pawns.
fn normalize(score: Score) -> f32 {
    score.centipawns() as f32 / CENTIPAWN_SCALE
}
