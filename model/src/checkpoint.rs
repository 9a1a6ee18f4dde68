use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::network::Network;

#[derive(Debug, Error)]
pub enum CheckpointError {
    /// No artifact at the given path
    #[error("no checkpoint found at {0}")]
    Missing(PathBuf),

    /// The artifact exists but its tensors do not match the evaluator
    /// architecture (missing entries, wrong shapes, or unreadable data)
    #[error("checkpoint does not match the evaluator architecture")]
    Corrupt(#[source] candle_core::Error),
}

/// Serializes the model parameters to a safetensors artifact,
/// overwriting any previous file at the destination.
pub fn save(varmap: &VarMap, path: &Path) -> candle_core::Result<()> {
    varmap.save(path)
}

/// Reconstructs a network with the stored parameters. The artifact's
/// tensor names and shapes are checked against the expected architecture.
pub fn load(path: &Path, device: &Device) -> Result<(Network, VarMap), CheckpointError> {
    if !path.exists() {
        return Err(CheckpointError::Missing(path.to_path_buf()));
    }

    let mut varmap = VarMap::new();
    let vs = VarBuilder::from_varmap(&varmap, DType::F32, device);
    let network = Network::new(&vs).map_err(CheckpointError::Corrupt)?;
    varmap.load(path).map_err(CheckpointError::Corrupt)?;

    Ok((network, varmap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{encode_board, NUM_FEATURES};
    use candle_core::Tensor;
    use candle_nn::{linear, Module};

    fn startpos_input() -> Tensor {
        let features = encode_board(&chess::Board::default());
        Tensor::from_slice(&features, (1, NUM_FEATURES), &Device::Cpu).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.safetensors");

        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let network = Network::new(&vs).unwrap();

        let input = startpos_input();
        let before = network.forward(&input).unwrap().to_vec2::<f32>().unwrap();

        save(&varmap, &path).unwrap();
        let (restored, _varmap) = load(&path, &Device::Cpu).unwrap();

        let after = restored.forward(&input).unwrap().to_vec2::<f32>().unwrap();

        assert!(
            (before[0][0] - after[0][0]).abs() < 1e-6,
            "outputs diverged after reload: {} vs {}",
            before[0][0],
            after[0][0]
        );
    }

    #[test]
    fn test_load_rejects_wrong_architecture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.safetensors");

        // Same layer names, different shapes
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let _fc1 = linear(NUM_FEATURES, 16, vs.pp("fc1")).unwrap();
        varmap.save(&path).unwrap();

        let result = load(&path, &Device::Cpu);
        assert!(matches!(result, Err(CheckpointError::Corrupt(_))));
    }

    #[test]
    fn test_load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.safetensors");

        let result = load(&path, &Device::Cpu);
        assert!(matches!(result, Err(CheckpointError::Missing(_))));
    }
}
