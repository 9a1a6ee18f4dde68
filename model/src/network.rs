use candle_core::{Result, Tensor};
use candle_nn::{linear, ops, Linear, Module, VarBuilder};

use crate::encoding::NUM_FEATURES;

pub const HIDDEN1_SIZE: usize = 128;
pub const HIDDEN2_SIZE: usize = 64;
pub const HIDDEN3_SIZE: usize = 32;

// Candle network definition, used for both training and loading.
// The final sigmoid bounds every prediction to (0, 1).
pub struct Network {
    fc1: Linear,
    fc2: Linear,
    fc3: Linear,
    fc4: Linear,
}

impl Network {
    pub fn new(vs: &VarBuilder) -> Result<Self> {
        Ok(Self {
            fc1: linear(NUM_FEATURES, HIDDEN1_SIZE, vs.pp("fc1"))?,
            fc2: linear(HIDDEN1_SIZE, HIDDEN2_SIZE, vs.pp("fc2"))?,
            fc3: linear(HIDDEN2_SIZE, HIDDEN3_SIZE, vs.pp("fc3"))?,
            fc4: linear(HIDDEN3_SIZE, 1, vs.pp("fc4"))?,
        })
    }
}

impl Module for Network {
    #[inline]
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let x = x.apply(&self.fc1)?.relu()?;
        let x = x.apply(&self.fc2)?.relu()?;
        let x = x.apply(&self.fc3)?.relu()?;
        let x = x.apply(&self.fc4)?;
        ops::sigmoid(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;
    use rand::Rng;

    /// Creates a random input in the range the encoder produces
    fn create_random_input() -> [f32; NUM_FEATURES] {
        let mut rng = rand::thread_rng();
        let mut input = [0.0; NUM_FEATURES];
        for value in input.iter_mut() {
            *value = rng.gen_range(0..=6) as f32;
        }
        input
    }

    fn create_network() -> Result<Network> {
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        Network::new(&vs)
    }

    #[test]
    fn test_forward_shape() -> Result<()> {
        let network = create_network()?;

        let input = create_random_input();
        let x = Tensor::from_slice(&input, (1, NUM_FEATURES), &Device::Cpu)?;
        let prediction = network.forward(&x)?;

        assert_eq!(prediction.dims(), &[1, 1]);
        Ok(())
    }

    #[test]
    fn test_forward_is_bounded() -> Result<()> {
        let network = create_network()?;

        for _ in 0..100 {
            let input = create_random_input();
            let x = Tensor::from_slice(&input, (1, NUM_FEATURES), &Device::Cpu)?;

            let prediction = network
                .forward(&x)?
                .get(0)?
                .get(0)?
                .to_scalar::<f32>()?;

            assert!(
                prediction > 0.0 && prediction < 1.0,
                "prediction {} escaped (0, 1)",
                prediction
            );
        }
        Ok(())
    }
}
