use candle_core::{Result, Tensor};
use candle_nn::{Init, Module, VarBuilder};

/// Instance normalisation settings shared by every block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormConfig {
    pub eps: f64,
    /// Learn a per-channel scale and shift after normalising.
    pub affine: bool,
}

impl Default for NormConfig {
    fn default() -> Self {
        Self {
            eps: 1e-5,
            affine: false,
        }
    }
}

/// Normalises every (sample, channel) plane to zero mean and unit variance
/// over its H x W positions, using the biased variance.
#[derive(Debug)]
pub struct InstanceNorm {
    affine: Option<(Tensor, Tensor)>,
    eps: f64,
}

impl InstanceNorm {
    pub fn load(vb: VarBuilder, channels: usize, config: NormConfig) -> Result<Self> {
        let affine = if config.affine {
            let weight = vb.get_with_hints(channels, "weight", Init::Const(1.0))?;
            let bias = vb.get_with_hints(channels, "bias", Init::Const(0.0))?;
            Some((weight, bias))
        } else {
            None
        };
        Ok(Self {
            affine,
            eps: config.eps,
        })
    }
}

impl Module for InstanceNorm {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let (b, c, h, w) = xs.dims4()?;
        let flat = xs.reshape((b, c, h * w))?;
        let mean = flat.mean_keepdim(2)?;
        let centered = flat.broadcast_sub(&mean)?;
        let var = centered.sqr()?.mean_keepdim(2)?;
        let normed = centered
            .broadcast_div(&(var + self.eps)?.sqrt()?)?
            .reshape((b, c, h, w))?;
        match &self.affine {
            Some((weight, bias)) => normed
                .broadcast_mul(&weight.reshape((1, c, 1, 1))?)?
                .broadcast_add(&bias.reshape((1, c, 1, 1))?),
            None => Ok(normed),
        }
    }
}
