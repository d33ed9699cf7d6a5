//! Feed-forward stylization network for real-time video style transfer.
//!
//! Three downsampling conv blocks, five residual blocks at 1/4 resolution,
//! two transposed-conv blocks back up to full resolution and a final Tanh
//! conv block producing a 3-channel image in [-1, 1].
//!
//! Variable names follow the PyTorch state-dict layout
//! (`conv_block_1.Conv.weight`, `res_block_3.1.Conv.bias`,
//! `deconv_block_2.DeConv.weight`, ...) so exported checkpoints load as is.

mod blocks;
mod norm;

pub use blocks::{Activation, ConvBlock, ResidualBlock, Spatial};
pub use norm::{InstanceNorm, NormConfig};

use crate::InferError;
use candle_core::{Result, Tensor};
use candle_nn::{Module, VarBuilder};

const KERNEL: usize = 3;
const RESIDUAL_BLOCKS: usize = 5;

/// Input height and width must be multiples of this (two stride-2 stages).
pub const SPATIAL_MULTIPLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StylizationConfig {
    /// Add each residual block's input back onto its output. Off by default,
    /// which makes every residual block a plain chain of two conv blocks.
    pub residual_skip: bool,
    pub norm: NormConfig,
}

#[derive(Debug)]
pub struct StylizationNetwork {
    conv_block_1: ConvBlock,
    conv_block_2: ConvBlock,
    conv_block_3: ConvBlock,
    res_blocks: Vec<ResidualBlock>,
    deconv_block_1: ConvBlock,
    deconv_block_2: ConvBlock,
    conv_block_4: ConvBlock,
    config: StylizationConfig,
}

impl StylizationNetwork {
    pub fn load(vb: VarBuilder, config: StylizationConfig) -> Result<Self> {
        let norm = config.norm;

        let conv_block_1 =
            ConvBlock::conv(vb.pp("conv_block_1"), 3, 16, KERNEL, 1, Activation::Relu, norm)?;
        let conv_block_2 =
            ConvBlock::conv(vb.pp("conv_block_2"), 16, 32, KERNEL, 2, Activation::Relu, norm)?;
        let conv_block_3 =
            ConvBlock::conv(vb.pp("conv_block_3"), 32, 48, KERNEL, 2, Activation::Relu, norm)?;

        let mut res_blocks = Vec::with_capacity(RESIDUAL_BLOCKS);
        for i in 1..=RESIDUAL_BLOCKS {
            res_blocks.push(ResidualBlock::load(
                vb.pp(format!("res_block_{i}")),
                48,
                KERNEL,
                config.residual_skip,
                norm,
            )?);
        }

        let deconv_block_1 =
            ConvBlock::deconv(vb.pp("deconv_block_1"), 48, 32, KERNEL, 2, Activation::Relu, norm)?;
        let deconv_block_2 =
            ConvBlock::deconv(vb.pp("deconv_block_2"), 32, 16, KERNEL, 2, Activation::Relu, norm)?;

        let conv_block_4 =
            ConvBlock::conv(vb.pp("conv_block_4"), 16, 3, KERNEL, 1, Activation::Tanh, norm)?;

        Ok(Self {
            conv_block_1,
            conv_block_2,
            conv_block_3,
            res_blocks,
            deconv_block_1,
            deconv_block_2,
            conv_block_4,
            config,
        })
    }

    pub fn config(&self) -> StylizationConfig {
        self.config
    }

    /// Stylize a (batch, 3, H, W) content tensor.
    ///
    /// Fails with `InferError::Shape` unless the batch is non-empty, there are
    /// exactly 3 channels and H, W are non-zero multiples of 4.
    pub fn stylize(&self, content: &Tensor) -> std::result::Result<Tensor, InferError> {
        check_input(content.dims())?;
        Ok(self.forward(content)?)
    }
}

fn check_input(dims: &[usize]) -> std::result::Result<(), InferError> {
    let &[b, c, h, w] = dims else {
        return Err(InferError::Shape(format!(
            "expected (batch, 3, H, W) input, got shape {:?}",
            dims
        )));
    };
    if b == 0 {
        return Err(InferError::Shape("batch must not be empty".to_string()));
    }
    if c != 3 {
        return Err(InferError::Shape(format!(
            "expected 3 channels (RGB), got {}",
            c
        )));
    }
    if h == 0 || w == 0 || h % SPATIAL_MULTIPLE != 0 || w % SPATIAL_MULTIPLE != 0 {
        return Err(InferError::Shape(format!(
            "height and width must be non-zero multiples of {}, got {}x{}",
            SPATIAL_MULTIPLE, h, w
        )));
    }
    Ok(())
}

impl Module for StylizationNetwork {
    fn forward(&self, content: &Tensor) -> Result<Tensor> {
        let mut xs = content
            .apply(&self.conv_block_1)?
            .apply(&self.conv_block_2)?
            .apply(&self.conv_block_3)?;
        for block in &self.res_blocks {
            xs = xs.apply(block)?;
        }
        xs.apply(&self.deconv_block_1)?
            .apply(&self.deconv_block_2)?
            .apply(&self.conv_block_4)
    }
}
