use candle_core::{Result, Tensor};
use candle_nn::{
    Conv2d, Conv2dConfig, ConvTranspose2d, ConvTranspose2dConfig, Module, VarBuilder, conv2d,
    conv_transpose2d,
};

use super::norm::{InstanceNorm, NormConfig};

// every spatial layer pads by one and uses square kernels
const PADDING: usize = 1;
const OUTPUT_PADDING: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    None,
    Relu,
    Tanh,
}

impl Activation {
    fn apply(&self, xs: Tensor) -> Result<Tensor> {
        match self {
            Activation::None => Ok(xs),
            Activation::Relu => xs.relu(),
            Activation::Tanh => xs.tanh(),
        }
    }
}

/// The one resolution-changing layer of a block.
#[derive(Debug)]
pub enum Spatial {
    Conv(Conv2d),
    Deconv(ConvTranspose2d),
}

impl Module for Spatial {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        match self {
            Spatial::Conv(conv) => xs.apply(conv),
            Spatial::Deconv(deconv) => xs.apply(deconv),
        }
    }
}

/// Convolution (or transposed convolution) + InstanceNorm + optional activation
#[derive(Debug)]
pub struct ConvBlock {
    spatial: Spatial,
    norm: InstanceNorm,
    activation: Activation,
}

impl ConvBlock {
    pub fn conv(
        vb: VarBuilder,
        c1: usize,
        c2: usize,
        k: usize,
        stride: usize,
        activation: Activation,
        norm: NormConfig,
    ) -> Result<Self> {
        let conv = conv2d(
            c1,
            c2,
            k,
            Conv2dConfig {
                stride,
                padding: PADDING,
                groups: 1,
                dilation: 1,
                ..Default::default()
            },
            vb.pp("Conv"),
        )?;
        let norm = InstanceNorm::load(vb.pp("Inst_norm"), c2, norm)?;
        Ok(Self {
            spatial: Spatial::Conv(conv),
            norm,
            activation,
        })
    }

    /// Transposed convolution block; with stride 2 it exactly doubles H and W.
    pub fn deconv(
        vb: VarBuilder,
        c1: usize,
        c2: usize,
        k: usize,
        stride: usize,
        activation: Activation,
        norm: NormConfig,
    ) -> Result<Self> {
        let deconv = conv_transpose2d(
            c1,
            c2,
            k,
            ConvTranspose2dConfig {
                padding: PADDING,
                output_padding: OUTPUT_PADDING,
                stride,
                dilation: 1,
            },
            vb.pp("DeConv"),
        )?;
        let norm = InstanceNorm::load(vb.pp("Inst_norm"), c2, norm)?;
        Ok(Self {
            spatial: Spatial::Deconv(deconv),
            norm,
            activation,
        })
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }
}

impl Module for ConvBlock {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = xs.apply(&self.spatial)?.apply(&self.norm)?;
        self.activation.apply(xs)
    }
}

/// Two stride-1 conv blocks (ReLU, then no activation), optionally with an
/// additive skip connection around them.
#[derive(Debug)]
pub struct ResidualBlock {
    first: ConvBlock,
    second: ConvBlock,
    skip: bool,
}

impl ResidualBlock {
    pub fn load(
        vb: VarBuilder,
        channels: usize,
        k: usize,
        skip: bool,
        norm: NormConfig,
    ) -> Result<Self> {
        let first = ConvBlock::conv(vb.pp("0"), channels, channels, k, 1, Activation::Relu, norm)?;
        let second = ConvBlock::conv(vb.pp("1"), channels, channels, k, 1, Activation::None, norm)?;
        Ok(Self {
            first,
            second,
            skip,
        })
    }
}

impl Module for ResidualBlock {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let out = xs.apply(&self.first)?.apply(&self.second)?;
        if self.skip {
            out + xs
        } else {
            Ok(out)
        }
    }
}
