use {
    crate::{
        error::InferError,
        stylization::{StylizationConfig, StylizationNetwork},
    },
    candle_core::{DType, Device},
    candle_nn::{VarBuilder, VarMap},
    std::path::Path,
};

/// Entry point owning the compute device every model is built on.
#[derive(Debug, Clone)]
pub struct Inference {
    device: Device,
}

impl Inference {
    pub fn cpu() -> Result<Self, InferError> {
        log::info!("Inference device: CPU");
        Ok(Self {
            device: Device::Cpu,
        })
    }

    #[cfg(feature = "cuda")]
    pub fn cuda(ordinal: usize) -> Result<Self, InferError> {
        let device = Device::new_cuda(ordinal)?;
        if device.is_cuda() {
            log::info!("Inference device: CUDA (ordinal {})", ordinal);
        } else {
            log::warn!(
                "Inference device: requested CUDA ordinal {} but device reports non-CUDA",
                ordinal
            );
        }
        Ok(Self { device })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Build a stylization network with fresh, randomly initialised parameters
    /// registered in `varmap`.
    ///
    /// Variables already present in `varmap` under the same names are reused,
    /// which is how an external trainer shares one parameter set between
    /// network instances.
    pub fn init_stylization_network(
        &self,
        varmap: &VarMap,
        config: StylizationConfig,
    ) -> Result<StylizationNetwork, InferError> {
        let vb = VarBuilder::from_varmap(varmap, DType::F32, &self.device);
        let network = StylizationNetwork::load(vb, config)?;
        log::info!("initialised stylization network ({:?})", config);
        Ok(network)
    }

    /// Load stylization network parameters from a safetensors file.
    pub fn use_stylization_network(
        &self,
        model_path: impl AsRef<Path>,
        config: StylizationConfig,
    ) -> Result<StylizationNetwork, InferError> {
        let path = model_path.as_ref();
        std::fs::metadata(path)
            .map_err(|e| InferError::Io(format!("{}: {e}", path.display())))?;

        let weights =
            unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, &self.device)? };
        let network = StylizationNetwork::load(weights, config)?;
        log::info!("loaded stylization network from {}", path.display());
        Ok(network)
    }
}
