use {
    base::Vec2,
    candle_nn::VarMap,
    dataset::{DataLoader, DataLoaderConfig, FrameDataset, FrameTransform},
    futures_util::StreamExt,
    inference::{Inference, StylizationConfig},
    std::{path::PathBuf, time::Instant},
};

const FRAME_WIDTH: usize = 256;
const FRAME_HEIGHT: usize = 256;
const BATCH_SIZE: usize = 2;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    base::init_stdout_logger(log::LevelFilter::Info);

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <video-dir> [model.safetensors]", args[0]);
        std::process::exit(1);
    }
    let video_dir = PathBuf::from(&args[1]);

    #[cfg(feature = "cuda")]
    let inference = Inference::cuda(0)?;
    #[cfg(not(feature = "cuda"))]
    let inference = Inference::cpu()?;

    let config = StylizationConfig::default();
    let varmap = VarMap::new();
    let network = match args.get(2) {
        Some(model) => inference.use_stylization_network(model, config)?,
        None => {
            log::warn!("no model given, using randomly initialised weights");
            inference.init_stylization_network(&varmap, config)?
        }
    };

    let transform = FrameTransform::new(inference.device().clone())
        .with_resize(Vec2::new(FRAME_WIDTH, FRAME_HEIGHT));
    let dataset = FrameDataset::new(&video_dir, transform)?;
    let loader = DataLoader::new(
        dataset,
        DataLoaderConfig::default()
            .with_batch_size(BATCH_SIZE)
            .with_shuffle(false),
    )?;
    log::info!(
        "{} videos in {} batches",
        loader.dataset().len(),
        loader.num_batches()
    );

    let mut batches = loader.iter();
    while let Some(batch) = batches.next().await {
        let batch = batch?;
        let start = Instant::now();
        let steps = batch.collate()?;
        for step in &steps {
            let styled = network.stylize(step)?;
            log::debug!("stylized {:?}", styled.dims());
        }
        log::info!(
            "videos {:?}: {} frames in {:.2?}",
            batch.indices,
            steps.len(),
            start.elapsed()
        );
    }

    Ok(())
}
