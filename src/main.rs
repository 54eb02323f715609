use clap::Parser;

use morph_view::{
    config::{Args, ViewKind, ViewerConfig},
    flow::{self, RenderCore},
    logging::init_logging,
    views::{FractalView, MorphingView},
};

fn main() -> anyhow::Result<()> {
    let config = ViewerConfig::from(Args::parse());
    init_logging(config.logging.clone());

    let core: Box<dyn RenderCore> = match config.view {
        ViewKind::Fractal => Box::new(FractalView::new(&config.fractal)),
        ViewKind::Morphing => Box::new(MorphingView::new(
            config.model.clone(),
            config.camera.build(),
        )),
    };
    log::info!("Opening the {} view", config.title());
    flow::run(config, core)
}
