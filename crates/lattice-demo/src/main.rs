use anyhow::Result;
use clap::Parser;

use lattice_engine::device::GpuInit;
use lattice_engine::logging::init_logging;
use lattice_engine::window::Runtime;

mod app;
mod cli;
mod scene;

use app::DemoApp;
use cli::{Cli, DemoConfig};

fn main() -> Result<()> {
    let config = DemoConfig::from(Cli::parse());
    init_logging(config.logging.clone());

    let app = Runtime::run(config.runtime.clone(), GpuInit::default(), DemoApp::new(config))?;
    app.into_result()
}
