use std::process::ExitCode;

use tornado_simulation::app::App;
use tornado_simulation::build_info;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(version = %build_info::version_string(), "Build");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "Exiting with failure");
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::from_env();
    event_loop.run_app(&mut app)?;

    match app.take_fatal_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
