//! `webgpu-launch`: configure, build and run LearnWebGPU with a chosen
//! WebGPU backend.
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use webgpu_launch::{init_logging, launch, LaunchSettings, SettingsOverrides};

/// Build the project using the specified WebGPU backend, then run it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebGPU backend to use (wgpu or dawn)
    #[arg(long, value_name = "NAME")]
    backend: Option<String>,

    /// Remove the backend's build directory before configuring
    #[arg(long)]
    clean: bool,

    /// Directory holding the top-level CMakeLists.txt
    #[arg(long, value_name = "DIR")]
    project_root: Option<PathBuf>,

    /// CMake program to invoke
    #[arg(long, value_name = "PROGRAM")]
    cmake: Option<String>,

    /// Executable name produced by the project
    #[arg(long, value_name = "NAME")]
    executable: Option<String>,

    /// Continue after a failed configure or build step
    #[arg(long)]
    keep_going: bool,

    /// Configure and build without launching the app
    #[arg(long)]
    no_run: bool,

    /// Settings file to read instead of webgpu-launch.toml
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            backend: self.backend.clone(),
            clean: self.clean.then_some(true),
            project_root: self.project_root.clone(),
            cmake: self.cmake.clone(),
            executable: self.executable.clone(),
            keep_going: self.keep_going.then_some(true),
            run: self.no_run.then_some(false),
        }
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = LaunchSettings::load(&args.overrides(), args.config_file.as_deref())
        .wrap_err("could not assemble launcher settings")?;
    let report = launch(&settings).wrap_err("launch failed")?;

    Ok(ExitCode::from(u8::try_from(report.exit_code()).unwrap_or(1)))
}
