use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use flashimg::cli;
use flashimg::layout::{self, LayoutError, LayoutPaths, PackageConfig};
use flashimg::package::ExternalPackager;

/// Build the flat flash image from the SDK build outputs and package it into an installer container.
#[derive(Debug, Parser)]
#[command(name = "packfw", version, disable_version_flag = true)]
struct Args
{
	/// Directory holding the SDK build outputs
	#[arg(long, default_value = "build")]
	build_dir: PathBuf,
	/// Project name, selects `<build-dir>/<project>.bin` and prefixes the artifacts
	#[arg(long, default_value = layout::DEFAULT_PROJECT)]
	project: String,
	/// Version stamp of the artifacts (defaults to today as YYYYMMDD)
	#[arg(long)]
	version: Option<String>,
	/// Description shown by the installer menu
	#[arg(long, default_value = layout::DEFAULT_DESCRIPTION)]
	description: String,
	/// Directory the artifacts are written to
	#[arg(long)]
	out_dir: Option<PathBuf>,
	/// Interpreter running the container tool
	#[arg(long, env = "PYTHON", default_value = "python3")]
	python: PathBuf,
	/// Container packaging script
	#[arg(long, default_value = "tools/mkfw.py")]
	mkfw: PathBuf,
}

pub fn main() -> ExitCode
{
	let args = Args::parse();
	cli::init_logging();
	
	let paths = LayoutPaths::from_build_dir(&args.build_dir, &args.project);
	let version = args.version.unwrap_or_else(|| chrono::Local::now().format("%Y%m%d").to_string());
	let config = PackageConfig
	{
		project: args.project,
		version,
		description: args.description,
		out_dir: args.out_dir.unwrap_or_default(),
	};
	let packager = ExternalPackager::script(args.python, args.mkfw);
	
	match layout::package_firmware(&paths, &config, &packager)
	{
		Ok(artifacts) =>
		{
			println!("{}\n{}", artifacts.image.display(), artifacts.container.display());
			println!("all done!");
			ExitCode::SUCCESS
		},
		Err(e) =>
		{
			cli::report(format_args!("Packaging failed"), &e);
			if let LayoutError::MissingInput{path} = &e
			{
				if *path == paths.app {eprintln!("You should run `idf.py build` first!");}
			}
			ExitCode::FAILURE
		},
	}
}
