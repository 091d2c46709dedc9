use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use flashimg::blob::Blob;
use flashimg::cli;
use flashimg::image::{self, Placement};
use flashimg::offset::{self, OffsetError};

/// Combine binary files placed at fixed offsets into one flat flash image.
#[derive(Debug, Parser)]
#[command(name = "compose", version)]
struct Args
{
	/// Image file to create
	output: PathBuf,
	/// Pairs of offset (decimal, 0x hex, 0 octal) and input file
	#[arg(required = true, num_args = 2.., value_names = ["OFFSET", "FILE"])]
	pairs: Vec<String>,
	/// Largest image that may be produced
	#[arg(long, default_value = "0x1000000", value_parser = parse_capacity)]
	capacity: u32,
}

fn parse_capacity(text: &str) -> Result<u32, OffsetError>
{
	offset::parse_addr(text)
}

pub fn main() -> ExitCode
{
	let args = Args::parse();
	if args.pairs.len() % 2 != 0
	{
		Args::command().error(ErrorKind::WrongNumberOfValues, "every offset needs a file").exit();
	}
	cli::init_logging();
	
	let mut placements = Vec::with_capacity(args.pairs.len() / 2);
	for pair in args.pairs.chunks(2)
	{
		let offset = match offset::parse_addr(&pair[0])
		{
			Ok(offset) => offset,
			Err(e) => Args::command().error(ErrorKind::ValueValidation, format!("invalid offset: {e}")).exit(),
		};
		match Blob::read(&pair[1])
		{
			Ok(blob) => placements.push(Placement::new(offset, blob)),
			Err(e) =>
			{
				cli::report(format_args!("Could not load input"), &e);
				return ExitCode::FAILURE;
			},
		}
	}
	
	let data = match image::compose(args.capacity, &placements)
	{
		Ok(data) => data,
		Err(e) =>
		{
			cli::report(format_args!("Could not compose {}", args.output.display()), &e);
			return ExitCode::FAILURE;
		},
	};
	let written = OpenOptions::new().write(true).create(true).truncate(true).open(&args.output)
		.and_then(|mut fo| fo.write_all(&data));
	if let Err(e) = written
	{
		cli::report(format_args!("Could not write {}", args.output.display()), &e);
		return ExitCode::FAILURE;
	}
	println!("{} successfully created.", args.output.display());
	ExitCode::SUCCESS
}
