use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::package::{ContainerPackager, PackageEntry, PackageError, validate};

/// Per-entry field the packaging tool expects but ignores.
const UNUSED_ARG: &str = "0";

/// Runs an external packaging tool as `program [prefix...] output description tile [type icon 0 label payload]...`.
#[derive(Clone, Debug)]
pub struct ExternalPackager
{
	program: PathBuf,
	prefix: Vec<OsString>,
}

impl ExternalPackager
{
	pub fn new(program: impl Into<PathBuf>) -> Self
	{
		Self{program: program.into(), prefix: Vec::new()}
	}
	
	/// Tool implemented as a script run by `interpreter`.
	pub fn script(interpreter: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self
	{
		Self{program: interpreter.into(), prefix: vec![script.into().into_os_string()]}
	}
	
	/// Adds a leading argument passed before the container arguments.
	pub fn arg(mut self, arg: impl Into<OsString>) -> Self
	{
		self.prefix.push(arg.into());
		self
	}
	
	pub fn program(&self) -> &Path
	{
		&self.program
	}
	
	pub fn arguments(&self, output: &Path, description: &str, tile_image: &Path, entries: &[PackageEntry]) -> Vec<OsString>
	{
		let mut args = self.prefix.clone();
		args.push(output.into());
		args.push(description.into());
		args.push(tile_image.into());
		for entry in entries
		{
			args.push(entry.type_code.to_string().into());
			args.push(entry.icon.to_string().into());
			args.push(UNUSED_ARG.into());
			args.push(entry.label.clone().into());
			args.push(entry.payload.clone().into());
		}
		args
	}
}

impl ContainerPackager for ExternalPackager
{
	fn package_entries(&self, output: &Path, description: &str, tile_image: &Path, entries: &[PackageEntry]) -> Result<(), PackageError>
	{
		validate(description, entries)?;
		let args = self.arguments(output, description, tile_image, entries);
		debug!(program = %self.program.display(), ?args, "running packaging tool");
		let child = Command::new(&self.program)
			.args(&args)
			.stdin(Stdio::null())
			.stderr(Stdio::piped())
			.spawn();
		let child = match child
		{
			Ok(child) => child,
			Err(err) => return Err(PackageError::Spawn{program: self.program.clone(), err}),
		};
		let result = match child.wait_with_output()
		{
			Ok(result) => result,
			Err(err) => return Err(PackageError::Spawn{program: self.program.clone(), err}),
		};
		if !result.status.success()
		{
			let stderr = String::from_utf8_lossy(&result.stderr).into_owned();
			return Err(PackageError::Failed{program: self.program.clone(), status: result.status, stderr});
		}
		info!("packaged {} entries into {}", entries.len(), output.display());
		Ok(())
	}
}
