use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

pub use crate::package::external::ExternalPackager;

mod external;
#[cfg(test)]
mod test;

/// Size of the description field in the container header.
pub const DESCRIPTION_LEN: usize = 40;
/// Size of the label field of each container entry.
pub const LABEL_LEN: usize = 16;

/// One selectable payload of an installer container.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackageEntry
{
	pub type_code: u8,
	pub icon: u8,
	pub label: String,
	pub payload: PathBuf,
}

impl PackageEntry
{
	pub fn new(type_code: u8, icon: u8, label: impl Into<String>, payload: impl Into<PathBuf>) -> Self
	{
		Self{type_code, icon, label: label.into(), payload: payload.into()}
	}
}

/// Wraps an ordered list of entries into one installer container.
///
/// Entry order is kept as given, the device installs them in that order.
pub trait ContainerPackager
{
	fn package_entries(&self, output: &Path, description: &str, tile_image: &Path, entries: &[PackageEntry]) -> Result<(), PackageError>;
}

/// Checks the fields that have a fixed size in the container.
pub fn validate(description: &str, entries: &[PackageEntry]) -> Result<(), PackageError>
{
	if entries.is_empty()
	{
		return Err(PackageError::NoEntries);
	}
	if description.len() > DESCRIPTION_LEN
	{
		return Err(PackageError::Field{field: "description", value: description.to_owned(), max: DESCRIPTION_LEN});
	}
	for entry in entries
	{
		if entry.label.len() > LABEL_LEN
		{
			return Err(PackageError::Field{field: "label", value: entry.label.clone(), max: LABEL_LEN});
		}
	}
	Ok(())
}

#[derive(Debug, Error)]
pub enum PackageError
{
	#[error("container needs at least one entry")]
	NoEntries,
	#[error("{field} {value:?} is longer than {max} bytes")]
	Field{field: &'static str, value: String, max: usize},
	#[error("could not run {}", program.display())]
	Spawn{program: PathBuf, #[source] err: io::Error},
	#[error("{} failed ({status}){}", program.display(), stderr_suffix(stderr))]
	Failed{program: PathBuf, status: ExitStatus, stderr: String},
}

impl PackageError
{
	/// Exit code of the packaging tool, `None` unless it ran and failed with one.
	pub fn code(&self) -> Option<i32>
	{
		match self
		{
			Self::Failed{status, ..} => status.code(),
			_ => None,
		}
	}
}

fn stderr_suffix(stderr: &str) -> String
{
	let stderr = stderr.trim();
	if stderr.is_empty() {String::new()} else {format!(": {stderr}")}
}
