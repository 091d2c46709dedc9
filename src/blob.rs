use std::fs::OpenOptions;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Blob
{
	origin: PathBuf,
	data: Vec<u8>,
}

impl Blob
{
	pub fn new(origin: impl Into<PathBuf>, data: Vec<u8>) -> Self
	{
		Self{origin: origin.into(), data}
	}
	
	/// Reads the whole file at `path`, the handle is closed before returning.
	pub fn read(path: impl AsRef<Path>) -> Result<Self, BlobError>
	{
		let path = path.as_ref();
		let mut f = match OpenOptions::new().read(true).open(path)
		{
			Ok(f) => f,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(BlobError::Missing{path: path.to_path_buf()}),
			Err(err) => return Err(BlobError::Open{path: path.to_path_buf(), err}),
		};
		let mut data = Vec::new();
		if let Err(err) = f.read_to_end(&mut data)
		{
			return Err(BlobError::Read{path: path.to_path_buf(), err});
		}
		drop(f);
		Ok(Self{origin: path.to_path_buf(), data})
	}
	
	pub fn origin(&self) -> &Path
	{
		&self.origin
	}
	
	pub fn data(&self) -> &[u8]
	{
		&self.data
	}
	
	pub fn len(&self) -> usize
	{
		self.data.len()
	}
	
	pub fn is_empty(&self) -> bool
	{
		self.data.is_empty()
	}
}

#[derive(Debug, Error)]
pub enum BlobError
{
	#[error("missing input file {}", path.display())]
	Missing{path: PathBuf},
	#[error("could not open file {}", path.display())]
	Open{path: PathBuf, #[source] err: io::Error},
	#[error("could not read file {}", path.display())]
	Read{path: PathBuf, #[source] err: io::Error},
}

impl BlobError
{
	pub fn path(&self) -> &Path
	{
		match self
		{
			Self::Missing{path} => path,
			Self::Open{path, ..} => path,
			Self::Read{path, ..} => path,
		}
	}
}
