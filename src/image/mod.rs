use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::blob::Blob;

pub use crate::image::range::MemoryRange;

mod range;

/// Value of erased flash.
pub const FILL: u8 = 0xFF;
/// Full flash size of the device, the bound for raw image composition.
pub const FLASH_CAPACITY: u32 = 16 * 1024 * 1024;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Placement
{
	offset: u32,
	blob: Blob,
}

impl Placement
{
	pub fn new(offset: u32, blob: Blob) -> Self
	{
		Self{offset, blob}
	}
	
	pub fn offset(&self) -> u32
	{
		self.offset
	}
	
	pub fn blob(&self) -> &Blob
	{
		&self.blob
	}
	
	/// First address past the placed bytes (may exceed `u32::MAX`).
	pub fn end(&self) -> u64
	{
		u64::from(self.offset) + self.blob.len() as u64
	}
	
	/// Addresses written by this placement, `None` for an empty blob.
	pub fn range(&self) -> Option<MemoryRange>
	{
		MemoryRange::from_len(self.offset, self.blob.len())
	}
}

/// Fixed-capacity flash image, unwritten bytes read as [`FILL`].
///
/// Backing storage only grows as far as the highest write, the bytes between that and the capacity
/// are never emitted.
#[derive(Clone, Debug)]
pub struct ImageBuffer
{
	capacity: u32,
	data: Vec<u8>,
	used: u32,
}

impl ImageBuffer
{
	pub fn new(capacity: u32) -> Self
	{
		Self{capacity, data: Vec::new(), used: 0}
	}
	
	pub fn capacity(&self) -> u32
	{
		self.capacity
	}
	
	/// Highest `offset + len` seen so far, the length of the emitted image.
	pub fn used(&self) -> u32
	{
		self.used
	}
	
	pub fn as_slice(&self) -> &[u8]
	{
		&self.data[..self.used as usize]
	}
	
	pub fn check(&self, offset: u32, len: usize) -> Result<(), BoundsError>
	{
		let end = u64::from(offset) + len as u64;
		if end > u64::from(self.capacity)
		{
			return Err(BoundsError{offset, len, capacity: self.capacity});
		}
		Ok(())
	}
	
	fn grow(&mut self, end: u32)
	{
		if end as usize > self.data.len()
		{
			self.data.resize(end as usize, FILL);
		}
		self.used = self.used.max(end);
	}
	
	/// Copies `data` to `offset`, overwriting whatever was there before.
	pub fn put(&mut self, offset: u32, data: &[u8]) -> Result<(), BoundsError>
	{
		self.check(offset, data.len())?;
		// no overflow because `check` bounds the end by `capacity`
		let end = offset + data.len() as u32;
		self.grow(end);
		self.data[offset as usize..end as usize].copy_from_slice(data);
		Ok(())
	}
	
	/// Marks the first `len` bytes as used so they are emitted even if nothing is written there.
	pub fn claim(&mut self, len: u32) -> Result<(), BoundsError>
	{
		self.check(0, len as usize)?;
		self.grow(len);
		Ok(())
	}
	
	pub fn into_bytes(mut self) -> Vec<u8>
	{
		self.data.truncate(self.used as usize);
		self.data
	}
}

/// Validates every placement against the image capacity, then writes them in order into `image`.
///
/// Nothing is written unless every placement fits. Overlapping placements are allowed and the
/// later one wins.
pub fn compose_into(image: &mut ImageBuffer, placements: &[Placement]) -> Result<(), ComposeError>
{
	for p in placements
	{
		if p.end() > u64::from(image.capacity())
		{
			let err = BoundsError{offset: p.offset(), len: p.blob().len(), capacity: image.capacity()};
			return Err(ComposeError::OutOfBounds{origin: p.blob().origin().to_path_buf(), err});
		}
	}
	
	let mut written: Vec<(MemoryRange, usize)> = Vec::with_capacity(placements.len());
	for (idx, p) in placements.iter().enumerate()
	{
		if let Some(range) = p.range()
		{
			for &(prev, prev_idx) in written.iter().filter(|(prev, _)| prev.overlaps(&range))
			{
				let shared = MemoryRange::new(range.get_first().max(prev.get_first()), range.get_last().min(prev.get_last()));
				let prev_origin = placements[prev_idx].blob().origin().display();
				warn!("{} at {range:#X} overwrites {} bytes of {prev_origin} at {prev:#X}", p.blob().origin().display(), shared.len());
			}
			written.push((range, idx));
		}
		if let Err(err) = image.put(p.offset(), p.blob().data())
		{
			return Err(ComposeError::OutOfBounds{origin: p.blob().origin().to_path_buf(), err});
		}
		info!("offset={}, fileName='{}', fileSize={}", p.offset(), p.blob().origin().display(), p.blob().len());
	}
	Ok(())
}

/// Builds a flat image of at most `capacity` bytes, truncated to the highest placed byte.
pub fn compose(capacity: u32, placements: &[Placement]) -> Result<Vec<u8>, ComposeError>
{
	let mut image = ImageBuffer::new(capacity);
	compose_into(&mut image, placements)?;
	Ok(image.into_bytes())
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{len} bytes at {offset:#X} exceed the image capacity of {capacity:#X} bytes")]
pub struct BoundsError
{
	pub offset: u32,
	pub len: usize,
	pub capacity: u32,
}

#[derive(Debug, Error)]
pub enum ComposeError
{
	#[error("{} does not fit the image", origin.display())]
	OutOfBounds{origin: PathBuf, #[source] err: BoundsError},
}
