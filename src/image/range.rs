use core::fmt;

/// Inclusive address range `first..=last` inside a flash image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MemoryRange
{
	first: u32,
	last: u32,
}

impl MemoryRange
{
	pub fn new(first: u32, last: u32) -> Self
	{
		if first > last {panic!("invalid range {first} -> {last}");}
		Self{first, last}
	}
	
	/// Range covering `len` bytes from `first`, `None` if empty or past the address space.
	pub fn from_len(first: u32, len: usize) -> Option<Self>
	{
		if len == 0 {return None;}
		let len = u32::try_from(len - 1).ok()?;
		first.checked_add(len).map(|last| Self{first, last})
	}
	
	pub fn get_first(&self) -> u32
	{
		self.first
	}
	
	pub fn get_last(&self) -> u32
	{
		self.last
	}
	
	pub fn len(&self) -> u64
	{
		u64::from(self.last - self.first) + 1
	}
	
	pub fn overlaps(&self, other: &Self) -> bool
	{
		self.first <= other.last && other.first <= self.last
	}
}

macro_rules!mem_fmt
{
	($name:ident) =>
	{
		impl fmt::$name for MemoryRange
		{
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
			{
				<u32 as fmt::$name>::fmt(&self.first, f)?;
				f.write_str(" -> ")?;
				<u32 as fmt::$name>::fmt(&self.last, f)
			}
		}
	};
}
mem_fmt!(Display);
mem_fmt!(UpperHex);
mem_fmt!(LowerHex);
