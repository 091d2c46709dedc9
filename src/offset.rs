use thiserror::Error;

/// Parses an unsigned integer in decimal, `0x` hex, `0o` or leading-zero octal, or `0b` binary.
/// Single underscores may separate digits.
pub fn parse_int(text: &str) -> Result<u64, OffsetError>
{
	let lower = text.get(..2).map(str::to_ascii_lowercase);
	let (radix, digits) = match lower.as_deref()
	{
		Some("0x") => (16, &text[2..]),
		Some("0o") => (8, &text[2..]),
		Some("0b") => (2, &text[2..]),
		_ if text.len() > 1 && text.starts_with('0') => (8, &text[1..]),
		_ => (10, text),
	};
	if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__")
	{
		return Err(OffsetError::Malformed(text.to_owned()));
	}
	if !digits.chars().all(|c| c == '_' || c.is_digit(radix))
	{
		return Err(OffsetError::Malformed(text.to_owned()));
	}
	let clean: String = digits.chars().filter(|&c| c != '_').collect();
	u64::from_str_radix(&clean, radix).map_err(|_| OffsetError::Range(text.to_owned()))
}

/// Same as [`parse_int`] but bounded to the 32-bit flash address space.
pub fn parse_addr(text: &str) -> Result<u32, OffsetError>
{
	let val = parse_int(text)?;
	u32::try_from(val).map_err(|_| OffsetError::Range(text.to_owned()))
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum OffsetError
{
	#[error("malformed number {0:?}")]
	Malformed(String),
	#[error("number out of range {0:?}")]
	Range(String),
}
