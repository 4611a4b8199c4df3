//! RLP field kinds used by the transaction encoding.
//!
//! The transaction format layers a few field kinds on top of plain RLP:
//! - numeric: big-endian with leading zeros stripped, zero is the empty string
//! - compact fixed blob: fixed-width bytes with leading zeros stripped
//! - nullable fixed blob: empty string for none, otherwise exactly N bytes
//! - blob: arbitrary bytes
//!
//! Decoding is strict. Any non-canonical form is rejected so that a body has
//! exactly one encoding and therefore exactly one signing hash.

use crate::CodecError;
use alloy_rlp::{Encodable, Header};

/// Writes `bytes` with leading zeros stripped.
pub(crate) fn put_compact(bytes: &[u8], out: &mut Vec<u8>) {
	bytes[leading_zeros(bytes)..].encode(out);
}

/// Writes `bytes` as-is.
pub(crate) fn put_blob(bytes: &[u8], out: &mut Vec<u8>) {
	bytes.encode(out);
}

/// Writes a nullable fixed blob.
pub(crate) fn put_nullable(bytes: Option<&[u8]>, out: &mut Vec<u8>) {
	bytes.unwrap_or_default().encode(out);
}

/// Wraps an already encoded payload in a list header.
pub(crate) fn put_list(payload: &[u8], out: &mut Vec<u8>) {
	Header {
		list: true,
		payload_length: payload.len(),
	}
	.encode(out);
	out.extend_from_slice(payload);
}

/// Returns `value` with leading zero bytes removed.
pub(crate) fn trim_leading_zeros(value: &[u8]) -> &[u8] {
	&value[leading_zeros(value)..]
}

fn leading_zeros(bytes: &[u8]) -> usize {
	bytes.iter().take_while(|b| **b == 0).count()
}

/// Parses a compact value of at most `N` bytes into a left-padded array.
pub(crate) fn compact_from_slice<const N: usize>(
	raw: &[u8],
	field: &str,
) -> Result<[u8; N], CodecError> {
	if raw.len() > N {
		return Err(CodecError::MalformedEncoding(format!(
			"{}: {} bytes exceeds maximum of {}",
			field,
			raw.len(),
			N
		)));
	}
	if raw.first() == Some(&0) {
		return Err(CodecError::MalformedEncoding(format!(
			"{}: non-canonical leading zero",
			field
		)));
	}

	let mut out = [0u8; N];
	out[N - raw.len()..].copy_from_slice(raw);
	Ok(out)
}

/// Cursor over an RLP payload.
pub(crate) struct Reader<'a> {
	buf: &'a [u8],
}

impl<'a> Reader<'a> {
	pub(crate) fn new(buf: &'a [u8]) -> Self {
		Self { buf }
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Fails if any input is left over.
	pub(crate) fn finish(&self, what: &str) -> Result<(), CodecError> {
		if self.buf.is_empty() {
			Ok(())
		} else {
			Err(CodecError::MalformedEncoding(format!(
				"{}: {} unexpected trailing bytes",
				what,
				self.buf.len()
			)))
		}
	}

	fn item(&mut self, field: &str, list: bool) -> Result<&'a [u8], CodecError> {
		if self.buf.is_empty() {
			return Err(CodecError::MalformedEncoding(format!(
				"missing field '{}'",
				field
			)));
		}

		let header = Header::decode(&mut self.buf)
			.map_err(|e| CodecError::MalformedEncoding(format!("{}: {}", field, e)))?;

		if header.list != list {
			return Err(CodecError::MalformedEncoding(format!(
				"{}: expected {}",
				field,
				if list { "list" } else { "byte string" }
			)));
		}

		if header.payload_length > self.buf.len() {
			return Err(CodecError::MalformedEncoding(format!(
				"{}: payload of {} bytes truncated to {}",
				field,
				header.payload_length,
				self.buf.len()
			)));
		}

		let (payload, rest) = self.buf.split_at(header.payload_length);
		self.buf = rest;
		Ok(payload)
	}

	pub(crate) fn blob(&mut self, field: &str) -> Result<&'a [u8], CodecError> {
		self.item(field, false)
	}

	pub(crate) fn list(&mut self, field: &str) -> Result<Reader<'a>, CodecError> {
		self.item(field, true).map(Reader::new)
	}

	pub(crate) fn compact<const N: usize>(&mut self, field: &str) -> Result<[u8; N], CodecError> {
		let raw = self.blob(field)?;
		compact_from_slice::<N>(raw, field)
	}

	pub(crate) fn nullable<const N: usize>(
		&mut self,
		field: &str,
	) -> Result<Option<[u8; N]>, CodecError> {
		let raw = self.blob(field)?;
		match raw.len() {
			0 => Ok(None),
			len if len == N => {
				let mut out = [0u8; N];
				out.copy_from_slice(raw);
				Ok(Some(out))
			},
			len => Err(CodecError::MalformedEncoding(format!(
				"{}: expected 0 or {} bytes, got {}",
				field, N, len
			))),
		}
	}

	pub(crate) fn u8(&mut self, field: &str) -> Result<u8, CodecError> {
		self.compact::<1>(field).map(|b| b[0])
	}

	pub(crate) fn u32(&mut self, field: &str) -> Result<u32, CodecError> {
		self.compact::<4>(field).map(u32::from_be_bytes)
	}

	pub(crate) fn u64(&mut self, field: &str) -> Result<u64, CodecError> {
		self.compact::<8>(field).map(u64::from_be_bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_compact_encoding() {
		let mut out = Vec::new();
		put_compact(&0u64.to_be_bytes(), &mut out);
		put_compact(&5u64.to_be_bytes(), &mut out);
		put_compact(&21000u64.to_be_bytes(), &mut out);
		put_compact(&[0, 0, 0, 0, 0xaa, 0xbb, 0xcc, 0xdd], &mut out);
		assert_eq!(
			out,
			vec![0x80, 0x05, 0x82, 0x52, 0x08, 0x84, 0xaa, 0xbb, 0xcc, 0xdd]
		);
	}

	#[test]
	fn test_reader_integers() {
		let data = [0x80, 0x05, 0x82, 0x52, 0x08];
		let mut reader = Reader::new(&data);
		assert_eq!(reader.u64("a").unwrap(), 0);
		assert_eq!(reader.u8("b").unwrap(), 5);
		assert_eq!(reader.u32("c").unwrap(), 21000);
		assert!(reader.is_empty());
		assert!(reader.finish("test").is_ok());
	}

	#[test]
	fn test_reader_rejects_leading_zero() {
		let data = [0x82, 0x00, 0x08];
		let mut reader = Reader::new(&data);
		assert!(matches!(
			reader.u32("gas"),
			Err(CodecError::MalformedEncoding(_))
		));
	}

	#[test]
	fn test_reader_rejects_oversized_integer() {
		let data = [0x82, 0x01, 0x00];
		let mut reader = Reader::new(&data);
		assert!(matches!(
			reader.u8("chain_tag"),
			Err(CodecError::MalformedEncoding(_))
		));
	}

	#[test]
	fn test_reader_nullable_widths() {
		let mut data = vec![0x80, 0x94];
		data.extend_from_slice(&[0x11; 20]);
		data.extend_from_slice(&[0x83, 1, 2, 3]);

		let mut reader = Reader::new(&data);
		assert_eq!(reader.nullable::<20>("to").unwrap(), None);
		assert_eq!(reader.nullable::<20>("to").unwrap(), Some([0x11; 20]));
		assert!(reader.nullable::<20>("to").is_err());
	}

	#[test]
	fn test_reader_missing_field() {
		let mut reader = Reader::new(&[]);
		let err = reader.u64("nonce").unwrap_err();
		assert_eq!(
			err,
			CodecError::MalformedEncoding("missing field 'nonce'".into())
		);
	}

	#[test]
	fn test_reader_kind_mismatch() {
		let data = [0xc0];
		let mut reader = Reader::new(&data);
		assert!(reader.blob("data").is_err());

		let data = [0x80];
		let mut reader = Reader::new(&data);
		assert!(reader.list("clauses").is_err());
	}
}
