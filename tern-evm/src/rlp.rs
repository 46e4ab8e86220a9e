//! Recursive Length Prefix (RLP) encoding.
//!
//! The encoder covers the value shapes transactions need. The decoder is
//! strict: it rejects non-minimal length prefixes, integers with leading
//! zero bytes, and trailing input, so that every accepted byte string has
//! exactly one decoding and re-encodes to itself.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Single-byte prefix offset for byte strings.
const STRING_OFFSET: u8 = 0x80;
/// Single-byte prefix offset for lists.
const LIST_OFFSET: u8 = 0xc0;
/// Longest payload that fits a short-form prefix.
const SHORT_MAX: usize = 55;
const ADDRESS_LEN: usize = 20;
/// Deepest list nesting the decoder accepts; a signed transaction needs 4.
pub const MAX_DEPTH: usize = 16;

/// Errors produced while decoding RLP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RlpError {
    /// Input ended before the announced length.
    #[error("rlp: unexpected end of input")]
    UnexpectedEnd,
    /// Bytes remain after the top-level item.
    #[error("rlp: trailing bytes after item")]
    TrailingBytes,
    /// A length or single byte was not encoded in its shortest form.
    #[error("rlp: non-canonical encoding")]
    NonCanonical,
    /// An integer carried a leading zero byte.
    #[error("rlp: integer has leading zero bytes")]
    LeadingZero,
    /// An integer or length does not fit the target type.
    #[error("rlp: value overflows target type")]
    Overflow,
    /// A list was expected but a byte string was found.
    #[error("rlp: expected list")]
    ExpectedList,
    /// A byte string was expected but a list was found.
    #[error("rlp: expected byte string")]
    ExpectedBytes,
    /// Lists nest deeper than [`MAX_DEPTH`].
    #[error("rlp: lists nested deeper than {MAX_DEPTH}")]
    TooDeep,
    /// An address field was neither empty nor 20 bytes.
    #[error("rlp: address must be 0 or 20 bytes, got {0}")]
    AddressLength(usize),
}

type Result<T> = core::result::Result<T, RlpError>;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a byte string.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if let [byte] = bytes {
        if *byte < STRING_OFFSET {
            return vec![*byte];
        }
    }

    let mut out = encode_header(STRING_OFFSET, bytes.len());
    out.extend_from_slice(bytes);
    out
}

/// Encode an unsigned integer as its minimal big-endian byte string.
pub fn encode_u64(value: u64) -> Vec<u8> {
    encode_bytes(trim_leading_zeros(&value.to_be_bytes()))
}

/// Encode a `u128` as its minimal big-endian byte string.
pub fn encode_u128(value: u128) -> Vec<u8> {
    encode_bytes(trim_leading_zeros(&value.to_be_bytes()))
}

/// Encode a 256-bit integer as its minimal big-endian byte string.
pub fn encode_u256(value: U256) -> Vec<u8> {
    encode_bytes(trim_leading_zeros(&value.to_be_bytes::<32>()))
}

/// Encode an optional recipient: empty string for contract creation.
pub fn encode_address(address: Option<&Address>) -> Vec<u8> {
    match address {
        Some(addr) => encode_bytes(addr.as_slice()),
        None => encode_bytes(&[]),
    }
}

/// Encode a list from already-encoded items.
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let total: usize = items.iter().map(Vec::len).sum();
    let mut out = encode_header(LIST_OFFSET, total);
    out.reserve(total);
    for item in items {
        out.extend_from_slice(item);
    }
    out
}

fn encode_header(offset: u8, len: usize) -> Vec<u8> {
    if len <= SHORT_MAX {
        // len <= 55 always fits in the prefix byte
        return vec![offset + len as u8];
    }

    let len_bytes = len.to_be_bytes();
    let len_bytes = trim_leading_zeros(&len_bytes);
    let mut out = Vec::with_capacity(1 + len_bytes.len());
    out.push(offset + SHORT_MAX as u8 + len_bytes.len() as u8);
    out.extend_from_slice(len_bytes);
    out
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A decoded RLP item borrowing from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<'a> {
    /// A byte string.
    Bytes(&'a [u8]),
    /// A list of items.
    List(Vec<Item<'a>>),
}

impl<'a> Item<'a> {
    /// The payload of a byte string item.
    pub fn as_bytes(&self) -> Result<&'a [u8]> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::List(_) => Err(RlpError::ExpectedBytes),
        }
    }

    /// The children of a list item.
    pub fn as_list(&self) -> Result<&[Item<'a>]> {
        match self {
            Self::List(items) => Ok(items),
            Self::Bytes(_) => Err(RlpError::ExpectedList),
        }
    }

    /// Interpret as a canonical big-endian `u64`.
    pub fn as_u64(&self) -> Result<u64> {
        let bytes = self.integer_bytes(8)?;
        Ok(bytes.iter().fold(0, |acc, &b| (acc << 8) | u64::from(b)))
    }

    /// Interpret as a canonical big-endian `u128`.
    pub fn as_u128(&self) -> Result<u128> {
        let bytes = self.integer_bytes(16)?;
        Ok(bytes.iter().fold(0, |acc, &b| (acc << 8) | u128::from(b)))
    }

    /// Interpret as a canonical big-endian 256-bit integer.
    pub fn as_u256(&self) -> Result<U256> {
        let bytes = self.integer_bytes(32)?;
        Ok(U256::from_be_slice(bytes))
    }

    /// Interpret as an optional address (empty means contract creation).
    pub fn as_address(&self) -> Result<Option<Address>> {
        match self.as_bytes()? {
            [] => Ok(None),
            bytes if bytes.len() == ADDRESS_LEN => Ok(Some(Address::from_slice(bytes))),
            bytes => Err(RlpError::AddressLength(bytes.len())),
        }
    }

    fn integer_bytes(&self, max_len: usize) -> Result<&'a [u8]> {
        let bytes = self.as_bytes()?;
        if bytes.len() > max_len {
            return Err(RlpError::Overflow);
        }
        if bytes.first() == Some(&0) {
            return Err(RlpError::LeadingZero);
        }
        Ok(bytes)
    }
}

/// Decode exactly one item spanning the whole input.
///
/// # Errors
///
/// Returns an [`RlpError`] for truncated, non-canonical, trailing or too
/// deeply nested input.
pub fn decode(input: &[u8]) -> Result<Item<'_>> {
    let (item, rest) = decode_item(input, 0)?;
    if !rest.is_empty() {
        return Err(RlpError::TrailingBytes);
    }
    Ok(item)
}

fn decode_item(input: &[u8], depth: usize) -> Result<(Item<'_>, &[u8])> {
    let (&prefix, rest) = input.split_first().ok_or(RlpError::UnexpectedEnd)?;

    match prefix {
        0x00..=0x7f => Ok((Item::Bytes(&input[..1]), rest)),
        0x80..=0xb7 => {
            let (payload, rest) = take(rest, usize::from(prefix - STRING_OFFSET))?;
            if let [byte] = payload {
                if *byte < STRING_OFFSET {
                    return Err(RlpError::NonCanonical);
                }
            }
            Ok((Item::Bytes(payload), rest))
        }
        0xb8..=0xbf => {
            let (len, rest) = read_long_length(rest, prefix - STRING_OFFSET - SHORT_MAX as u8)?;
            let (payload, rest) = take(rest, len)?;
            Ok((Item::Bytes(payload), rest))
        }
        0xc0..=0xf7 => {
            let (payload, rest) = take(rest, usize::from(prefix - LIST_OFFSET))?;
            Ok((Item::List(decode_list_payload(payload, depth)?), rest))
        }
        0xf8..=0xff => {
            let (len, rest) = read_long_length(rest, prefix - LIST_OFFSET - SHORT_MAX as u8)?;
            let (payload, rest) = take(rest, len)?;
            Ok((Item::List(decode_list_payload(payload, depth)?), rest))
        }
    }
}

fn decode_list_payload(mut payload: &[u8], depth: usize) -> Result<Vec<Item<'_>>> {
    if depth >= MAX_DEPTH {
        return Err(RlpError::TooDeep);
    }
    let mut items = Vec::new();
    while !payload.is_empty() {
        let (item, rest) = decode_item(payload, depth + 1)?;
        items.push(item);
        payload = rest;
    }
    Ok(items)
}

fn read_long_length(input: &[u8], len_of_len: u8) -> Result<(usize, &[u8])> {
    let (len_bytes, rest) = take(input, usize::from(len_of_len))?;
    if len_bytes.first() == Some(&0) {
        return Err(RlpError::NonCanonical);
    }
    if len_bytes.len() > core::mem::size_of::<usize>() {
        return Err(RlpError::Overflow);
    }
    let len = len_bytes
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
    if len <= SHORT_MAX {
        return Err(RlpError::NonCanonical);
    }
    Ok((len, rest))
}

fn take(input: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if input.len() < len {
        return Err(RlpError::UnexpectedEnd);
    }
    Ok(input.split_at(len))
}
