//! BIP-32 derivation paths.
//!
//! Structured parsing and formatting of paths like `m/44'/60'/0'/0/0`.

use core::fmt;
use core::str::FromStr;

use crate::{Error, Result};

/// BIP-44 purpose constant.
const PURPOSE: u32 = 44;
/// SLIP-44 coin type for Ethereum.
const ETH_COIN_TYPE: u32 = 60;

/// A child index in a derivation path.
///
/// Hardened indices are >= 2^31 in raw form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChildIndex {
    /// Normal (non-hardened) index: 0 to 2^31 - 1
    Normal(u32),
    /// Hardened index: displayed as n' or nh, stored as n
    Hardened(u32),
}

impl ChildIndex {
    /// The offset for hardened indices (2^31).
    pub const HARDENED_OFFSET: u32 = 0x8000_0000;

    /// Create a normal (non-hardened) child index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if `index >= 2^31`.
    pub fn normal(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            return Err(out_of_range(index));
        }
        Ok(Self::Normal(index))
    }

    /// Create a hardened child index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if `index >= 2^31`.
    pub fn hardened(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            return Err(out_of_range(index));
        }
        Ok(Self::Hardened(index))
    }

    /// Check if this is a hardened index.
    #[must_use]
    pub const fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// Get the index value without the hardened flag.
    #[must_use]
    pub const fn index(&self) -> u32 {
        match self {
            Self::Normal(i) | Self::Hardened(i) => *i,
        }
    }

    /// The raw `ser32` value used in derivation (hardened offset included).
    #[must_use]
    pub const fn to_u32(&self) -> u32 {
        match self {
            Self::Normal(i) => *i,
            Self::Hardened(i) => *i | Self::HARDENED_OFFSET,
        }
    }
}

fn out_of_range(index: u32) -> Error {
    Error::InvalidDerivationPath(format!("child index {index} exceeds 2^31 - 1"))
}

impl From<u32> for ChildIndex {
    fn from(value: u32) -> Self {
        if value >= Self::HARDENED_OFFSET {
            Self::Hardened(value & !Self::HARDENED_OFFSET)
        } else {
            Self::Normal(value)
        }
    }
}

impl From<ChildIndex> for u32 {
    fn from(index: ChildIndex) -> Self {
        index.to_u32()
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(i) => write!(f, "{i}"),
            Self::Hardened(i) => write!(f, "{i}'"),
        }
    }
}

impl FromStr for ChildIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidDerivationPath(format!("invalid path component \"{s}\""));

        match s.strip_suffix(['\'', 'h', 'H']) {
            Some(index) => Self::hardened(parse_index(index).ok_or_else(invalid)?),
            None => Self::normal(parse_index(s).ok_or_else(invalid)?),
        }
    }
}

/// Parse a plain decimal index, rejecting signs and empty strings.
fn parse_index(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// A BIP-32 derivation path.
///
/// The default is the standard first Ethereum account, `m/44'/60'/0'/0/0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    /// The sequence of child indices in the path.
    indices: Vec<ChildIndex>,
}

impl DerivationPath {
    /// Create an empty derivation path (master key).
    #[must_use]
    pub const fn master() -> Self {
        Self {
            indices: Vec::new(),
        }
    }

    /// Create a derivation path from a vector of child indices.
    #[must_use]
    pub const fn new(indices: Vec<ChildIndex>) -> Self {
        Self { indices }
    }

    /// BIP-44 Ethereum path: `m/44'/60'/account'/change/address_index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] if any index is `>= 2^31`.
    pub fn ethereum(account: u32, change: u32, address_index: u32) -> Result<Self> {
        Ok(Self {
            indices: vec![
                ChildIndex::hardened(PURPOSE)?,
                ChildIndex::hardened(ETH_COIN_TYPE)?,
                ChildIndex::hardened(account)?,
                ChildIndex::normal(change)?,
                ChildIndex::normal(address_index)?,
            ],
        })
    }

    /// Parse a derivation path from a string.
    ///
    /// Accepts `m/44'/60'/0'/0/0`, `m/44h/60h/0h/0/0`, and the same without
    /// the leading `m/`. A bare `m` is the master key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivationPath`] for empty components,
    /// non-numeric indices, or indices `>= 2^31`.
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.trim();

        let rest = match path {
            "m" | "M" => return Ok(Self::master()),
            _ => path
                .strip_prefix("m/")
                .or_else(|| path.strip_prefix("M/"))
                .unwrap_or(path),
        };

        if rest.is_empty() {
            return Err(Error::InvalidDerivationPath("empty path".into()));
        }

        let indices = rest
            .split('/')
            .map(str::parse)
            .collect::<Result<Vec<ChildIndex>>>()?;

        Ok(Self { indices })
    }

    /// Get the child indices in this path.
    #[must_use]
    pub fn indices(&self) -> &[ChildIndex] {
        &self.indices
    }

    /// Get the number of levels in this path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    /// Check if this path is empty (master key).
    #[must_use]
    pub fn is_master(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a child index to the path.
    #[must_use]
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices }
    }

    /// Get the parent path, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.indices.split_last()?;
        Some(Self {
            indices: parent.to_vec(),
        })
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        Self {
            indices: vec![
                ChildIndex::Hardened(PURPOSE),
                ChildIndex::Hardened(ETH_COIN_TYPE),
                ChildIndex::Hardened(0),
                ChildIndex::Normal(0),
                ChildIndex::Normal(0),
            ],
        }
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.indices {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildIndex;
    type IntoIter = core::slice::Iter<'a, ChildIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_index_normal() {
        let index = ChildIndex::normal(0).unwrap();
        assert!(!index.is_hardened());
        assert_eq!(index.index(), 0);
        assert_eq!(index.to_u32(), 0);
        assert_eq!(index.to_string(), "0");
    }

    #[test]
    fn test_child_index_hardened() {
        let index = ChildIndex::hardened(44).unwrap();
        assert!(index.is_hardened());
        assert_eq!(index.index(), 44);
        assert_eq!(index.to_u32(), 44 | 0x8000_0000);
        assert_eq!(index.to_string(), "44'");
    }

    #[test]
    fn test_child_index_range() {
        assert!(ChildIndex::normal(0x8000_0000).is_err());
        assert!(ChildIndex::hardened(0x8000_0000).is_err());
        assert!("2147483648".parse::<ChildIndex>().is_err());
        assert!("2147483647'".parse::<ChildIndex>().is_ok());
    }

    #[test]
    fn test_child_index_from_u32() {
        assert_eq!(ChildIndex::from(44), ChildIndex::Normal(44));
        assert_eq!(ChildIndex::from(0x8000_0000), ChildIndex::Hardened(0));
        assert_eq!(ChildIndex::from(0x8000_0000 + 44), ChildIndex::Hardened(44));
    }

    #[test]
    fn test_child_index_parse() {
        assert_eq!("0".parse::<ChildIndex>().unwrap(), ChildIndex::Normal(0));
        assert_eq!("44'".parse::<ChildIndex>().unwrap(), ChildIndex::Hardened(44));
        assert_eq!("44h".parse::<ChildIndex>().unwrap(), ChildIndex::Hardened(44));
        assert_eq!("44H".parse::<ChildIndex>().unwrap(), ChildIndex::Hardened(44));
        assert!("+4".parse::<ChildIndex>().is_err());
        assert!("'".parse::<ChildIndex>().is_err());
        assert!("x".parse::<ChildIndex>().is_err());
    }

    #[test]
    fn test_derivation_path_parse() {
        let path: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
        assert_eq!(path.depth(), 5);
        assert_eq!(path.indices()[0], ChildIndex::Hardened(44));
        assert_eq!(path.indices()[1], ChildIndex::Hardened(60));
        assert_eq!(path.indices()[2], ChildIndex::Hardened(0));
        assert_eq!(path.indices()[3], ChildIndex::Normal(0));
        assert_eq!(path.indices()[4], ChildIndex::Normal(0));
        assert_eq!(path, DerivationPath::default());
    }

    #[test]
    fn test_derivation_path_without_prefix() {
        let path: DerivationPath = "44h/60h/0h/0/7".parse().unwrap();
        assert_eq!(path.to_string(), "m/44'/60'/0'/0/7");
    }

    #[test]
    fn test_derivation_path_rejects_garbage() {
        for bad in ["", "m/", "m//0", "m/44'/x", "m/44''", "n/0"] {
            assert!(
                matches!(
                    DerivationPath::parse(bad),
                    Err(Error::InvalidDerivationPath(_))
                ),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_derivation_path_master() {
        let path: DerivationPath = "m".parse().unwrap();
        assert!(path.is_master());
        assert_eq!(path.to_string(), "m");
        assert_eq!(DerivationPath::master(), path);
    }

    #[test]
    fn test_derivation_path_child_and_parent() {
        let path: DerivationPath = "m/44'/60'/0'".parse().unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "m/44'/60'");
        assert_eq!(path.child(ChildIndex::Normal(1)).to_string(), "m/44'/60'/0'/1");
        assert!(DerivationPath::master().parent().is_none());
    }

    #[test]
    fn test_ethereum_path() {
        let path = DerivationPath::ethereum(0, 0, 0).unwrap();
        assert_eq!(path.to_string(), "m/44'/60'/0'/0/0");
        let path = DerivationPath::ethereum(2, 1, 9).unwrap();
        assert_eq!(path.to_string(), "m/44'/60'/2'/1/9");
    }
}
