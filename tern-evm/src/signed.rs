//! Signed transactions and their raw wire encoding.

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

use crate::hash::keccak256;
use crate::rlp::{self, Item, RlpError};
use crate::transaction::{
    FEE_MARKET_TX_TYPE, FeeMarketTransaction, LegacyTransaction, TypedTransaction,
};
use crate::{Error, Result};

/// An ECDSA signature in Ethereum's `(v, r, s)` form.
///
/// `v` is the raw wire value: `27/28` or `35 + 2 * chainId + bit` for legacy
/// transactions, the bare y-parity for fee-market ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxSignature {
    /// Recovery value.
    pub v: u64,
    /// Signature `r` scalar.
    pub r: U256,
    /// Signature `s` scalar.
    pub s: U256,
}

impl TxSignature {
    pub(crate) fn rlp_fields(&self) -> [Vec<u8>; 3] {
        [
            rlp::encode_u64(self.v),
            rlp::encode_u256(self.r),
            rlp::encode_u256(self.s),
        ]
    }

    pub(crate) fn decode(v: &Item<'_>, r: &Item<'_>, s: &Item<'_>) -> Result<Self> {
        Ok(Self {
            v: v.as_u64()?,
            r: r.as_u256()?,
            s: s.as_u256()?,
        })
    }

    /// The 64-byte `r || s` encoding.
    #[must_use]
    pub fn to_rs_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        out[32..].copy_from_slice(&self.s.to_be_bytes::<32>());
        out
    }
}

/// A transaction together with its signature.
///
/// Fields are private: a signed record is produced by signing or decoding
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransaction {
    tx: TypedTransaction,
    signature: TxSignature,
}

impl SignedTransaction {
    pub(crate) const fn new(tx: TypedTransaction, signature: TxSignature) -> Self {
        Self { tx, signature }
    }

    /// The unsigned fields.
    #[must_use]
    pub const fn tx(&self) -> &TypedTransaction {
        &self.tx
    }

    /// The `(v, r, s)` signature.
    #[must_use]
    pub const fn signature(&self) -> &TxSignature {
        &self.signature
    }

    /// Raw bytes as accepted by `eth_sendRawTransaction`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match &self.tx {
            TypedTransaction::Legacy(tx) => tx.encode_signed(&self.signature),
            TypedTransaction::FeeMarket(tx) => tx.encode_signed(&self.signature),
        }
    }

    /// [`encode`](Self::encode) as `0x`-prefixed hex.
    #[must_use]
    pub fn encode_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }

    /// Transaction hash: Keccak-256 of the raw bytes.
    #[must_use]
    pub fn hash(&self) -> B256 {
        keccak256(self.encode())
    }

    /// Decode raw bytes produced by [`encode`](Self::encode).
    ///
    /// A leading byte `>= 0xc0` is a legacy RLP list; `0x02` is a fee-market
    /// envelope. Legacy chain ids are recovered from `v`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedTransactionType`] for any other envelope type.
    /// - [`Error::MalformedTransaction`] for empty, truncated or
    ///   non-canonical input, or a wrong field count.
    /// - [`Error::InvalidSignature`] for a legacy `v` that maps to no chain.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let Some(&first) = raw.first() else {
            return Err(Error::MalformedTransaction("empty input".into()));
        };

        let (tx, signature) = match first {
            0xc0..=0xff => {
                let item = rlp::decode(raw)?;
                let (tx, sig) = LegacyTransaction::decode_signed(item.as_list()?)?;
                (TypedTransaction::Legacy(tx), sig)
            }
            FEE_MARKET_TX_TYPE => {
                let item = rlp::decode(&raw[1..])?;
                let (tx, sig) = FeeMarketTransaction::decode_signed(item.as_list()?)?;
                (TypedTransaction::FeeMarket(tx), sig)
            }
            0x00..=0x7f => {
                return Err(Error::UnsupportedTransactionType(format!(
                    "envelope type 0x{first:02x}"
                )));
            }
            _ => return Err(RlpError::ExpectedList.into()),
        };

        Ok(Self::new(tx, signature))
    }

    /// Decode from hex, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHex`] for malformed hex, otherwise as
    /// [`decode`](Self::decode).
    pub fn decode_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(s).map_err(|_| Error::InvalidHex)?;
        Self::decode(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use hex_literal::hex;

    const EIP155_RAW: [u8; 110] = hex!(
        "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
    );

    #[test]
    fn test_decode_eip155_example() {
        let signed = SignedTransaction::decode(&EIP155_RAW).unwrap();
        let TypedTransaction::Legacy(tx) = signed.tx() else {
            panic!("expected legacy");
        };
        assert_eq!(tx.chain_id, Some(1));
        assert_eq!(tx.nonce, 9);
        assert_eq!(tx.gas_price, 20_000_000_000);
        assert_eq!(tx.gas_limit, 21_000);
        assert_eq!(tx.to, Some(Address::repeat_byte(0x35)));
        assert_eq!(tx.value, 1_000_000_000_000_000_000);
        assert!(tx.data.is_empty());
        assert_eq!(signed.signature().v, 37);
        assert_eq!(
            signed.signature().r,
            U256::from_be_bytes(hex!("28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276"))
        );
        assert_eq!(signed.encode(), EIP155_RAW);
    }

    #[test]
    fn test_decode_hex_prefix() {
        let hex_str = format!("0x{}", hex::encode(EIP155_RAW));
        let signed = SignedTransaction::decode_hex(&hex_str).unwrap();
        assert_eq!(signed.encode_hex(), hex_str);
        assert_eq!(SignedTransaction::decode_hex("0xzz"), Err(Error::InvalidHex));
    }

    #[test]
    fn test_fee_market_roundtrip() {
        let tx = FeeMarketTransaction {
            access_list: vec![crate::AccessListItem {
                address: Address::repeat_byte(0x11),
                storage_keys: vec![B256::repeat_byte(0x22)],
            }],
            data: vec![0xde, 0xad, 0xbe, 0xef].into(),
            ..FeeMarketTransaction::transfer(
                5,
                3,
                Address::repeat_byte(0x44),
                7,
                1_000_000_000,
                50_000_000_000,
            )
        };
        let signed = SignedTransaction::new(
            tx.into(),
            TxSignature {
                v: 1,
                r: U256::from(12345u64),
                s: U256::from(67890u64),
            },
        );
        let raw = signed.encode();
        assert_eq!(raw[0], FEE_MARKET_TX_TYPE);
        assert_eq!(SignedTransaction::decode(&raw).unwrap(), signed);
        assert_eq!(signed.hash(), keccak256(&raw));
    }

    #[test]
    fn test_rejects_unknown_envelope() {
        assert!(matches!(
            SignedTransaction::decode(&[0x01, 0xc0]),
            Err(Error::UnsupportedTransactionType(_))
        ));
        assert!(matches!(
            SignedTransaction::decode(&[0x03, 0xc0]),
            Err(Error::UnsupportedTransactionType(_))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        for raw in [&[][..], &[0x80][..], &[0xc0][..], &EIP155_RAW[..100], &[0x02][..]] {
            assert!(
                matches!(
                    SignedTransaction::decode(raw),
                    Err(Error::MalformedTransaction(_))
                ),
                "accepted {raw:02x?}"
            );
        }
    }

    #[test]
    fn test_rejects_deeply_nested_input() {
        let deep = (0..10_000).fold(rlp::encode_list(&[]), |inner, _| rlp::encode_list(&[inner]));
        let mut typed = vec![FEE_MARKET_TX_TYPE];
        typed.extend_from_slice(&deep);

        for raw in [&deep[..], &typed[..]] {
            assert!(matches!(
                SignedTransaction::decode(raw),
                Err(Error::MalformedTransaction(_))
            ));
        }
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let mut raw = EIP155_RAW.to_vec();
        raw.push(0x00);
        assert!(matches!(
            SignedTransaction::decode(&raw),
            Err(Error::MalformedTransaction(_))
        ));
    }

    #[test]
    fn test_rejects_v_without_chain() {
        let tx = LegacyTransaction::transfer(1, 0, Address::ZERO, 0, 1);
        let raw = tx.encode_signed(&TxSignature {
            v: 30,
            r: U256::from(1u64),
            s: U256::from(1u64),
        });
        assert_eq!(SignedTransaction::decode(&raw), Err(Error::InvalidSignature));
    }

    #[test]
    fn test_pre_eip155_decodes_without_chain_id() {
        let mut tx = LegacyTransaction::transfer(1, 0, Address::ZERO, 0, 1);
        tx.chain_id = None;
        let signed = SignedTransaction::new(
            tx.clone().into(),
            TxSignature {
                v: 28,
                r: U256::from(1u64),
                s: U256::from(2u64),
            },
        );
        let decoded = SignedTransaction::decode(&signed.encode()).unwrap();
        assert_eq!(decoded.tx(), &TypedTransaction::Legacy(tx));
    }

    #[test]
    fn test_signed_json_shape() {
        let signed = SignedTransaction::decode(&EIP155_RAW).unwrap();
        let json = serde_json::to_value(&signed).unwrap();
        assert_eq!(json["signature"]["v"], 37);
        assert_eq!(json["tx"]["legacy"]["nonce"], 9);
    }
}
