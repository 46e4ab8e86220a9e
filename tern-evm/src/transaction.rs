//! Unsigned Ethereum transactions.
//!
//! Two shapes are supported:
//! - [`LegacyTransaction`]: a single `gasPrice`, with optional EIP-155 replay
//!   protection when a chain id is set.
//! - [`FeeMarketTransaction`]: EIP-1559 (type 2) with a priority fee, a fee
//!   cap and an access list.
//!
//! Both implement [`SigningPayload`], the one contract signing and recovery
//! go through.

use alloy_primitives::{Address, B256, Bytes};
use serde::{Deserialize, Serialize};

use crate::hash::keccak256;
use crate::rlp::{self, Item};
use crate::signed::TxSignature;
use crate::{Error, Result};

/// Gas consumed by a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;

/// EIP-2718 type byte for fee-market transactions.
pub const FEE_MARKET_TX_TYPE: u8 = 0x02;

/// Offset added to `2 * chain_id` in EIP-155 `v` values.
const EIP155_V_OFFSET: u64 = 35;
/// Base `v` for pre-EIP-155 signatures.
const LEGACY_V_BASE: u64 = 27;

/// The hashing and `v` mapping shared by every signable transaction shape.
pub trait SigningPayload {
    /// Canonical encoding of the unsigned fields.
    fn encode_for_signing(&self) -> Vec<u8>;

    /// Keccak-256 of [`encode_for_signing`](Self::encode_for_signing).
    fn signing_hash(&self) -> B256 {
        keccak256(self.encode_for_signing())
    }

    /// Fold a recovery bit (y-parity) into this shape's `v`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTransaction`] if the chain id is too large to
    /// be folded into `v`.
    fn signature_v(&self, y_parity: bool) -> Result<u64>;

    /// Extract the recovery bit from `v`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignature`] if `v` does not belong to this
    /// shape (or this chain id).
    fn recovery_bit(&self, v: u64) -> Result<bool>;
}

/// An EIP-2930 access list entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListItem {
    /// Account touched by the transaction.
    pub address: Address,
    /// Storage slots of `address` touched by the transaction.
    #[serde(default)]
    pub storage_keys: Vec<B256>,
}

// ---------------------------------------------------------------------------
// Legacy
// ---------------------------------------------------------------------------

/// A legacy (type 0) transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTransaction {
    /// Chain id for EIP-155 replay protection; `None` signs pre-EIP-155.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Sender nonce.
    pub nonce: u64,
    /// Price per unit of gas, in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient; `None` creates a contract.
    #[serde(default)]
    pub to: Option<Address>,
    /// Value in wei.
    #[serde(default)]
    pub value: u128,
    /// Call data or init code.
    #[serde(default)]
    pub data: Bytes,
}

impl LegacyTransaction {
    /// A plain EIP-155 value transfer.
    #[must_use]
    pub fn transfer(chain_id: u64, nonce: u64, to: Address, value: u128, gas_price: u128) -> Self {
        Self {
            chain_id: Some(chain_id),
            nonce,
            gas_price,
            gas_limit: TRANSFER_GAS,
            to: Some(to),
            value,
            data: Bytes::new(),
        }
    }

    fn base_fields(&self) -> Vec<Vec<u8>> {
        vec![
            rlp::encode_u64(self.nonce),
            rlp::encode_u128(self.gas_price),
            rlp::encode_u64(self.gas_limit),
            rlp::encode_address(self.to.as_ref()),
            rlp::encode_u128(self.value),
            rlp::encode_bytes(&self.data),
        ]
    }

    /// `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`.
    pub(crate) fn encode_signed(&self, signature: &TxSignature) -> Vec<u8> {
        let mut items = self.base_fields();
        items.extend(signature.rlp_fields());
        rlp::encode_list(&items)
    }

    pub(crate) fn decode_signed(items: &[Item<'_>]) -> Result<(Self, TxSignature)> {
        let [nonce, gas_price, gas_limit, to, value, data, v, r, s] = items else {
            return Err(Error::MalformedTransaction(format!(
                "legacy transaction has {} fields, expected 9",
                items.len()
            )));
        };

        let signature = TxSignature::decode(v, r, s)?;
        let chain_id = match signature.v {
            27 | 28 => None,
            v if v >= EIP155_V_OFFSET => Some((v - EIP155_V_OFFSET) / 2),
            _ => return Err(Error::InvalidSignature),
        };

        let tx = Self {
            chain_id,
            nonce: nonce.as_u64()?,
            gas_price: gas_price.as_u128()?,
            gas_limit: gas_limit.as_u64()?,
            to: to.as_address()?,
            value: value.as_u128()?,
            data: Bytes::copy_from_slice(data.as_bytes()?),
        };
        Ok((tx, signature))
    }

    fn eip155_base(chain_id: u64) -> Option<u64> {
        chain_id.checked_mul(2)?.checked_add(EIP155_V_OFFSET)
    }
}

impl SigningPayload for LegacyTransaction {
    fn encode_for_signing(&self) -> Vec<u8> {
        let mut items = self.base_fields();
        if let Some(chain_id) = self.chain_id {
            items.push(rlp::encode_u64(chain_id));
            items.push(rlp::encode_u64(0));
            items.push(rlp::encode_u64(0));
        }
        rlp::encode_list(&items)
    }

    fn signature_v(&self, y_parity: bool) -> Result<u64> {
        let base = match self.chain_id {
            None => LEGACY_V_BASE,
            Some(chain_id) => Self::eip155_base(chain_id).ok_or_else(|| {
                Error::MalformedTransaction(format!("chain id {chain_id} too large for EIP-155"))
            })?,
        };
        Ok(base + u64::from(y_parity))
    }

    fn recovery_bit(&self, v: u64) -> Result<bool> {
        let base = match self.chain_id {
            None => LEGACY_V_BASE,
            Some(chain_id) => Self::eip155_base(chain_id).ok_or(Error::InvalidSignature)?,
        };
        match v.checked_sub(base) {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Error::InvalidSignature),
        }
    }
}

// ---------------------------------------------------------------------------
// Fee market
// ---------------------------------------------------------------------------

/// An EIP-1559 (type 2) fee-market transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeMarketTransaction {
    /// Chain id; always part of the signed payload.
    pub chain_id: u64,
    /// Sender nonce.
    pub nonce: u64,
    /// Tip per gas paid to the block producer, in wei.
    pub max_priority_fee_per_gas: u128,
    /// Cap on total fee per gas, in wei.
    pub max_fee_per_gas: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient; `None` creates a contract.
    #[serde(default)]
    pub to: Option<Address>,
    /// Value in wei.
    #[serde(default)]
    pub value: u128,
    /// Call data or init code.
    #[serde(default)]
    pub data: Bytes,
    /// Pre-declared accounts and storage slots.
    #[serde(default)]
    pub access_list: Vec<AccessListItem>,
}

impl FeeMarketTransaction {
    /// A plain value transfer.
    #[must_use]
    pub fn transfer(
        chain_id: u64,
        nonce: u64,
        to: Address,
        value: u128,
        max_priority_fee_per_gas: u128,
        max_fee_per_gas: u128,
    ) -> Self {
        Self {
            chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit: TRANSFER_GAS,
            to: Some(to),
            value,
            data: Bytes::new(),
            access_list: Vec::new(),
        }
    }

    fn base_fields(&self) -> Vec<Vec<u8>> {
        vec![
            rlp::encode_u64(self.chain_id),
            rlp::encode_u64(self.nonce),
            rlp::encode_u128(self.max_priority_fee_per_gas),
            rlp::encode_u128(self.max_fee_per_gas),
            rlp::encode_u64(self.gas_limit),
            rlp::encode_address(self.to.as_ref()),
            rlp::encode_u128(self.value),
            rlp::encode_bytes(&self.data),
            encode_access_list(&self.access_list),
        ]
    }

    /// `0x02 || rlp([chainId, …, accessList, yParity, r, s])`.
    pub(crate) fn encode_signed(&self, signature: &TxSignature) -> Vec<u8> {
        let mut items = self.base_fields();
        items.extend(signature.rlp_fields());
        typed_envelope(&items)
    }

    pub(crate) fn decode_signed(items: &[Item<'_>]) -> Result<(Self, TxSignature)> {
        let [
            chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas,
            gas_limit,
            to,
            value,
            data,
            access_list,
            y_parity,
            r,
            s,
        ] = items
        else {
            return Err(Error::MalformedTransaction(format!(
                "fee-market transaction has {} fields, expected 12",
                items.len()
            )));
        };

        let tx = Self {
            chain_id: chain_id.as_u64()?,
            nonce: nonce.as_u64()?,
            max_priority_fee_per_gas: max_priority_fee_per_gas.as_u128()?,
            max_fee_per_gas: max_fee_per_gas.as_u128()?,
            gas_limit: gas_limit.as_u64()?,
            to: to.as_address()?,
            value: value.as_u128()?,
            data: Bytes::copy_from_slice(data.as_bytes()?),
            access_list: decode_access_list(access_list)?,
        };
        Ok((tx, TxSignature::decode(y_parity, r, s)?))
    }
}

impl SigningPayload for FeeMarketTransaction {
    fn encode_for_signing(&self) -> Vec<u8> {
        typed_envelope(&self.base_fields())
    }

    fn signature_v(&self, y_parity: bool) -> Result<u64> {
        Ok(u64::from(y_parity))
    }

    fn recovery_bit(&self, v: u64) -> Result<bool> {
        match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidSignature),
        }
    }
}

fn typed_envelope(items: &[Vec<u8>]) -> Vec<u8> {
    let body = rlp::encode_list(items);
    let mut out = Vec::with_capacity(1 + body.len());
    out.push(FEE_MARKET_TX_TYPE);
    out.extend_from_slice(&body);
    out
}

fn encode_access_list(list: &[AccessListItem]) -> Vec<u8> {
    let entries: Vec<Vec<u8>> = list
        .iter()
        .map(|item| {
            let keys: Vec<Vec<u8>> = item
                .storage_keys
                .iter()
                .map(|key| rlp::encode_bytes(key.as_slice()))
                .collect();
            rlp::encode_list(&[rlp::encode_bytes(item.address.as_slice()), rlp::encode_list(&keys)])
        })
        .collect();
    rlp::encode_list(&entries)
}

fn decode_access_list(item: &Item<'_>) -> Result<Vec<AccessListItem>> {
    item.as_list()?
        .iter()
        .map(|entry| {
            let [address, keys] = entry.as_list()? else {
                return Err(Error::MalformedTransaction(
                    "access list entry must have 2 fields".into(),
                ));
            };
            let address = address.as_address()?.ok_or_else(|| {
                Error::MalformedTransaction("access list entry has empty address".into())
            })?;
            let storage_keys = keys
                .as_list()?
                .iter()
                .map(|key| {
                    let bytes = key.as_bytes()?;
                    if bytes.len() != 32 {
                        return Err(Error::MalformedTransaction(format!(
                            "storage key must be 32 bytes, got {}",
                            bytes.len()
                        )));
                    }
                    Ok(B256::from_slice(bytes))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(AccessListItem {
                address,
                storage_keys,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Either shape
// ---------------------------------------------------------------------------

/// An unsigned transaction of either supported shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypedTransaction {
    /// Type 0.
    Legacy(LegacyTransaction),
    /// Type 2.
    FeeMarket(FeeMarketTransaction),
}

impl TypedTransaction {
    /// EIP-2718 type number: 0 for legacy, 2 for fee-market.
    #[must_use]
    pub const fn tx_type(&self) -> u8 {
        match self {
            Self::Legacy(_) => 0,
            Self::FeeMarket(_) => FEE_MARKET_TX_TYPE,
        }
    }

    /// Chain id, if the transaction commits to one.
    #[must_use]
    pub const fn chain_id(&self) -> Option<u64> {
        match self {
            Self::Legacy(tx) => tx.chain_id,
            Self::FeeMarket(tx) => Some(tx.chain_id),
        }
    }

    /// Sender nonce.
    #[must_use]
    pub const fn nonce(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.nonce,
            Self::FeeMarket(tx) => tx.nonce,
        }
    }

    /// Recipient; `None` for contract creation.
    #[must_use]
    pub const fn to(&self) -> Option<Address> {
        match self {
            Self::Legacy(tx) => tx.to,
            Self::FeeMarket(tx) => tx.to,
        }
    }

    /// Short variant name for logs and display.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Legacy(_) => "legacy",
            Self::FeeMarket(_) => "fee-market",
        }
    }
}

impl SigningPayload for TypedTransaction {
    fn encode_for_signing(&self) -> Vec<u8> {
        match self {
            Self::Legacy(tx) => tx.encode_for_signing(),
            Self::FeeMarket(tx) => tx.encode_for_signing(),
        }
    }

    fn signature_v(&self, y_parity: bool) -> Result<u64> {
        match self {
            Self::Legacy(tx) => tx.signature_v(y_parity),
            Self::FeeMarket(tx) => tx.signature_v(y_parity),
        }
    }

    fn recovery_bit(&self, v: u64) -> Result<bool> {
        match self {
            Self::Legacy(tx) => tx.recovery_bit(v),
            Self::FeeMarket(tx) => tx.recovery_bit(v),
        }
    }
}

impl From<LegacyTransaction> for TypedTransaction {
    fn from(tx: LegacyTransaction) -> Self {
        Self::Legacy(tx)
    }
}

impl From<FeeMarketTransaction> for TypedTransaction {
    fn from(tx: FeeMarketTransaction) -> Self {
        Self::FeeMarket(tx)
    }
}
