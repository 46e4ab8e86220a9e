//! Loose transaction input and its validation into a [`TypedTransaction`].
//!
//! A [`TransactionRequest`] mirrors the JSON objects wallets and RPC clients
//! pass around: every field optional, camelCase names. Converting it is the
//! one place where the transaction shape is inferred from which fee fields
//! are present.

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::transaction::{
    AccessListItem, FEE_MARKET_TX_TYPE, FeeMarketTransaction, LegacyTransaction, TypedTransaction,
};
use crate::{Error, Result};

/// An unvalidated transaction payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Declared type: `0` legacy, `2` fee-market. Inferred when absent.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<u64>,
    /// Chain id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Sender nonce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    /// Legacy gas price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
    /// Fee-market priority fee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
    /// Fee-market fee cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    /// Gas limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    /// Recipient; absent for contract creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Value in wei; defaults to zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u128>,
    /// Call data; defaults to empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Fee-market access list; defaults to empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_list: Option<Vec<AccessListItem>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Legacy,
    FeeMarket,
}

impl TransactionRequest {
    fn shape(&self) -> Result<Shape> {
        let legacy_fee = self.gas_price.is_some();
        let market_fees = (
            self.max_priority_fee_per_gas.is_some(),
            self.max_fee_per_gas.is_some(),
        );
        let any_market_fee = market_fees.0 || market_fees.1;

        let shape = match self.tx_type {
            Some(0) if legacy_fee && !any_market_fee => Shape::Legacy,
            Some(0) => {
                return Err(Error::UnsupportedTransactionType(
                    "type 0 requires gasPrice and no fee-market fields".into(),
                ));
            }
            Some(t) if t == u64::from(FEE_MARKET_TX_TYPE) => {
                if legacy_fee || market_fees != (true, true) {
                    return Err(Error::UnsupportedTransactionType(
                        "type 2 requires maxPriorityFeePerGas and maxFeePerGas and no gasPrice"
                            .into(),
                    ));
                }
                Shape::FeeMarket
            }
            Some(t) => return Err(Error::UnsupportedTransactionType(format!("type {t}"))),
            None => match (legacy_fee, market_fees) {
                (true, (false, false)) => Shape::Legacy,
                (false, (true, true)) => Shape::FeeMarket,
                (true, _) => {
                    return Err(Error::UnsupportedTransactionType(
                        "gasPrice mixed with fee-market fields".into(),
                    ));
                }
                (false, _) => {
                    return Err(Error::UnsupportedTransactionType(
                        "neither gasPrice nor both fee-market fields present".into(),
                    ));
                }
            },
        };

        if shape == Shape::Legacy && self.access_list.as_ref().is_some_and(|l| !l.is_empty()) {
            return Err(Error::UnsupportedTransactionType(
                "access lists require a fee-market transaction".into(),
            ));
        }
        Ok(shape)
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::MalformedTransaction(format!("missing {field}")))
}

impl TryFrom<TransactionRequest> for TypedTransaction {
    type Error = Error;

    fn try_from(req: TransactionRequest) -> Result<Self> {
        let shape = req.shape()?;

        let chain_id = required(req.chain_id, "chainId")?;
        let nonce = required(req.nonce, "nonce")?;
        let gas_limit = required(req.gas_limit, "gasLimit")?;
        let value = req.value.unwrap_or_default();
        let data = req.data.unwrap_or_default();

        Ok(match shape {
            Shape::Legacy => Self::Legacy(LegacyTransaction {
                chain_id: Some(chain_id),
                nonce,
                gas_price: required(req.gas_price, "gasPrice")?,
                gas_limit,
                to: req.to,
                value,
                data,
            }),
            Shape::FeeMarket => Self::FeeMarket(FeeMarketTransaction {
                chain_id,
                nonce,
                max_priority_fee_per_gas: required(
                    req.max_priority_fee_per_gas,
                    "maxPriorityFeePerGas",
                )?,
                max_fee_per_gas: required(req.max_fee_per_gas, "maxFeePerGas")?,
                gas_limit,
                to: req.to,
                value,
                data,
                access_list: req.access_list.unwrap_or_default(),
            }),
        })
    }
}

impl From<TypedTransaction> for TransactionRequest {
    fn from(tx: TypedTransaction) -> Self {
        match tx {
            TypedTransaction::Legacy(tx) => Self {
                tx_type: Some(0),
                chain_id: tx.chain_id,
                nonce: Some(tx.nonce),
                gas_price: Some(tx.gas_price),
                gas_limit: Some(tx.gas_limit),
                to: tx.to,
                value: Some(tx.value),
                data: Some(tx.data),
                ..Self::default()
            },
            TypedTransaction::FeeMarket(tx) => Self {
                tx_type: Some(u64::from(FEE_MARKET_TX_TYPE)),
                chain_id: Some(tx.chain_id),
                nonce: Some(tx.nonce),
                max_priority_fee_per_gas: Some(tx.max_priority_fee_per_gas),
                max_fee_per_gas: Some(tx.max_fee_per_gas),
                gas_limit: Some(tx.gas_limit),
                to: tx.to,
                value: Some(tx.value),
                data: Some(tx.data),
                access_list: Some(tx.access_list),
                ..Self::default()
            },
        }
    }
}
