//! Binance REST payloads

use crate::errors::{ExchangeError, Result};
use crate::types::Balance;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// `GET /api/v3/time`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerTime {
    #[serde(rename = "serverTime")]
    pub server_time: u64,
}

/// `GET /api/v3/exchangeInfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeInfo {
    pub timezone: String,
    #[serde(rename = "serverTime")]
    pub server_time: u64,
    pub symbols: Vec<SymbolInfo>,
}

/// Symbol information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
    #[serde(default)]
    pub filters: Vec<serde_json::Value>,
}

impl SymbolInfo {
    pub fn is_trading(&self) -> bool {
        self.status == "TRADING"
    }
}

/// `GET /api/v3/account` (signed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(rename = "canTrade")]
    pub can_trade: bool,
    #[serde(rename = "canWithdraw")]
    pub can_withdraw: bool,
    #[serde(rename = "canDeposit")]
    pub can_deposit: bool,
    #[serde(rename = "updateTime")]
    pub update_time: u64,
    #[serde(rename = "accountType")]
    pub account_type: String,
    pub balances: Vec<BinanceBalance>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Balance entry as Binance reports it, amounts as decimal strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinanceBalance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

impl TryFrom<BinanceBalance> for Balance {
    type Error = ExchangeError;

    fn try_from(raw: BinanceBalance) -> Result<Self> {
        let parse = |field: &str, value: &str| {
            Decimal::from_str(value).map_err(|e| {
                ExchangeError::InvalidResponse(format!("{} {field} {value:?}: {e}", raw.asset))
            })
        };
        let free = parse("free", &raw.free)?;
        let locked = parse("locked", &raw.locked)?;
        Ok(Balance::new(raw.asset, free, locked))
    }
}

/// Error document returned with non-200 statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}
