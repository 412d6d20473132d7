//! Exchange-neutral types returned by sessions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Holdings of a single asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

impl Balance {
    pub fn new(asset: impl Into<String>, free: Decimal, locked: Decimal) -> Self {
        Self {
            asset: asset.into(),
            free,
            locked,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.free.is_zero() && self.locked.is_zero()
    }
}

/// Which endpoint set a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Sandbox,
    Production,
}

impl Network {
    pub fn from_sandbox_flag(use_sandbox: bool) -> Self {
        if use_sandbox { Network::Sandbox } else { Network::Production }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Sandbox => write!(f, "sandbox"),
            Network::Production => write!(f, "production"),
        }
    }
}
