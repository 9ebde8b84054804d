//! BIP44派生路径
//!
//! 固定路径语法：`M/44H/0H/{account}H/{chain}/{index}`，
//! `H` 或 `'` 表示硬化派生，`m` 与 `M` 均可作为根。只支持这一5层深度。

use std::fmt;
use std::str::FromStr;

use crate::error::DerivationError;

/// BIP44 purpose
pub const PURPOSE: u32 = 44;
/// 币种类型（比特币主网）
pub const COIN_TYPE: u32 = 0;

/// 链类型：0=外部收款链，1=找零链
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainKind {
    Receive,
    Change,
}

impl ChainKind {
    pub const ALL: [ChainKind; 2] = [ChainKind::Receive, ChainKind::Change];

    pub fn index(self) -> u32 {
        match self {
            ChainKind::Receive => 0,
            ChainKind::Change => 1,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(ChainKind::Receive),
            1 => Some(ChainKind::Change),
            _ => None,
        }
    }

    pub fn is_receive(self) -> bool {
        self == ChainKind::Receive
    }
}

/// 钱包根路径 (M / purpose')
pub fn wallet_path() -> String {
    format!("M/{}H", PURPOSE)
}

/// 账户路径 (M / purpose' / coin_type' / account')
pub fn account_path(account: u32) -> String {
    format!("M/{}H/{}H/{}H", PURPOSE, COIN_TYPE, account)
}

/// 链路径 (M / purpose' / coin_type' / account' / chain)
pub fn chain_path(account: u32, chain: ChainKind) -> String {
    format!("{}/{}", account_path(account), chain.index())
}

/// 地址路径 (M / purpose' / coin_type' / account' / chain / address_index)
pub fn address_path(account: u32, chain: ChainKind, index: u32) -> String {
    format!("{}/{}", chain_path(account, chain), index)
}

/// 解析后的完整地址路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPath {
    pub account: u32,
    pub chain: ChainKind,
    pub index: u32,
}

impl AddressPath {
    pub fn new(account: u32, chain: ChainKind, index: u32) -> Self {
        Self {
            account,
            chain,
            index,
        }
    }

    /// BIP32 撇号表示法，例如 `m/44'/0'/0'/0/0`
    pub fn to_bip32_notation(&self) -> String {
        format!(
            "m/{}'/{}'/{}'/{}/{}",
            PURPOSE,
            COIN_TYPE,
            self.account,
            self.chain.index(),
            self.index
        )
    }
}

impl fmt::Display for AddressPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&address_path(self.account, self.chain, self.index))
    }
}

impl FromStr for AddressPath {
    type Err = DerivationError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DerivationError::InvalidPath(format!("{}: '{}'", reason, path));

        // 1. 根
        let rest = path
            .strip_prefix("M/")
            .or_else(|| path.strip_prefix("m/"))
            .ok_or_else(|| invalid("path must start with 'M/' or 'm/'"))?;

        // 2. 固定深度
        let components: Vec<&str> = rest.split('/').collect();
        if components.len() != 5 {
            return Err(invalid("path must have exactly 5 components"));
        }

        let parsed: Vec<(u32, bool)> = components
            .iter()
            .map(|c| parse_component(c).ok_or_else(|| invalid("malformed path component")))
            .collect::<Result<_, _>>()?;

        // 3. purpose' / coin_type' / account'
        if parsed[0] != (PURPOSE, true) {
            return Err(invalid("first component must be 44H"));
        }
        if parsed[1] != (COIN_TYPE, true) {
            return Err(invalid("second component must be 0H"));
        }
        let (account, account_hardened) = parsed[2];
        if !account_hardened {
            return Err(invalid("account component must be hardened"));
        }

        // 4. chain / address_index 为普通派生
        let (chain, chain_hardened) = parsed[3];
        let (index, index_hardened) = parsed[4];
        if chain_hardened || index_hardened {
            return Err(invalid("chain and address components must not be hardened"));
        }
        let chain = ChainKind::from_index(chain).ok_or_else(|| invalid("chain must be 0 or 1"))?;

        Ok(Self {
            account,
            chain,
            index,
        })
    }
}

/// 解析单个路径分量，返回 (索引, 是否硬化)
fn parse_component(component: &str) -> Option<(u32, bool)> {
    let (digits, hardened) = match component
        .strip_suffix('H')
        .or_else(|| component.strip_suffix('\''))
        .or_else(|| component.strip_suffix('h'))
    {
        Some(digits) => (digits, true),
        None => (component, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let index = digits.parse::<u32>().ok()?;
    // 硬化位之上的索引不合法
    if index >= 0x8000_0000 {
        return None;
    }
    Some((index, hardened))
}
