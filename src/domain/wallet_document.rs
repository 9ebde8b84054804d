//! 钱包文件（JSON）格式
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "seed": "<Base64 密文或 Base64 明文种子>",
//!   "iv": "<Base64 IV，未加密时为空串>",
//!   "accounts": [ { "chains": [ { "path": "M/44H/0H/0H/0", "addresses": [ {"path": "...", "address": "..."} ] } ] } ]
//! }
//! ```
//!
//! 固定基数：1个账户、2条链、每条链2个地址。私钥从不序列化。

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::WalletError;

/// 支持的文件格式版本
pub const WALLET_VERSION: &str = "1.0";
/// 每条链写入文件的地址数
pub const ADDRESSES_PER_CHAIN: u32 = 2;

pub const JSON_VERSION: &str = "version";
pub const JSON_SEED: &str = "seed";
pub const JSON_IV: &str = "iv";
pub const JSON_ACCOUNTS: &str = "accounts";
pub const JSON_CHAINS: &str = "chains";
pub const JSON_ADDRESSES: &str = "addresses";
pub const JSON_PATH: &str = "path";
pub const JSON_ADDRESS: &str = "address";

/// 钱包文件顶层结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletDocument {
    pub version: String,
    /// 观察钱包没有种子，省略该字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    pub accounts: Vec<AccountDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDocument {
    pub chains: Vec<ChainDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDocument {
    pub path: String,
    pub addresses: Vec<AddressDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDocument {
    pub path: String,
    pub address: String,
}

impl WalletDocument {
    /// 紧凑 JSON
    pub fn to_json(&self) -> Result<String, WalletError> {
        Ok(serde_json::to_string(self)?)
    }

    /// 4空格缩进的 JSON，即钱包文件内容
    pub fn to_pretty_json(&self) -> Result<String, WalletError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        // serde_json 只输出合法 UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
