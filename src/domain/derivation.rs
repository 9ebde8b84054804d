//! 分层确定性派生树
//!
//! Wallet → Account → Chain → Address。椭圆曲线与 BIP32 子密钥运算委托给 `bitcoin` crate，
//! 本模块只负责固定路径方案下的树结构：
//!
//! 1. master = 主密钥(派生种子)
//! 2. purpose = master / 44'
//! 3. coin = purpose / 0'
//! 4. account = coin / a'
//! 5. chain = account / c   (c ∈ {0, 1})
//! 6. address = chain / i
//!
//! 观察钱包从第5步开始，直接以扩展公钥作为账户密钥。

use std::fmt;
use std::str::FromStr;

use bitcoin::bip32::{ChildNumber, Xpriv, Xpub};
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{self, All, Secp256k1};
use bitcoin::{Network, PrivateKey, PublicKey};
use once_cell::sync::Lazy;

use crate::domain::derivation_path::{self, ChainKind, COIN_TYPE, PURPOSE};
use crate::error::DerivationError;

/// 全局 secp256k1 上下文（创建代价较高，只读共享）
static SECP: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 派生密钥
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 派生树中的一个节点密钥：带私钥或仅公钥
#[derive(Clone, PartialEq, Eq)]
pub enum DerivationKey {
    Private(Xpriv),
    Public(Xpub),
}

impl DerivationKey {
    /// 从512位派生种子生成主密钥
    pub fn master(seed_bytes: &[u8], network: Network) -> Result<Self, DerivationError> {
        Xpriv::new_master(network, seed_bytes)
            .map(DerivationKey::Private)
            .map_err(|e| DerivationError::KeyDerivation(e.to_string()))
    }

    /// 解析扩展公钥（观察钱包），密钥编码的网络必须与钱包网络一致
    pub fn from_xpub(xpub: &str, network: Network) -> Result<Self, DerivationError> {
        let key = Xpub::from_str(xpub.trim())
            .map_err(|e| DerivationError::InvalidExtendedKey(e.to_string()))?;

        // tpub 同时用于 testnet / signet / regtest
        if (key.network == Network::Bitcoin) != (network == Network::Bitcoin) {
            return Err(DerivationError::InvalidExtendedKey(format!(
                "key is encoded for {}, wallet network is {}",
                key.network, network
            )));
        }
        Ok(DerivationKey::Public(key))
    }

    pub fn has_private_key(&self) -> bool {
        matches!(self, DerivationKey::Private(_))
    }

    /// 派生子密钥
    ///
    /// 仅公钥节点上的硬化派生返回 `HardenedDerivationRequiresPrivateKey`。
    pub fn derive_child(&self, index: u32, hardened: bool) -> Result<Self, DerivationError> {
        let child = if hardened {
            ChildNumber::from_hardened_idx(index)
        } else {
            ChildNumber::from_normal_idx(index)
        }
        .map_err(|e| DerivationError::KeyDerivation(e.to_string()))?;

        match self {
            DerivationKey::Private(xpriv) => xpriv
                .derive_priv(&SECP, &[child])
                .map(DerivationKey::Private)
                .map_err(|e| DerivationError::KeyDerivation(e.to_string())),
            DerivationKey::Public(xpub) => {
                if hardened {
                    return Err(DerivationError::HardenedDerivationRequiresPrivateKey { index });
                }
                xpub.ckd_pub(&SECP, child)
                    .map(DerivationKey::Public)
                    .map_err(|e| DerivationError::KeyDerivation(e.to_string()))
            }
        }
    }

    /// 对应的扩展公钥
    pub fn to_xpub(&self) -> Xpub {
        match self {
            DerivationKey::Private(xpriv) => Xpub::from_priv(&SECP, xpriv),
            DerivationKey::Public(xpub) => *xpub,
        }
    }

    /// 压缩公钥
    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(self.to_xpub().public_key)
    }

    /// 私钥标量（仅带私钥节点）
    pub fn secret_key(&self) -> Option<secp256k1::SecretKey> {
        match self {
            DerivationKey::Private(xpriv) => Some(xpriv.private_key),
            DerivationKey::Public(_) => None,
        }
    }
}

impl fmt::Debug for DerivationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.has_private_key() { "Private" } else { "Public" };
        write!(f, "DerivationKey::{}({})", kind, self.to_xpub().fingerprint())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 地址
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 链上某个索引处的地址
///
/// `encoded_address` 与 `public_key_hash` 完全由公钥和网络决定。
#[derive(Clone, PartialEq, Eq)]
pub struct Address {
    pub index: u32,
    /// 完整5层路径
    pub path: String,
    /// 压缩公钥（33字节）
    pub public_key: Vec<u8>,
    /// HASH160(公钥)（20字节）
    pub public_key_hash: Vec<u8>,
    /// 压缩格式私钥，仅完整钱包存在
    pub private_key: Option<PrivateKey>,
    /// P2PKH 编码地址
    pub encoded_address: String,
}

impl Address {
    /// 从链密钥派生索引处的地址（纯函数）
    fn derive(
        chain_key: &DerivationKey,
        chain_path: &str,
        index: u32,
        network: Network,
    ) -> Result<Self, DerivationError> {
        let key = chain_key.derive_child(index, false)?;
        let public_key = key.public_key();

        Ok(Self {
            index,
            path: format!("{}/{}", chain_path, index),
            public_key: public_key.to_bytes(),
            public_key_hash: public_key.pubkey_hash().to_byte_array().to_vec(),
            private_key: key.secret_key().map(|sk| PrivateKey::new(sk, network)),
            encoded_address: bitcoin::Address::p2pkh(&public_key, network).to_string(),
        })
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    /// 压缩 WIF 格式私钥，供纸钱包渲染使用
    pub fn private_key_wif(&self) -> Option<String> {
        self.private_key.map(|pk| pk.to_wif())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Address")
            .field("path", &self.path)
            .field("encoded_address", &self.encoded_address)
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 链
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 账户下的收款链或找零链。地址按需派生，不缓存。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    kind: ChainKind,
    path: String,
    key: DerivationKey,
    network: Network,
}

impl Chain {
    fn derive(
        account_key: &DerivationKey,
        account: u32,
        kind: ChainKind,
        network: Network,
    ) -> Result<Self, DerivationError> {
        Ok(Self {
            kind,
            path: derivation_path::chain_path(account, kind),
            key: account_key.derive_child(kind.index(), false)?,
            network,
        })
    }

    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    pub fn is_receive(&self) -> bool {
        self.kind.is_receive()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 索引处的地址，同一输入总是得到相同结果
    pub fn address_at(&self, index: u32) -> Result<Address, DerivationError> {
        Address::derive(&self.key, &self.path, index, self.network)
    }

    /// 前 `count` 个地址
    pub fn addresses(&self, count: u32) -> Result<Vec<Address>, DerivationError> {
        (0..count).map(|i| self.address_at(i)).collect()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 账户
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// BIP44 账户，持有收款链与找零链
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    index: u32,
    path: String,
    key: DerivationKey,
    receive: Chain,
    change: Chain,
}

impl Account {
    /// 从币种密钥 (M/44'/0') 硬化派生账户
    pub fn derive(
        coin_key: &DerivationKey,
        index: u32,
        network: Network,
    ) -> Result<Self, DerivationError> {
        let key = coin_key.derive_child(index, true)?;
        Self::from_account_key(key, index, network)
    }

    /// 观察账户：扩展公钥直接作为账户密钥
    pub fn from_xpub(xpub: &str, index: u32, network: Network) -> Result<Self, DerivationError> {
        let key = DerivationKey::from_xpub(xpub, network)?;
        Self::from_account_key(key, index, network)
    }

    fn from_account_key(
        key: DerivationKey,
        index: u32,
        network: Network,
    ) -> Result<Self, DerivationError> {
        let receive = Chain::derive(&key, index, ChainKind::Receive, network)?;
        let change = Chain::derive(&key, index, ChainKind::Change, network)?;

        Ok(Self {
            index,
            path: derivation_path::account_path(index),
            key,
            receive,
            change,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn receive(&self) -> &Chain {
        &self.receive
    }

    pub fn change(&self) -> &Chain {
        &self.change
    }

    pub fn chain(&self, kind: ChainKind) -> &Chain {
        match kind {
            ChainKind::Receive => &self.receive,
            ChainKind::Change => &self.change,
        }
    }

    pub fn chains(&self) -> [&Chain; 2] {
        [&self.receive, &self.change]
    }

    pub fn is_watch_only(&self) -> bool {
        !self.key.has_private_key()
    }

    /// 账户级扩展公钥，可用于构建观察钱包
    pub fn xpub(&self) -> String {
        self.key.to_xpub().to_string()
    }
}

/// 主密钥 → purpose(44') → coin_type(0')
pub fn derive_coin_key(seed_bytes: &[u8], network: Network) -> Result<DerivationKey, DerivationError> {
    DerivationKey::master(seed_bytes, network)?
        .derive_child(PURPOSE, true)?
        .derive_child(COIN_TYPE, true)
}
