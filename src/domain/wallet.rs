//! BIP44 钱包
//!
//! 由 (熵, 密码)、(助记词, 密码)、(钱包文件, 密码) 或扩展公钥列表构建，
//! 构建后不可变；每次创建/恢复都生成新的 `Wallet`。

use std::fmt;

use bitcoin::Network;
use zeroize::Zeroizing;

use crate::domain::derivation::{derive_coin_key, Account, Address};
use crate::domain::derivation_path;
use crate::domain::seed_codec::{self, MnemonicWords, Seed};
use crate::domain::verifier::WalletVerifier;
use crate::domain::wallet_document::{
    AccountDocument, AddressDocument, ChainDocument, WalletDocument, ADDRESSES_PER_CHAIN,
    WALLET_VERSION,
};
use crate::error::{DerivationError, VerificationError, WalletError, WalletResult};
use crate::infrastructure::encryption::seal_seed;
use crate::infrastructure::log_redact::redact_address;

/// 密钥派生使用的 BIP39 密码
///
/// 旧版钱包文件的地址都以空 BIP39 密码派生；存储密码只用于加密种子。
pub const LEGACY_BIP39_PASSPHRASE: &str = "";
/// 完整钱包的账户数
pub const NUM_ACCOUNTS: u32 = 1;

#[derive(Clone)]
pub struct Wallet {
    seed: Option<Seed>,
    passphrase: String,
    mnemonic: Option<MnemonicWords>,
    network: Network,
    path: String,
    accounts: Vec<Account>,
}

impl Wallet {
    /// 从原始熵构建
    pub fn from_entropy(entropy: &[u8], passphrase: &str, network: Network) -> WalletResult<Self> {
        let seed = Seed::new(entropy.to_vec())?;
        let mnemonic = seed_codec::entropy_to_mnemonic(seed.as_bytes())?;
        Self::build(seed, mnemonic, passphrase, network)
    }

    /// 从助记词构建
    pub fn from_mnemonic(
        words: &MnemonicWords,
        passphrase: &str,
        network: Network,
    ) -> WalletResult<Self> {
        let seed = seed_codec::mnemonic_to_entropy(words)?;
        Self::build(seed, words.clone(), passphrase, network)
    }

    /// 从钱包文件恢复，先完整校验再返回
    pub fn from_json(
        json: &str,
        passphrase: &str,
        network: Network,
    ) -> Result<Self, VerificationError> {
        WalletVerifier::new(network).verify(json, passphrase)
    }

    /// 观察钱包：每个扩展公钥对应一个账户，没有种子和私钥
    pub fn watch_only<S: AsRef<str>>(xpubs: &[S], network: Network) -> WalletResult<Self> {
        if xpubs.is_empty() {
            return Err(DerivationError::InvalidExtendedKey(
                "no extended public key supplied".into(),
            )
            .into());
        }

        let accounts = xpubs
            .iter()
            .zip(0u32..)
            .map(|(xpub, index)| Account::from_xpub(xpub.as_ref(), index, network))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(accounts = accounts.len(), "watch-only wallet created");

        Ok(Self {
            seed: None,
            passphrase: String::new(),
            mnemonic: None,
            network,
            path: derivation_path::wallet_path(),
            accounts,
        })
    }

    fn build(
        seed: Seed,
        mnemonic: MnemonicWords,
        passphrase: &str,
        network: Network,
    ) -> WalletResult<Self> {
        let seed_bytes = Zeroizing::new(seed_codec::mnemonic_to_seed_bytes(
            &mnemonic,
            LEGACY_BIP39_PASSPHRASE,
        )?);
        let coin_key = derive_coin_key(&seed_bytes[..], network)?;

        let accounts = (0..NUM_ACCOUNTS)
            .map(|index| Account::derive(&coin_key, index, network))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            seed: Some(seed),
            passphrase: passphrase.to_string(),
            mnemonic: Some(mnemonic),
            network,
            path: derivation_path::wallet_path(),
            accounts,
        })
    }

    /// 原始种子（观察钱包为 None）
    pub fn seed(&self) -> Option<&Seed> {
        self.seed.as_ref()
    }

    pub fn seed_hex(&self) -> Option<String> {
        self.seed.as_ref().map(Seed::to_hex)
    }

    pub fn mnemonic(&self) -> Option<&MnemonicWords> {
        self.mnemonic.as_ref()
    }

    /// 存储密码
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// 钱包路径 (M / purpose')
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, index: usize) -> Option<&Account> {
        self.accounts.get(index)
    }

    pub fn is_watch_only(&self) -> bool {
        self.seed.is_none()
    }

    /// 第一个收款地址
    pub fn address(&self) -> WalletResult<Address> {
        let account = self.accounts.first().ok_or_else(|| {
            DerivationError::KeyDerivation("wallet has no accounts".into())
        })?;
        Ok(account.receive().address_at(0)?)
    }

    /// 钱包文件结构；有存储密码时种子被加密
    pub fn to_document(&self) -> WalletResult<WalletDocument> {
        let (seed, iv) = match &self.seed {
            Some(seed) => {
                let sealed = seal_seed(seed.as_bytes(), &self.passphrase)?;
                (Some(sealed.ciphertext), Some(sealed.iv))
            }
            None => (None, None),
        };

        let accounts = self
            .accounts
            .iter()
            .map(account_document)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WalletDocument {
            version: WALLET_VERSION.to_string(),
            seed,
            iv,
            accounts,
        })
    }

    /// 钱包文件内容（4空格缩进 JSON）
    pub fn file_content(&self) -> WalletResult<String> {
        self.to_document()?.to_pretty_json()
    }

    /// 钱包文件名：`<第一个收款地址>.json`
    pub fn file_name(&self) -> WalletResult<String> {
        Ok(format!("{}.json", self.address()?.encoded_address))
    }
}

fn account_document(account: &Account) -> Result<AccountDocument, WalletError> {
    let chains = account
        .chains()
        .into_iter()
        .map(|chain| -> Result<ChainDocument, WalletError> {
            let addresses = chain
                .addresses(ADDRESSES_PER_CHAIN)?
                .into_iter()
                .map(|address| AddressDocument {
                    path: address.path,
                    address: address.encoded_address,
                })
                .collect();

            Ok(ChainDocument {
                path: chain.path().to_string(),
                addresses,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AccountDocument { chains })
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first_address = self
            .address()
            .map(|a| redact_address(&a.encoded_address))
            .unwrap_or_default();

        f.debug_struct("Wallet")
            .field("seed", &self.seed)
            .field("mnemonic", &self.mnemonic)
            .field("network", &self.network)
            .field("accounts", &self.accounts.len())
            .field("address", &first_address)
            .finish()
    }
}
