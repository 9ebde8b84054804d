//! 钱包工厂（会话对象）
//!
//! 持有一个"当前钱包"和一个"观察钱包"，提供创建、恢复、校验、保存入口。
//! 不是全局单例：每个会话显式构造自己的工厂；并发宿主应为每个会话加一把锁。

use std::path::{Path, PathBuf};

use bitcoin::Network;
use rand::{rngs::OsRng, RngCore};
use tracing::info;
use zeroize::Zeroizing;

use crate::config::WalletConfig;
use crate::domain::seed_codec::{MnemonicWords, WORD_COUNTS};
use crate::domain::verifier::{Verdict, WalletVerifier};
use crate::domain::wallet::Wallet;
use crate::error::{CryptoError, WalletError, WalletResult};
use crate::infrastructure::encryption::base64_to_bytes;
use crate::infrastructure::log_redact::redact_address;
use crate::utils::string_utils::{
    is_blank, looks_like_base64, looks_like_xpub, normalize_mnemonic, split_xpubs,
};

/// 默认助记词长度
pub const DEFAULT_WORD_COUNT: usize = 12;

/// 助记词长度对应的熵字节数：每3个词4字节
pub fn entropy_length_for(word_count: usize) -> usize {
    let words = if WORD_COUNTS.contains(&word_count) {
        word_count
    } else {
        DEFAULT_WORD_COUNT
    };
    words / 3 * 4
}

/// 恢复输入的类型，按优先级识别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreInput {
    ExtendedPublicKeys,
    Base64Seed,
    MnemonicWords,
}

impl RestoreInput {
    pub fn detect(data: &str) -> Self {
        if looks_like_xpub(data) {
            RestoreInput::ExtendedPublicKeys
        } else if looks_like_base64(data) {
            RestoreInput::Base64Seed
        } else {
            RestoreInput::MnemonicWords
        }
    }
}

pub struct WalletFactory {
    network: Network,
    current: Option<Wallet>,
    watch_only: Option<Wallet>,
}

impl WalletFactory {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            current: None,
            watch_only: None,
        }
    }

    pub fn from_config(config: &WalletConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.network()?))
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// 用系统安全随机源生成新钱包，替换当前钱包
    ///
    /// 不支持的助记词长度回退为12。
    pub fn new_wallet(&mut self, word_count: usize, passphrase: &str) -> WalletResult<&Wallet> {
        let wallet = self.generate_wallet(word_count, passphrase)?;
        Ok(self.set(wallet))
    }

    fn generate_wallet(&self, word_count: usize, passphrase: &str) -> WalletResult<Wallet> {
        let mut entropy = Zeroizing::new(vec![0u8; entropy_length_for(word_count)]);
        OsRng
            .try_fill_bytes(entropy.as_mut_slice())
            .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;

        let wallet = Wallet::from_entropy(entropy.as_slice(), passphrase, self.network)?;
        info!(
            words = entropy.len() / 4 * 3,
            address = %first_address(&wallet),
            "new wallet created"
        );
        Ok(wallet)
    }

    /// 从字符串恢复：扩展公钥列表 / Base64 种子 / 助记词
    ///
    /// 扩展公钥恢复出的观察钱包放入观察钱包槽位，其余替换当前钱包。
    pub fn restore_wallet(&mut self, data: &str, passphrase: &str) -> WalletResult<&Wallet> {
        let kind = RestoreInput::detect(data);

        let wallet = match kind {
            RestoreInput::ExtendedPublicKeys => {
                let xpubs = split_xpubs(data);
                let wallet = Wallet::watch_only(xpubs.as_slice(), self.network)?;
                info!(accounts = xpubs.len(), "watch-only wallet restored");
                return Ok(self.set_watch_only_wallet(wallet));
            }
            RestoreInput::Base64Seed => {
                let seed = Zeroizing::new(base64_to_bytes(data.trim())?);
                Wallet::from_entropy(seed.as_slice(), passphrase, self.network)?
            }
            RestoreInput::MnemonicWords => {
                let words = MnemonicWords::parse(&normalize_mnemonic(data))?;
                Wallet::from_mnemonic(&words, passphrase, self.network)?
            }
        };

        info!(input = ?kind, address = %first_address(&wallet), "wallet restored");
        Ok(self.set(wallet))
    }

    /// 从钱包文件文本恢复（先完整校验）
    pub fn restore_from_json(&mut self, json: &str, passphrase: &str) -> WalletResult<&Wallet> {
        let wallet = Wallet::from_json(json, passphrase, self.network)?;
        info!(address = %first_address(&wallet), "wallet restored from document");
        Ok(self.set(wallet))
    }

    /// 读取钱包文件并恢复，空文件直接拒绝
    pub fn restore_from_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        passphrase: &str,
    ) -> WalletResult<&Wallet> {
        let content = read_wallet_file(path.as_ref())?;
        self.restore_from_json(&content, passphrase)
    }

    /// 只校验钱包文件，不改变当前钱包
    pub fn verify_file<P: AsRef<Path>>(&self, path: P, passphrase: &str) -> WalletResult<Verdict> {
        let content = read_wallet_file(path.as_ref())?;
        Ok(WalletVerifier::new(self.network).check(&content, passphrase))
    }

    /// 当前钱包；没有时创建一个默认的12词钱包（空密码）
    pub fn get(&mut self) -> WalletResult<&Wallet> {
        let wallet = match self.current.take() {
            Some(wallet) => wallet,
            None => self.generate_wallet(DEFAULT_WORD_COUNT, "")?,
        };
        Ok(self.current.insert(wallet))
    }

    /// 当前钱包（不自动创建）
    pub fn current(&self) -> Option<&Wallet> {
        self.current.as_ref()
    }

    /// 替换当前钱包，旧钱包被丢弃
    pub fn set(&mut self, wallet: Wallet) -> &Wallet {
        self.current.insert(wallet)
    }

    pub fn watch_only_wallet(&self) -> Option<&Wallet> {
        self.watch_only.as_ref()
    }

    pub fn set_watch_only_wallet(&mut self, wallet: Wallet) -> &Wallet {
        self.watch_only.insert(wallet)
    }

    /// 把当前钱包写入 `dir/<地址>.json`，返回文件路径
    pub fn save<P: AsRef<Path>>(&mut self, dir: P) -> WalletResult<PathBuf> {
        let wallet = self.get()?;
        if wallet.is_watch_only() {
            return Err(WalletError::WatchOnly);
        }

        let path = dir.as_ref().join(wallet.file_name()?);
        let content = wallet.file_content()?;
        std::fs::write(&path, content).map_err(|source| WalletError::Io {
            path: path.clone(),
            source,
        })?;

        info!(file = ?path, "wallet file written");
        Ok(path)
    }
}

fn read_wallet_file(path: &Path) -> WalletResult<String> {
    let content = std::fs::read_to_string(path).map_err(|source| WalletError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if is_blank(&content) {
        return Err(WalletError::EmptyFile(path.to_path_buf()));
    }
    Ok(content)
}

fn first_address(wallet: &Wallet) -> String {
    wallet
        .address()
        .map(|a| redact_address(&a.encoded_address))
        .unwrap_or_default()
}
