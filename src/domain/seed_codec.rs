//! 种子编解码
//!
//! 原始熵 ⇄ BIP39 助记词 ⇄ 512位派生种子。词表运算委托给 `bip39`，
//! 熵长度校验策略由本模块负责。

use std::fmt;

use bip39::{Language, Mnemonic};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::SeedError;
use crate::infrastructure::log_redact::{redact_hex_string, redact_mnemonic, SensitiveRedact};

/// 允许的熵字节长度（128/160/192/224/256 位）
pub const ENTROPY_LENGTHS: [usize; 5] = [16, 20, 24, 28, 32];
/// 允许的助记词数量
pub const WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// 原始熵（钱包种子），构造后不可变，释放时清零
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed(Vec<u8>);

impl Seed {
    /// 校验长度后构造
    pub fn new(bytes: Vec<u8>) -> Result<Self, SeedError> {
        if !ENTROPY_LENGTHS.contains(&bytes.len()) {
            return Err(SeedError::InvalidEntropyLength { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.redact())
    }
}

impl SensitiveRedact for Seed {
    fn redact(&self) -> String {
        redact_hex_string(&self.to_hex(), 4)
    }
}

/// 助记词序列（小写英文词）
#[derive(Clone, PartialEq, Eq)]
pub struct MnemonicWords(Vec<String>);

impl MnemonicWords {
    /// 按空白切分助记词文本，只检查词数
    pub fn parse(phrase: &str) -> Result<Self, SeedError> {
        let words: Vec<String> = phrase.split_whitespace().map(str::to_string).collect();
        Self::from_words(words)
    }

    pub fn from_words(words: Vec<String>) -> Result<Self, SeedError> {
        if !WORD_COUNTS.contains(&words.len()) {
            return Err(SeedError::InvalidWordCount { count: words.len() });
        }
        Ok(Self(words))
    }

    pub fn words(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 空格分隔的助记词文本
    pub fn phrase(&self) -> String {
        self.0.join(" ")
    }
}

impl fmt::Display for MnemonicWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase())
    }
}

impl fmt::Debug for MnemonicWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MnemonicWords({})", self.redact())
    }
}

impl SensitiveRedact for MnemonicWords {
    fn redact(&self) -> String {
        redact_mnemonic(&self.0)
    }
}

impl Drop for MnemonicWords {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// 熵 → 助记词
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<MnemonicWords, SeedError> {
    if !ENTROPY_LENGTHS.contains(&entropy.len()) {
        return Err(SeedError::InvalidEntropyLength { len: entropy.len() });
    }

    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| map_bip39_error(e, &[]))?;
    MnemonicWords::parse(&mnemonic.to_string())
}

/// 助记词 → 熵
pub fn mnemonic_to_entropy(words: &MnemonicWords) -> Result<Seed, SeedError> {
    let mnemonic = parse_mnemonic(words)?;
    Seed::new(mnemonic.to_entropy())
}

/// 助记词 + BIP39 密码 → 512位派生种子
pub fn mnemonic_to_seed_bytes(
    words: &MnemonicWords,
    bip39_passphrase: &str,
) -> Result<[u8; 64], SeedError> {
    let mnemonic = parse_mnemonic(words)?;
    Ok(mnemonic.to_seed(bip39_passphrase))
}

fn parse_mnemonic(words: &MnemonicWords) -> Result<Mnemonic, SeedError> {
    Mnemonic::parse_in(Language::English, words.phrase())
        .map_err(|e| map_bip39_error(e, words.words()))
}

fn map_bip39_error(err: bip39::Error, words: &[String]) -> SeedError {
    match err {
        bip39::Error::BadWordCount(count) => SeedError::InvalidWordCount { count },
        bip39::Error::UnknownWord(idx) => SeedError::UnknownWord {
            word: words.get(idx).cloned().unwrap_or_default(),
        },
        bip39::Error::BadEntropyBitCount(bits) => SeedError::InvalidEntropyLength { len: bits / 8 },
        bip39::Error::InvalidChecksum => SeedError::ChecksumMismatch,
        // 仅英文词表，语言歧义不会出现
        _ => SeedError::ChecksumMismatch,
    }
}
