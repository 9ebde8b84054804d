//! 统一错误类型
//!
//! 按关注点划分：种子编解码、密钥派生、加密、钱包文件校验，
//! 以及对外暴露的汇总错误 `WalletError`。每个错误都有稳定的机器码（`code()`），
//! 供渲染层给出精确诊断。

use std::path::PathBuf;

use thiserror::Error;

/// 种子 / 助记词编解码错误（输入校验类，不重试）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("invalid entropy length: {len} bytes (expected 16, 20, 24, 28 or 32)")]
    InvalidEntropyLength { len: usize },

    #[error("invalid mnemonic word count: {count} (expected 12, 15, 18, 21 or 24)")]
    InvalidWordCount { count: usize },

    #[error("unknown mnemonic word: '{word}'")]
    UnknownWord { word: String },

    #[error("mnemonic checksum mismatch")]
    ChecksumMismatch,
}

impl SeedError {
    pub fn code(&self) -> &'static str {
        match self {
            SeedError::InvalidEntropyLength { .. } => "invalid_entropy_length",
            SeedError::InvalidWordCount { .. } => "invalid_word_count",
            SeedError::UnknownWord { .. } => "unknown_word",
            SeedError::ChecksumMismatch => "checksum_mismatch",
        }
    }
}

/// 分层确定性派生错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(String),

    #[error("hardened derivation at index {index} requires a private key")]
    HardenedDerivationRequiresPrivateKey { index: u32 },

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),
}

impl DerivationError {
    pub fn code(&self) -> &'static str {
        match self {
            DerivationError::InvalidExtendedKey(_) => "invalid_extended_key",
            DerivationError::HardenedDerivationRequiresPrivateKey { .. } => {
                "hardened_derivation_requires_private_key"
            }
            DerivationError::KeyDerivation(_) => "key_derivation_failed",
            DerivationError::InvalidPath(_) => "invalid_path",
        }
    }
}

/// 种子加解密错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// 密码器初始化失败，属于致命错误
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// 去填充失败，通常意味着密码错误或 IV 不匹配
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("invalid base64 data: {0}")]
    InvalidBase64(String),

    /// 系统随机源不可用，属于致命错误
    #[error("secure randomness unavailable: {0}")]
    RandomnessUnavailable(String),
}

impl CryptoError {
    pub fn code(&self) -> &'static str {
        match self {
            CryptoError::EncryptionFailed(_) => "encryption_failed",
            CryptoError::DecryptionFailed => "decryption_failed",
            CryptoError::InvalidBase64(_) => "invalid_base64",
            CryptoError::RandomnessUnavailable(_) => "randomness_unavailable",
        }
    }
}

/// 钱包文件校验的拒绝原因
///
/// 校验在第一个失败处短路，每个变体对应一个可区分的拒绝原因。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("wallet document is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("property 'version' missing in wallet document")]
    MissingVersion,

    #[error("unsupported wallet version: expected {expected}, found {found}")]
    UnsupportedVersion { expected: String, found: String },

    #[error("property '{0}' missing in wallet document")]
    MissingField(String),

    #[error("property '{0}' has an unexpected type")]
    InvalidField(String),

    #[error("unexpected amount of accounts: expected 1, found {found}")]
    UnexpectedAccountCount { found: usize },

    #[error("unexpected amount of chains: expected 2, found {found}")]
    UnexpectedChainCount { found: usize },

    #[error("seed could not be decoded: {0}")]
    SeedDecodeFailed(String),

    #[error("unexpected chain path: expected '{receive}' or '{change}', found '{found}'")]
    UnexpectedChainPath {
        receive: String,
        change: String,
        found: String,
    },

    #[error("chain path '{path}' missing in wallet document")]
    ChainPathMissing { path: String },

    #[error("unexpected amount of addresses in chain '{chain_path}': expected 2, found {found}")]
    UnexpectedAddressCount { chain_path: String, found: usize },

    #[error("malformed address path in chain '{chain_path}': '{found}'")]
    MalformedAddressPath { chain_path: String, found: String },

    #[error(
        "address mismatch: expected {expected_path} {expected_address}, found {found_path} {found_address}"
    )]
    AddressMismatch {
        expected_path: String,
        expected_address: String,
        found_path: String,
        found_address: String,
    },

    #[error("failed to rebuild wallet tree: {0}")]
    Derivation(#[from] DerivationError),
}

impl VerificationError {
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::MalformedJson(_) => "malformed_json",
            VerificationError::MissingVersion => "missing_version",
            VerificationError::UnsupportedVersion { .. } => "unsupported_version",
            VerificationError::MissingField(_) => "missing_field",
            VerificationError::InvalidField(_) => "invalid_field",
            VerificationError::UnexpectedAccountCount { .. } => "unexpected_account_count",
            VerificationError::UnexpectedChainCount { .. } => "unexpected_chain_count",
            VerificationError::SeedDecodeFailed(_) => "seed_decode_failed",
            VerificationError::UnexpectedChainPath { .. } => "unexpected_chain_path",
            VerificationError::ChainPathMissing { .. } => "chain_path_missing",
            VerificationError::UnexpectedAddressCount { .. } => "unexpected_address_count",
            VerificationError::MalformedAddressPath { .. } => "malformed_address_path",
            VerificationError::AddressMismatch { .. } => "address_mismatch",
            VerificationError::Derivation(_) => "derivation_failed",
        }
    }
}

/// 钱包层汇总错误
#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("operation requires a wallet with a seed (watch-only wallet given)")]
    WatchOnly,

    #[error("wallet file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("empty wallet file {0:?}")]
    EmptyFile(PathBuf),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl WalletError {
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::Seed(e) => e.code(),
            WalletError::Derivation(e) => e.code(),
            WalletError::Crypto(e) => e.code(),
            WalletError::Verification(e) => e.code(),
            WalletError::WatchOnly => "watch_only",
            WalletError::Io { .. } => "io_error",
            WalletError::EmptyFile(_) => "empty_file",
            WalletError::Json(_) => "json_error",
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct_per_reason() {
        let reasons = vec![
            VerificationError::MissingVersion,
            VerificationError::UnsupportedVersion {
                expected: "1.0".into(),
                found: "0.1".into(),
            },
            VerificationError::MissingField("seed".into()),
            VerificationError::SeedDecodeFailed("bad padding".into()),
            VerificationError::ChainPathMissing {
                path: "M/44H/0H/0H/1".into(),
            },
        ];

        let mut codes: Vec<&str> = reasons.iter().map(|r| r.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), reasons.len());
    }

    #[test]
    fn test_wallet_error_delegates_code() {
        let err: WalletError = SeedError::ChecksumMismatch.into();
        assert_eq!(err.code(), "checksum_mismatch");

        let crypto: WalletError = CryptoError::RandomnessUnavailable("no entropy".into()).into();
        assert_eq!(crypto.code(), "randomness_unavailable");
    }
}
