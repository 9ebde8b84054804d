//! Domain 模块
//!
//! 种子编解码、BIP44 派生树、钱包文件格式与完整性校验

pub mod derivation;
pub mod derivation_path;
pub mod seed_codec;
pub mod verifier;
pub mod wallet;
pub mod wallet_document;

// 重新导出常用类型
pub use derivation::{Account, Address, Chain, DerivationKey};
pub use derivation_path::{AddressPath, ChainKind};
pub use seed_codec::{MnemonicWords, Seed};
pub use verifier::{Verdict, WalletVerifier};
pub use wallet::Wallet;
pub use wallet_document::WalletDocument;
