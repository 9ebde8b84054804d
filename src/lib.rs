//! PaperWallet - BIP44 比特币纸钱包核心
//!
//! 种子与助记词互转、固定路径的分层确定性派生、加密种子的钱包文件、
//! 以及从种子重建派生树逐项比对的完整性校验。

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod service;
pub mod utils;

// 重新导出常用类型
pub use error::{WalletError, WalletResult};

// 统一模块导出
pub mod prelude {
    pub use crate::{
        config::Config,
        domain::{Account, Address, Chain, MnemonicWords, Seed, Verdict, Wallet, WalletVerifier},
        error::{
            CryptoError, DerivationError, SeedError, VerificationError, WalletError, WalletResult,
        },
        service::WalletFactory,
    };
}
