pub mod wallet_factory;

pub use wallet_factory::{RestoreInput, WalletFactory};
