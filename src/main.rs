//! PaperWallet 命令行入口
//!
//! ```text
//! paperwallet new [words]
//! paperwallet restore <mnemonic | base64 seed | xpub[:xpub...]>
//! paperwallet verify <file>
//! ```
//!
//! 存储密码从 `PAPERWALLET_PASSPHRASE` 读取。日志写 stderr，钱包内容写 stdout。

use anyhow::{Context, Result};
use paperwallet::{
    config::Config,
    domain::{Verdict, Wallet},
    infrastructure::logging::init_logging,
    service::WalletFactory,
};

const USAGE: &str = "usage: paperwallet new [words] | restore <data> | verify <file>";

fn main() -> Result<()> {
    // 1. 加载环境变量
    dotenvy::dotenv().ok();

    // 2. 加载配置（CONFIG_PATH 指向的 TOML 文件优先）
    let config = Config::from_env_and_file(std::env::var("CONFIG_PATH").ok())?;
    config.validate().context("Invalid configuration")?;

    // 3. 初始化日志
    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let passphrase = std::env::var("PAPERWALLET_PASSPHRASE").unwrap_or_default();
    let mut factory = WalletFactory::from_config(&config.wallet)?;
    tracing::debug!(network = %factory.network(), "wallet factory ready");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("new") => {
            let words = match args.get(1) {
                Some(w) => w
                    .parse()
                    .with_context(|| format!("Invalid word count: {}", w))?,
                None => config.wallet.word_count,
            };
            factory.new_wallet(words, &passphrase)?;
            save_current(&mut factory, &config)?;
        }
        Some("restore") => {
            let data = args[1..].join(" ");
            if data.trim().is_empty() {
                anyhow::bail!(USAGE);
            }
            let watch_only = factory.restore_wallet(&data, &passphrase)?.is_watch_only();
            if watch_only {
                if let Some(wallet) = factory.watch_only_wallet() {
                    print_wallet(wallet)?;
                }
            } else {
                save_current(&mut factory, &config)?;
            }
        }
        Some("verify") => {
            let file = args.get(1).context(USAGE)?;
            match factory.verify_file(file, &passphrase)? {
                Verdict::Verified => println!("OK"),
                Verdict::Rejected(reason) => {
                    println!("ERROR [{}]: {}", reason.code(), reason);
                    std::process::exit(1);
                }
            }
        }
        _ => anyhow::bail!(USAGE),
    }

    Ok(())
}

fn save_current(factory: &mut WalletFactory, config: &Config) -> Result<()> {
    let dir = config.wallet.output_dir();
    let path = factory
        .save(&dir)
        .with_context(|| format!("Failed to write wallet file into {:?}", dir))?;

    print_wallet(factory.get()?)?;
    println!("file: {}", path.display());
    Ok(())
}

fn print_wallet(wallet: &Wallet) -> Result<()> {
    println!("address: {}", wallet.address()?.encoded_address);
    if let Some(mnemonic) = wallet.mnemonic() {
        println!("mnemonic: {}", mnemonic);
    }
    for account in wallet.accounts() {
        println!("xpub {}: {}", account.path(), account.xpub());
    }
    println!("{}", wallet.file_content()?);
    Ok(())
}
