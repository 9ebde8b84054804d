//! 测试辅助模块
//! 已知答案向量与钱包文件工具

#![allow(dead_code)]

use std::path::PathBuf;

pub const WALLET_PASS_PHRASE: &str = "test pass phrase";
pub const WALLET_SEED: &str = "08c9339ae31e2efdb1c727fd0a01f357";
pub const WALLET_MNEMONIC: &str =
    "angle end trade shiver title learn shove top wonder exotic lamp puppy";
pub const FIRST_ADDRESS: &str = "1FteBgh6KQ3Bnv4SSx8r2oLE198uExs5Te";

/// 已知合法的钱包文件（用 `WALLET_PASS_PHRASE` 加密）
pub const WALLET_JSON: &str = r#"{"seed":"dQYSjX6+aGmzn7AhDZhNJnIx8rvjfttgCQL0khMums4=","accounts":[{"chains":[{"path":"M/44H/0H/0H/0","addresses":[{"path":"M/44H/0H/0H/0/0","address":"1FteBgh6KQ3Bnv4SSx8r2oLE198uExs5Te"},{"path":"M/44H/0H/0H/0/1","address":"1JcGxWyYoqnU9DHGnt8RsKYyz738bKvydU"}]},{"path":"M/44H/0H/0H/1","addresses":[{"path":"M/44H/0H/0H/1/0","address":"1JcUxdTcE5UcCCFAv2QwoVPqWNFxo6VB57"},{"path":"M/44H/0H/0H/1/1","address":"18gXGiQ2dfCVTFioJp35bTANjzmVczyyHA"}]}]}],"version":"1.0","iv":"7RFrnKNxd+xIUlFYK05cMw=="}"#;

/// 以 JSON 值的形式修改已知钱包文件
pub fn tampered<F: FnOnce(&mut serde_json::Value)>(edit: F) -> String {
    let mut doc: serde_json::Value = serde_json::from_str(WALLET_JSON).expect("valid fixture");
    edit(&mut doc);
    doc.to_string()
}

/// 在临时目录中写入钱包文件
pub fn write_wallet_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write wallet file");
    path
}
