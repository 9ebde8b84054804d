//! 钱包文件完整性校验
//!
//! 按固定顺序检查，第一个失败即短路并返回对应的拒绝原因：
//!
//! 1. JSON 可解析
//! 2. `version` 存在且为 "1.0"
//! 3. `seed` / `iv` / `accounts` 存在
//! 4. 恰好1个账户
//! 5. 解密并解码种子，重建派生树
//! 6. 账户内恰好2条链，链路径与重建的收款链/找零链一一对应
//! 7. 每条链恰好2个地址，路径以链路径开头、分别以 /0 和 /1 结尾
//! 8. 地址与路径都与重建结果一致

use bitcoin::Network;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::derivation::{Account, Chain};
use crate::domain::derivation_path::{AddressPath, ChainKind};
use crate::domain::wallet::Wallet;
use crate::domain::wallet_document::{
    ADDRESSES_PER_CHAIN, JSON_ACCOUNTS, JSON_ADDRESS, JSON_ADDRESSES, JSON_CHAINS, JSON_IV,
    JSON_PATH, JSON_SEED, JSON_VERSION, WALLET_VERSION,
};
use crate::error::{DerivationError, VerificationError, WalletError};
use crate::infrastructure::encryption::open_seed;
use crate::infrastructure::log_redact::redact_address;

const EXPECTED_ACCOUNTS: usize = 1;
const EXPECTED_CHAINS: usize = 2;

/// 校验结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Verified,
    Rejected(VerificationError),
}

impl Verdict {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verdict::Verified)
    }

    /// 拒绝原因的机器码
    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Verified => "verified",
            Verdict::Rejected(reason) => reason.code(),
        }
    }
}

/// 无状态校验器，可在多个线程中并发使用
#[derive(Debug, Clone, Copy)]
pub struct WalletVerifier {
    network: Network,
}

impl WalletVerifier {
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    /// 校验钱包文件文本，成功时返回重建的钱包
    pub fn verify(&self, json: &str, passphrase: &str) -> Result<Wallet, VerificationError> {
        let result = serde_json::from_str::<Value>(json)
            .map_err(|e| VerificationError::MalformedJson(e.to_string()))
            .and_then(|document| self.verify_document(&document, passphrase));

        match &result {
            Ok(wallet) => {
                let first = wallet
                    .address()
                    .map(|a| redact_address(&a.encoded_address))
                    .unwrap_or_default();
                info!(address = %first, "wallet document verified");
            }
            Err(reason) => {
                warn!(code = reason.code(), "wallet document rejected: {}", reason);
            }
        }

        result
    }

    /// 只返回结论
    pub fn check(&self, json: &str, passphrase: &str) -> Verdict {
        match self.verify(json, passphrase) {
            Ok(_) => Verdict::Verified,
            Err(reason) => Verdict::Rejected(reason),
        }
    }

    /// 校验已解析的 JSON 值
    pub fn verify_document(
        &self,
        document: &Value,
        passphrase: &str,
    ) -> Result<Wallet, VerificationError> {
        let root = document.as_object().ok_or_else(|| {
            VerificationError::MalformedJson("top-level value is not an object".into())
        })?;

        // 版本
        let version = root
            .get(JSON_VERSION)
            .ok_or(VerificationError::MissingVersion)?;
        if version.as_str() != Some(WALLET_VERSION) {
            let found = match version.as_str() {
                Some(text) => text.to_string(),
                None => version.to_string(),
            };
            return Err(VerificationError::UnsupportedVersion {
                expected: WALLET_VERSION.to_string(),
                found,
            });
        }

        // 必需字段
        let seed_field = required_str(root, JSON_SEED)?;
        let iv_field = required_str(root, JSON_IV)?;
        let accounts = required_array(root, JSON_ACCOUNTS)?;

        if accounts.len() != EXPECTED_ACCOUNTS {
            return Err(VerificationError::UnexpectedAccountCount {
                found: accounts.len(),
            });
        }
        let account_doc = accounts[0]
            .as_object()
            .ok_or_else(|| VerificationError::InvalidField(JSON_ACCOUNTS.into()))?;

        // 种子
        let seed = Zeroizing::new(
            open_seed(seed_field, iv_field, passphrase)
                .map_err(|e| VerificationError::SeedDecodeFailed(e.to_string()))?,
        );
        let wallet =
            Wallet::from_entropy(seed.as_slice(), passphrase, self.network).map_err(rebuild_error)?;

        let account = wallet.account(0).ok_or_else(|| {
            DerivationError::KeyDerivation("wallet has no accounts".into())
        })?;
        verify_chains(account, account_doc)?;

        Ok(wallet)
    }
}

fn verify_chains(
    account: &Account,
    account_doc: &Map<String, Value>,
) -> Result<(), VerificationError> {
    let chains = required_array(account_doc, JSON_CHAINS)?;
    if chains.len() != EXPECTED_CHAINS {
        return Err(VerificationError::UnexpectedChainCount {
            found: chains.len(),
        });
    }

    let receive_path = account.receive().path();
    let change_path = account.change().path();
    let mut seen: Vec<ChainKind> = Vec::with_capacity(EXPECTED_CHAINS);

    for chain_value in chains {
        let chain_doc = chain_value
            .as_object()
            .ok_or_else(|| VerificationError::InvalidField(JSON_CHAINS.into()))?;
        let path = required_str(chain_doc, JSON_PATH)?;

        let kind = ChainKind::ALL
            .into_iter()
            .find(|kind| account.chain(*kind).path() == path)
            .ok_or_else(|| VerificationError::UnexpectedChainPath {
                receive: receive_path.to_string(),
                change: change_path.to_string(),
                found: path.to_string(),
            })?;

        // 重复的链路径意味着另一条链缺失
        if seen.contains(&kind) {
            let missing = if kind.is_receive() {
                change_path
            } else {
                receive_path
            };
            return Err(VerificationError::ChainPathMissing {
                path: missing.to_string(),
            });
        }
        seen.push(kind);

        verify_addresses(account.chain(kind), chain_doc)?;
    }

    if let Some(kind) = ChainKind::ALL.into_iter().find(|k| !seen.contains(k)) {
        return Err(VerificationError::ChainPathMissing {
            path: account.chain(kind).path().to_string(),
        });
    }

    Ok(())
}

fn verify_addresses(chain: &Chain, chain_doc: &Map<String, Value>) -> Result<(), VerificationError> {
    let chain_path = chain.path();
    let addresses = required_array(chain_doc, JSON_ADDRESSES)?;

    if addresses.len() != ADDRESSES_PER_CHAIN as usize {
        return Err(VerificationError::UnexpectedAddressCount {
            chain_path: chain_path.to_string(),
            found: addresses.len(),
        });
    }

    let mut seen = [false; ADDRESSES_PER_CHAIN as usize];

    for address_value in addresses {
        let address_doc = address_value
            .as_object()
            .ok_or_else(|| VerificationError::InvalidField(JSON_ADDRESSES.into()))?;
        let path = required_str(address_doc, JSON_PATH)?;
        let malformed = || VerificationError::MalformedAddressPath {
            chain_path: chain_path.to_string(),
            found: path.to_string(),
        };

        if !path.starts_with(chain_path) {
            return Err(malformed());
        }
        let parsed: AddressPath = path.parse().map_err(|_| malformed())?;
        if parsed.chain != chain.kind() || parsed.index >= ADDRESSES_PER_CHAIN {
            return Err(malformed());
        }
        let slot = parsed.index as usize;
        if seen[slot] {
            return Err(malformed());
        }
        seen[slot] = true;

        let found_address = required_str(address_doc, JSON_ADDRESS)?;
        let expected = chain.address_at(parsed.index)?;
        if expected.encoded_address != found_address || expected.path != path {
            return Err(VerificationError::AddressMismatch {
                expected_path: expected.path,
                expected_address: expected.encoded_address,
                found_path: path.to_string(),
                found_address: found_address.to_string(),
            });
        }

        debug!(path = %path, "address verified");
    }

    Ok(())
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, VerificationError> {
    object
        .get(field)
        .ok_or_else(|| VerificationError::MissingField(field.to_string()))?
        .as_str()
        .ok_or_else(|| VerificationError::InvalidField(field.to_string()))
}

fn required_array<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Vec<Value>, VerificationError> {
    object
        .get(field)
        .ok_or_else(|| VerificationError::MissingField(field.to_string()))?
        .as_array()
        .ok_or_else(|| VerificationError::InvalidField(field.to_string()))
}

/// 重建失败：种子本身无效归为解码失败，其余为派生失败
fn rebuild_error(err: WalletError) -> VerificationError {
    match err {
        WalletError::Derivation(e) => VerificationError::Derivation(e),
        other => VerificationError::SeedDecodeFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET_PASS_PHRASE: &str = "test pass phrase";
    const WALLET_SEED: &str = "08c9339ae31e2efdb1c727fd0a01f357";

    fn document() -> Value {
        serde_json::json!({
            "seed": "dQYSjX6+aGmzn7AhDZhNJnIx8rvjfttgCQL0khMums4=",
            "accounts": [{
                "chains": [
                    {
                        "path": "M/44H/0H/0H/0",
                        "addresses": [
                            {"path": "M/44H/0H/0H/0/0", "address": "1FteBgh6KQ3Bnv4SSx8r2oLE198uExs5Te"},
                            {"path": "M/44H/0H/0H/0/1", "address": "1JcGxWyYoqnU9DHGnt8RsKYyz738bKvydU"}
                        ]
                    },
                    {
                        "path": "M/44H/0H/0H/1",
                        "addresses": [
                            {"path": "M/44H/0H/0H/1/0", "address": "1JcUxdTcE5UcCCFAv2QwoVPqWNFxo6VB57"},
                            {"path": "M/44H/0H/0H/1/1", "address": "18gXGiQ2dfCVTFioJp35bTANjzmVczyyHA"}
                        ]
                    }
                ]
            }],
            "version": "1.0",
            "iv": "7RFrnKNxd+xIUlFYK05cMw=="
        })
    }

    fn verify(doc: &Value) -> Result<Wallet, VerificationError> {
        WalletVerifier::new(Network::Bitcoin).verify_document(doc, WALLET_PASS_PHRASE)
    }

    #[test]
    fn test_known_document_verifies() {
        let wallet = verify(&document()).unwrap();
        assert_eq!(wallet.seed_hex().unwrap(), WALLET_SEED);
    }

    #[test]
    fn test_check_returns_verdict() {
        let verifier = WalletVerifier::new(Network::Bitcoin);
        let json = document().to_string();

        assert_eq!(verifier.check(&json, WALLET_PASS_PHRASE), Verdict::Verified);
        assert!(verifier.check(&json, WALLET_PASS_PHRASE).is_verified());
        assert_eq!(verifier.check("{", WALLET_PASS_PHRASE).code(), "malformed_json");
    }

    #[test]
    fn test_version_rules() {
        let mut doc = document();
        doc.as_object_mut().unwrap().remove("version");
        assert_eq!(verify(&doc).unwrap_err(), VerificationError::MissingVersion);

        let mut doc = document();
        doc["version"] = "0.1".into();
        assert!(matches!(
            verify(&doc).unwrap_err(),
            VerificationError::UnsupportedVersion { found, .. } if found == "0.1"
        ));

        let mut doc = document();
        doc["version"] = serde_json::json!(1.0);
        assert_eq!(verify(&doc).unwrap_err().code(), "unsupported_version");
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        for field in ["seed", "iv", "accounts"] {
            let mut doc = document();
            doc.as_object_mut().unwrap().remove(field);
            assert_eq!(
                verify(&doc).unwrap_err(),
                VerificationError::MissingField(field.to_string())
            );
        }

        let mut doc = document();
        doc["seed"] = serde_json::json!(42);
        assert_eq!(
            verify(&doc).unwrap_err(),
            VerificationError::InvalidField("seed".into())
        );

        let mut doc = document();
        doc["accounts"][0].as_object_mut().unwrap().remove("chains");
        assert_eq!(
            verify(&doc).unwrap_err(),
            VerificationError::MissingField("chains".into())
        );
    }

    #[test]
    fn test_cardinality_rules() {
        let mut doc = document();
        let account = doc["accounts"][0].clone();
        doc["accounts"].as_array_mut().unwrap().push(account);
        assert_eq!(
            verify(&doc).unwrap_err(),
            VerificationError::UnexpectedAccountCount { found: 2 }
        );

        let mut doc = document();
        doc["accounts"][0]["chains"].as_array_mut().unwrap().pop();
        assert_eq!(
            verify(&doc).unwrap_err(),
            VerificationError::UnexpectedChainCount { found: 1 }
        );

        let mut doc = document();
        doc["accounts"][0]["chains"][1]["addresses"]
            .as_array_mut()
            .unwrap()
            .pop();
        assert_eq!(verify(&doc).unwrap_err().code(), "unexpected_address_count");
    }

    #[test]
    fn test_seed_decode_failures() {
        let mut doc = document();
        doc["iv"] = "AAAA".into();
        assert_eq!(verify(&doc).unwrap_err().code(), "seed_decode_failed");

        let mut doc = document();
        doc["seed"] = "not base64 at all!".into();
        assert_eq!(verify(&doc).unwrap_err().code(), "seed_decode_failed");
    }

    #[test]
    fn test_tree_rebuild_failures_are_not_seed_failures() {
        let missing = DerivationError::KeyDerivation("wallet has no accounts".into());
        assert_eq!(VerificationError::from(missing).code(), "derivation_failed");

        let err = rebuild_error(WalletError::Derivation(DerivationError::KeyDerivation(
            "bad child".into(),
        )));
        assert_eq!(err.code(), "derivation_failed");
    }

    #[test]
    fn test_chain_path_rules() {
        let mut doc = document();
        doc["accounts"][0]["chains"][1]["path"] = "M/44H/0H/0H/2".into();
        assert!(matches!(
            verify(&doc).unwrap_err(),
            VerificationError::UnexpectedChainPath { found, .. } if found == "M/44H/0H/0H/2"
        ));

        let mut doc = document();
        let receive = doc["accounts"][0]["chains"][0].clone();
        doc["accounts"][0]["chains"][1] = receive;
        assert_eq!(
            verify(&doc).unwrap_err(),
            VerificationError::ChainPathMissing {
                path: "M/44H/0H/0H/1".into()
            }
        );
    }

    #[test]
    fn test_seed_is_decoded_before_chains_are_checked() {
        let verifier = WalletVerifier::new(Network::Bitcoin);

        let mut doc = document();
        doc["accounts"][0]["chains"].as_array_mut().unwrap().pop();
        let err = verifier.verify_document(&doc, "wrong pass phrase").unwrap_err();
        assert_eq!(err.code(), "seed_decode_failed");

        let mut doc = document();
        doc["accounts"][0].as_object_mut().unwrap().remove("chains");
        let err = verifier.verify_document(&doc, "wrong pass phrase").unwrap_err();
        assert_eq!(err.code(), "seed_decode_failed");
    }

    #[test]
    fn test_chain_order_does_not_matter() {
        let mut doc = document();
        doc["accounts"][0]["chains"].as_array_mut().unwrap().reverse();
        assert!(verify(&doc).is_ok());
    }

    #[test]
    fn test_address_path_rules() {
        let mut doc = document();
        doc["accounts"][0]["chains"][0]["addresses"][1]["path"] = "M/44H/0H/0H/0/2".into();
        assert_eq!(verify(&doc).unwrap_err().code(), "malformed_address_path");

        let mut doc = document();
        doc["accounts"][0]["chains"][0]["addresses"][1]["path"] = "M/44H/0H/0H/0/0".into();
        assert_eq!(verify(&doc).unwrap_err().code(), "malformed_address_path");

        let mut doc = document();
        doc["accounts"][0]["chains"][0]["addresses"][0]["path"] = "M/44H/0H/0H/1/0".into();
        assert_eq!(verify(&doc).unwrap_err().code(), "malformed_address_path");

        let mut doc = document();
        doc["accounts"][0]["chains"][1]["addresses"][0]["path"] = "M/44H/0H/0H/1/5/0".into();
        assert_eq!(verify(&doc).unwrap_err().code(), "malformed_address_path");
    }

    #[test]
    fn test_tampered_address() {
        let mut doc = document();
        doc["accounts"][0]["chains"][1]["addresses"][1]["address"] =
            "1FteBgh6KQ3Bnv4SSx8r2oLE198uExs5Te".into();
        assert!(matches!(
            verify(&doc).unwrap_err(),
            VerificationError::AddressMismatch { expected_address, .. }
                if expected_address == "18gXGiQ2dfCVTFioJp35bTANjzmVczyyHA"
        ));
    }
}
