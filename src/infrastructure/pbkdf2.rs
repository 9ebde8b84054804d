//! PBKDF2 密钥派生模块
//! 从存储密码派生种子加密密钥，参数与旧版钱包文件格式保持一致

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 旧版文件格式使用的固定盐值
pub const PBKDF2_SALT: &[u8] = b"ldsqDQvEWJyWZMCl";
/// PBKDF2 迭代次数
pub const PBKDF2_ITERATIONS: u32 = 65_536;
/// 32字节密钥（AES-256）
pub const KEY_LENGTH: usize = 32;

/// 加密密钥（使用Zeroize保护）
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    key: [u8; KEY_LENGTH],
}

impl EncryptionKey {
    pub fn new(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.key
    }
}

/// 从密码派生加密密钥（固定盐值与迭代次数）
pub fn derive_key_from_password(password: &str) -> EncryptionKey {
    derive_key_with_params(password, PBKDF2_SALT, PBKDF2_ITERATIONS)
}

/// 使用显式参数派生密钥
///
/// # Arguments
/// * `password` - 存储密码
/// * `salt` - 盐值
/// * `iterations` - 迭代次数
pub fn derive_key_with_params(password: &str, salt: &[u8], iterations: u32) -> EncryptionKey {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha1>(password.as_bytes(), salt, iterations, &mut key);
    let derived = EncryptionKey::new(key);
    key.zeroize();
    derived
}
