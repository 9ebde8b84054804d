//! AES-256-CBC 种子加密/解密模块
//!
//! 旧版钱包文件格式：PBKDF2-HMAC-SHA1 派生密钥，AES-256-CBC + PKCS7 填充，
//! 每次加密生成新的16字节随机IV，与密文一起以Base64存储。
//! 该模式没有认证标签：错误的IV或密码可能解出错误明文，
//! 需要由上层（地址重新派生校验）发现。

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};

use crate::error::CryptoError;
use crate::infrastructure::pbkdf2::{derive_key_from_password, EncryptionKey};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// IV 长度（AES 块大小）
pub const IV_LENGTH: usize = 16;

/// 加密结果：Base64 密文与 Base64 IV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub ciphertext: String,
    pub iv: String,
}

/// 字节转 Base64
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Base64 转字节
pub fn base64_to_bytes(data: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(data)
        .map_err(|e| CryptoError::InvalidBase64(e.to_string()))
}

/// 生成随机IV
fn generate_iv() -> Result<[u8; IV_LENGTH], CryptoError> {
    let mut iv = [0u8; IV_LENGTH];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
    Ok(iv)
}

/// 基于存储密码的种子加密器
pub struct SeedCipher {
    key: EncryptionKey,
}

impl SeedCipher {
    /// 从存储密码创建加密器（PBKDF2 派生密钥）
    pub fn new(passphrase: &str) -> Self {
        Self {
            key: derive_key_from_password(passphrase),
        }
    }

    /// 加密数据，每次调用生成新的IV
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedPayload, CryptoError> {
        let iv = generate_iv()?;
        let ciphertext = self.encrypt_with_iv(plaintext, &iv)?;

        Ok(EncryptedPayload {
            ciphertext: bytes_to_base64(&ciphertext),
            iv: bytes_to_base64(&iv),
        })
    }

    fn encrypt_with_iv(&self, plaintext: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let cipher = Aes256CbcEnc::new_from_slices(self.key.as_slice(), iv)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }

    /// 解密数据
    ///
    /// # Arguments
    /// * `ciphertext` - Base64 密文
    /// * `iv` - 加密时使用的 Base64 IV
    pub fn decrypt(&self, ciphertext: &str, iv: &str) -> Result<Vec<u8>, CryptoError> {
        let iv = base64_to_bytes(iv)?;
        if iv.len() != IV_LENGTH {
            return Err(CryptoError::DecryptionFailed);
        }

        let ciphertext = base64_to_bytes(ciphertext)?;
        let cipher = Aes256CbcDec::new_from_slices(self.key.as_slice(), &iv)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}

/// 封存种子：有密码时加密 Base64 种子文本，无密码时明文 Base64 且 IV 为空串
///
/// 返回 (seed 字段, iv 字段)
pub fn seal_seed(seed: &[u8], passphrase: &str) -> Result<EncryptedPayload, CryptoError> {
    let encoded = bytes_to_base64(seed);

    if passphrase.is_empty() {
        return Ok(EncryptedPayload {
            ciphertext: encoded,
            iv: String::new(),
        });
    }

    SeedCipher::new(passphrase).encrypt(encoded.as_bytes())
}

/// 打开封存的种子，`seal_seed` 的逆操作
pub fn open_seed(seed_field: &str, iv_field: &str, passphrase: &str) -> Result<Vec<u8>, CryptoError> {
    if passphrase.is_empty() {
        return base64_to_bytes(seed_field);
    }

    let plaintext = SeedCipher::new(passphrase).decrypt(seed_field, iv_field)?;
    let encoded = String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)?;
    base64_to_bytes(encoded.trim())
}
