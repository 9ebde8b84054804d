//! 字符串工具模块
//! 恢复输入的清洗与识别

use once_cell::sync::Lazy;
use regex::Regex;

/// 非小写字母的连续字符
static NON_WORD_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z]+").expect("valid mnemonic separator pattern"));

/// 扩展公钥前缀
const XPUB_PREFIXES: [&str; 2] = ["xpub", "tpub"];

/// 检查字符串是否为空或只包含空白字符
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// 助记词清洗：转小写，非字母字符序列替换为单个空格，去掉首尾空白
///
/// `"Angle, END\ttrade"` → `"angle end trade"`
pub fn normalize_mnemonic(input: &str) -> String {
    let lower = input.to_lowercase();
    NON_WORD_CHARS.replace_all(&lower, " ").trim().to_string()
}

/// 是否为扩展公钥（可以是 ':' 分隔的列表）
pub fn looks_like_xpub(input: &str) -> bool {
    let trimmed = input.trim();
    XPUB_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// 拆分 ':' 分隔的扩展公钥列表
pub fn split_xpubs(input: &str) -> Vec<String> {
    input
        .trim()
        .split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 是否可能是 Base64 编码的种子：长度为4的倍数且不含空白
pub fn looks_like_base64(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty()
        && trimmed.len() % 4 == 0
        && !trimmed.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \n\t"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn test_normalize_mnemonic() {
        assert_eq!(normalize_mnemonic("Angle, END\ttrade"), "angle end trade");
        assert_eq!(normalize_mnemonic("  angle1end--trade  "), "angle end trade");
        assert_eq!(normalize_mnemonic("angle end trade"), "angle end trade");
        assert_eq!(normalize_mnemonic("123"), "");
    }

    #[test]
    fn test_xpub_detection() {
        assert!(looks_like_xpub("xpub6C..."));
        assert!(looks_like_xpub("  tpubD6..."));
        assert!(!looks_like_xpub("angle end trade"));

        assert_eq!(split_xpubs("xpubA: xpubB:"), vec!["xpubA", "xpubB"]);
    }

    #[test]
    fn test_base64_detection() {
        assert!(looks_like_base64("CMkzmuMeLv2xxyf9CgHzVw=="));
        assert!(!looks_like_base64("angle end trade"));
        assert!(!looks_like_base64("abc"));
        assert!(!looks_like_base64(""));
    }
}
