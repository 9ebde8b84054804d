//! 日志脱敏
//! 种子、助记词、私钥不得以明文进入日志

/// 可脱敏trait
pub trait SensitiveRedact {
    fn redact(&self) -> String;
}

/// 脱敏十六进制字符串（显示前缀和后缀）
pub fn redact_hex_string(hex: &str, show_chars: usize) -> String {
    if hex.len() <= show_chars * 2 {
        return "*".repeat(hex.len());
    }

    let prefix = &hex[..show_chars];
    let suffix = &hex[hex.len() - show_chars..];
    format!("{}...{}", prefix, suffix)
}

/// 脱敏地址（显示前6位和后4位）
pub fn redact_address(address: &str) -> String {
    if address.len() < 10 {
        return "*".repeat(address.len());
    }

    let prefix = &address[..6];
    let suffix = &address[address.len() - 4..];
    format!("{}...{}", prefix, suffix)
}

/// 脱敏助记词：只保留词数
pub fn redact_mnemonic(words: &[String]) -> String {
    format!("<{} words>", words.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hex_string() {
        assert_eq!(
            redact_hex_string("08c9339ae31e2efdb1c727fd0a01f357", 4),
            "08c9...f357"
        );
        assert_eq!(redact_hex_string("abcd", 4), "****");
    }

    #[test]
    fn test_redact_address() {
        assert_eq!(
            redact_address("1FteBgh6KQ3Bnv4SSx8r2oLE198uExs5Te"),
            "1FteBg...s5Te"
        );
        assert_eq!(redact_address("1abc"), "****");
    }

    #[test]
    fn test_redact_mnemonic() {
        let words: Vec<String> = "angle end trade".split(' ').map(String::from).collect();
        assert_eq!(redact_mnemonic(&words), "<3 words>");
    }
}
