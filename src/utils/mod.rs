pub mod password;

use base64::Engine;

/// 生成 URL 安全的随机令牌（`bytes` 个随机字节，Base64 编码）
pub fn generate_secure_token(bytes: usize) -> String {
    let raw: Vec<u8> = (0..bytes).map(|_| rand::random::<u8>()).collect();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(raw)
}
