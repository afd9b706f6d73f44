use crate::rsa::{KeyPair, PrivateKey, PublicKey};
use crate::{CipherError, Sign, Verify};

/// 消息摘要: 所有字节之和模256.
///
/// 这不是密码学哈希, 很容易构造碰撞.
pub fn digest(msg: &[u8]) -> u8 {
    msg.iter().fold(0u8, |h, &x| h.wrapping_add(x))
}

impl Sign for PrivateKey {
    /// 用私钥加密摘要的十进制字符串
    fn sign(&self, msg: &[u8], sign: &mut Vec<u64>) -> Result<(), CipherError> {
        let h = digest(msg).to_string();

        let olen = sign.len();
        for &x in h.as_bytes() {
            match self.rsasp(x as u64) {
                Ok(s) => sign.push(s),
                Err(e) => {
                    sign.truncate(olen);
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

impl Verify for PublicKey {
    /// 用公钥解密签名, 和消息摘要的十进制字符串比较
    fn verify(&self, msg: &[u8], sign: &[u64]) -> bool {
        let h = digest(msg).to_string();
        if h.len() != sign.len() {
            return false;
        }

        h.bytes()
            .zip(sign.iter())
            .all(|(x, &s)| self.rsavp(s) == Some(x as u64))
    }
}

impl Sign for KeyPair {
    fn sign(&self, msg: &[u8], sign: &mut Vec<u64>) -> Result<(), CipherError> {
        self.private_key().sign(msg, sign)
    }
}

impl Verify for KeyPair {
    fn verify(&self, msg: &[u8], sign: &[u64]) -> bool {
        self.public_key().verify(msg, sign)
    }
}
