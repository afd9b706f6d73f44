use std::{error::Error, fmt::Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CipherError {
    /// 明文单元不小于模数, 无法被正确加密
    PreconditionViolation { value: u64, modulus: u64 },

    /// 密文单元不小于模数
    InvalidCiphertext { value: u64, modulus: u64 },

    InvalidPublicKey(String),

    InvalidPrivateKey(String),

    /// 不合法的密钥生成参数或DH参数
    InvalidParams(String),

    KeyGeneration(String),

    Other(String),
}

impl Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreconditionViolation { value, modulus } => f.write_fmt(format_args!(
                "plaintext unit `{value}` must be less than the modulus `{modulus}`"
            )),
            Self::InvalidCiphertext { value, modulus } => f.write_fmt(format_args!(
                "ciphertext unit `{value}` must be less than the modulus `{modulus}`"
            )),
            Self::InvalidPublicKey(s)
            | Self::InvalidPrivateKey(s)
            | Self::InvalidParams(s)
            | Self::Other(s) => f.write_str(s),
            Self::KeyGeneration(s) => f.write_fmt(format_args!("rsa key generation failed: {s}")),
        }
    }
}

impl Error for CipherError {}
