mod error;
pub use error::CipherError;

pub use rand::{DefaultRand, Rand, SeededRand};

pub mod dh;
pub mod rsa;

pub trait Encrypt {
    // 写入ciphertext之前不清空
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u64>) -> Result<(), CipherError>;
}

pub trait Decrypt {
    // 写入plaintext之前不清空
    fn decrypt(&self, ciphertext: &[u64], plaintext: &mut Vec<u8>) -> Result<(), CipherError>;
}

pub trait Cipher: Encrypt + Decrypt {}

impl<T> Cipher for T where T: Encrypt + Decrypt {}

pub trait Sign {
    // 写入sign之前不清空
    fn sign(&self, msg: &[u8], sign: &mut Vec<u64>) -> Result<(), CipherError>;
}

/// 验证失败不是错误, 只返回false
pub trait Verify {
    fn verify(&self, msg: &[u8], sign: &[u64]) -> bool;
}
