//! Diffie-Hellman
//!
//! 双方共享公开参数素数$p$和生成元$g$:
//! - 各自随机选择私钥$a \in [1, p-2]$, 公开$A = g^a \mod p$;
//! - 收到对方的$B$之后, 共享密钥$s = B^a \mod p = g^{ab} \mod p$;
//!
//! 默认参数$p = 23, g = 5$, 仅用于演示.

use crate::{CipherError, Rand};
use std::fmt::{Display, Formatter};
use utils::U64Ext;
#[cfg(feature = "sec-zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const DH_PRIME: u64 = 23;
pub const DH_GENERATOR: u64 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DHParams {
    prime: u64,
    generator: u64,
}

/// 私钥, 只能用来计算共享密钥
#[derive(Clone, Debug)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct DHPrivateKey {
    x: u64,
    prime: u64,
}

/// 每次交换都重新生成, 不保存
#[derive(Clone, Debug)]
pub struct DHKeyPair {
    params: DHParams,
    public: u64,
    private: DHPrivateKey,
}

impl Default for DHParams {
    fn default() -> Self {
        Self {
            prime: DH_PRIME,
            generator: DH_GENERATOR,
        }
    }
}

impl DHParams {
    /// `prime`为不小于5的素数, `1 < generator < prime`.
    ///
    /// 素数判断使用试除法, `prime`很大时会很慢.
    pub fn new(prime: u64, generator: u64) -> Result<Self, CipherError> {
        if prime < 5 || !U64Ext(prime).is_prime() {
            return Err(CipherError::InvalidParams(format!(
                "dh: `{prime}` is not a prime greater than 3"
            )));
        }

        if generator <= 1 || generator >= prime {
            return Err(CipherError::InvalidParams(format!(
                "dh: generator `{generator}` must be in (1, {prime})"
            )));
        }

        Ok(Self { prime, generator })
    }

    pub fn prime(&self) -> u64 {
        self.prime
    }

    pub fn generator(&self) -> u64 {
        self.generator
    }

    /// 私钥在$[1, p-2]$中均匀选择
    pub fn generate_keys<R: Rand>(&self, rng: &mut R) -> DHKeyPair {
        let x = rng.rand_range(1..self.prime - 1);
        DHKeyPair {
            params: *self,
            public: U64Ext(self.generator).modpow(x, self.prime),
            private: DHPrivateKey {
                x,
                prime: self.prime,
            },
        }
    }
}

impl DHPrivateKey {
    /// $other^x \mod p$
    pub fn compute_shared_secret(&self, other: u64) -> u64 {
        U64Ext(other).modpow(self.x, self.prime)
    }
}

impl DHKeyPair {
    pub fn params(&self) -> &DHParams {
        &self.params
    }

    pub fn public_key(&self) -> u64 {
        self.public
    }

    pub fn private_key(&self) -> &DHPrivateKey {
        &self.private
    }

    pub fn compute_shared_secret(&self, other: u64) -> u64 {
        self.private.compute_shared_secret(other)
    }

    /// (公钥, 私钥)
    pub fn into_parts(self) -> (u64, DHPrivateKey) {
        (self.public, self.private)
    }
}

impl Display for DHParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{p={}, g={}}}", self.prime, self.generator)
    }
}

#[cfg(test)]
mod tests {
    use super::{DHParams, DHPrivateKey, DH_GENERATOR, DH_PRIME};
    use crate::{DefaultRand, SeededRand};
    use utils::U64Ext;

    #[test]
    fn default_params() {
        let params = DHParams::default();
        assert_eq!((params.prime(), params.generator()), (DH_PRIME, DH_GENERATOR));
        assert_eq!(params.to_string(), "{p=23, g=5}");
    }

    #[test]
    fn invalid_params() {
        assert!(DHParams::new(21, 5).is_err());
        assert!(DHParams::new(3, 2).is_err());
        assert!(DHParams::new(23, 1).is_err());
        assert!(DHParams::new(23, 23).is_err());
        assert!(DHParams::new(2_147_483_647, 7).is_ok());
    }

    #[test]
    fn private_key_range() {
        let (params, mut rng) = (DHParams::default(), DefaultRand::default());
        let mut seen = [false; DH_PRIME as usize];
        for _ in 0..5000 {
            let kp = params.generate_keys(&mut rng);
            let x = kp.private_key().x;
            assert!((1..=DH_PRIME - 2).contains(&x), "private key {x}");
            assert_eq!(kp.public_key(), U64Ext(DH_GENERATOR).modpow(x, DH_PRIME));
            seen[x as usize] = true;
        }
        assert!(seen[1..=21].iter().all(|&s| s));
    }

    #[test]
    fn shared_secret_agreement() {
        let (params, mut rng) = (DHParams::default(), DefaultRand::default());
        for _ in 0..100 {
            let (alice, bob) = (params.generate_keys(&mut rng), params.generate_keys(&mut rng));
            assert_eq!(
                alice.compute_shared_secret(bob.public_key()),
                bob.compute_shared_secret(alice.public_key())
            );
        }
    }

    #[test]
    fn shared_secret_exhaustive() {
        let (p, g) = (DH_PRIME, DH_GENERATOR);
        for a in 1..=p - 2 {
            for b in 1..=p - 2 {
                let (ka, kb) = (DHPrivateKey { x: a, prime: p }, DHPrivateKey { x: b, prime: p });
                let (pa, pb) = (U64Ext(g).modpow(a, p), U64Ext(g).modpow(b, p));
                let s = ka.compute_shared_secret(pb);
                assert_eq!(s, kb.compute_shared_secret(pa));
                assert_eq!(s, U64Ext(g).modpow(a * b, p));
            }
        }
    }

    #[test]
    fn shared_secret_large_prime() {
        let params = DHParams::new(2_147_483_647, 7).unwrap();
        let mut rng = SeededRand::new(99);
        let (alice, bob) = (params.generate_keys(&mut rng), params.generate_keys(&mut rng));
        let (pa, ska) = alice.into_parts();
        let (pb, skb) = bob.into_parts();
        assert_eq!(ska.compute_shared_secret(pb), skb.compute_shared_secret(pa));
    }
}
