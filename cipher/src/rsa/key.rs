use crate::{CipherError, Decrypt, Encrypt, Rand};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Range;
use utils::U64Ext;
#[cfg(feature = "sec-zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    // public exponent, gcd(e, (p-1)(q-1)) = 1
    e: u64,
    // n = p * q
    n: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct PrivateKey {
    // d * e = 1 % (p-1)(q-1)
    d: u64,
    n: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sec-zeroize", derive(Zeroize, ZeroizeOnDrop))]
struct PrimeFactor {
    p: u64,
    q: u64,
}

/// 一次密钥生成的结果, 生成后不可变
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pk: PublicKey,
    sk: PrivateKey,
    factor: PrimeFactor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenParams {
    /// 候选素数的取值区间
    pub prime_range: Range<u64>,
    /// 公钥指数搜索的起点
    pub public_exponent: u64,
    /// 每对素数最多尝试的公钥指数个数
    pub exponent_search_limit: u64,
    /// 最多尝试的素数对个数
    pub max_attempts: usize,
}

impl Default for KeyGenParams {
    fn default() -> Self {
        Self {
            prime_range: 50..150,
            public_exponent: 65537,
            exponent_search_limit: 1 << 16,
            max_attempts: 64,
        }
    }
}

impl KeyGenParams {
    pub fn is_valid(&self) -> Result<(), CipherError> {
        let r = &self.prime_range;
        if r.end > (1u64 << 32) {
            return Err(CipherError::InvalidParams(format!(
                "rsa: prime range end `{}` must not exceed 2^32",
                r.end
            )));
        }

        if r.clone().filter(|&x| U64Ext(x).is_prime()).take(2).count() < 2 {
            return Err(CipherError::InvalidParams(format!(
                "rsa: prime range [{}, {}) must contain at least two primes",
                r.start, r.end
            )));
        }

        if self.public_exponent < 3 {
            return Err(CipherError::InvalidParams(format!(
                "rsa: public exponent start `{}` is too small",
                self.public_exponent
            )));
        }

        if self
            .public_exponent
            .checked_add(self.exponent_search_limit)
            .is_none()
        {
            return Err(CipherError::InvalidParams(format!(
                "rsa: exponent search window from `{}` overflow",
                self.public_exponent
            )));
        }

        if self.exponent_search_limit == 0 || self.max_attempts == 0 {
            return Err(CipherError::InvalidParams(
                "rsa: the search limit and attempts must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl PublicKey {
    /// 要求`n >= 2`, `e >= 1`
    pub fn new(e: u64, n: u64) -> Result<Self, CipherError> {
        if n < 2 {
            Err(CipherError::InvalidPublicKey(format!(
                "rsa: modulus `{n}` is too small"
            )))
        } else if e == 0 {
            Err(CipherError::InvalidPublicKey(
                "rsa: public exponent must be positive".to_string(),
            ))
        } else {
            Ok(Self { e, n })
        }
    }

    /// e
    pub fn exponent(&self) -> u64 {
        self.e
    }

    /// n
    pub fn modulus(&self) -> u64 {
        self.n
    }

    /// RSAEP: $m^e \mod n, m \lt n$
    pub fn rsaep(&self, m: u64) -> Result<u64, CipherError> {
        if m < self.n {
            Ok(U64Ext(m).modpow(self.e, self.n))
        } else {
            Err(CipherError::PreconditionViolation {
                value: m,
                modulus: self.n,
            })
        }
    }

    /// RSAVP: 签名值不小于模数时返回None
    pub(super) fn rsavp(&self, s: u64) -> Option<u64> {
        (s < self.n).then(|| U64Ext(s).modpow(self.e, self.n))
    }
}

impl PrivateKey {
    /// 要求`n >= 2`, `d >= 1`
    pub fn new(d: u64, n: u64) -> Result<Self, CipherError> {
        if n < 2 {
            Err(CipherError::InvalidPrivateKey(format!(
                "rsa: modulus `{n}` is too small"
            )))
        } else if d == 0 {
            Err(CipherError::InvalidPrivateKey(
                "rsa: private exponent must be positive".to_string(),
            ))
        } else {
            Ok(Self { d, n })
        }
    }

    /// d
    pub fn exponent(&self) -> u64 {
        self.d
    }

    pub fn modulus(&self) -> u64 {
        self.n
    }

    /// RSADP: $c^d \mod n, c \lt n$
    pub fn rsadp(&self, c: u64) -> Result<u64, CipherError> {
        if c < self.n {
            Ok(U64Ext(c).modpow(self.d, self.n))
        } else {
            Err(CipherError::InvalidCiphertext {
                value: c,
                modulus: self.n,
            })
        }
    }

    /// RSASP: 和RSAEP相同, 但使用私钥指数
    pub(super) fn rsasp(&self, m: u64) -> Result<u64, CipherError> {
        if m < self.n {
            Ok(U64Ext(m).modpow(self.d, self.n))
        } else {
            Err(CipherError::PreconditionViolation {
                value: m,
                modulus: self.n,
            })
        }
    }

    /// 解密并解码为文本: 不超过255的值按UTF-8字节解码, 不合法的序列会被替换;
    /// 更大的值按Unicode码点解释. 密钥不匹配时得到乱码而不是错误.
    pub fn decrypt_to_string(&self, ciphertext: &[u64]) -> Result<String, CipherError> {
        let (mut s, mut bytes) = (String::with_capacity(ciphertext.len()), Vec::new());
        for &c in ciphertext {
            let m = self.rsadp(c)?;
            match u8::try_from(m) {
                Ok(b) => bytes.push(b),
                Err(_) => {
                    s.push_str(&String::from_utf8_lossy(&bytes));
                    bytes.clear();
                    s.push(
                        u32::try_from(m)
                            .ok()
                            .and_then(char::from_u32)
                            .unwrap_or(char::REPLACEMENT_CHARACTER),
                    );
                }
            }
        }

        s.push_str(&String::from_utf8_lossy(&bytes));
        Ok(s)
    }
}

impl Encrypt for PublicKey {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u64>) -> Result<(), CipherError> {
        let olen = ciphertext.len();
        ciphertext.reserve(plaintext.len());
        for &x in plaintext {
            match self.rsaep(x as u64) {
                Ok(c) => ciphertext.push(c),
                Err(e) => {
                    ciphertext.truncate(olen);
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

impl Decrypt for PrivateKey {
    /// 大于255的解密值只保留低8位
    fn decrypt(&self, ciphertext: &[u64], plaintext: &mut Vec<u8>) -> Result<(), CipherError> {
        let olen = plaintext.len();
        plaintext.reserve(ciphertext.len());
        for &c in ciphertext {
            match self.rsadp(c) {
                Ok(m) => plaintext.push(m as u8),
                Err(e) => {
                    plaintext.truncate(olen);
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

impl KeyPair {
    /// 生成密钥对:
    /// 1. 在`prime_range`中随机选择素数`p`, 再选择不同于`p`的素数`q`;
    /// 2. 从`public_exponent`开始递增搜索与$\phi(n)$互质的`e`, 最多搜索`exponent_search_limit`次;
    /// 3. 搜索失败或`d == 1`时重新选择素数对, 最多`max_attempts`次.
    ///
    /// `e`允许大于$\phi(n)$, 只需要和$\phi(n)$互质.
    pub fn generate<R: Rand>(params: &KeyGenParams, rng: &mut R) -> Result<Self, CipherError> {
        params.is_valid()?;

        for attempt in 1..=params.max_attempts {
            let p = U64Ext::generate_prime(params.prime_range.clone(), rng)
                .map_err(CipherError::KeyGeneration)?;
            let q = loop {
                let q = U64Ext::generate_prime(params.prime_range.clone(), rng)
                    .map_err(CipherError::KeyGeneration)?;
                if q != p {
                    break q;
                }
            };

            match Self::derive(p, q, params) {
                Some(key) => return Ok(key),
                None => log::debug!(
                    "rsa: no usable exponent for p={p}, q={q}, attempt {attempt}/{}",
                    params.max_attempts
                ),
            }
        }

        Err(CipherError::KeyGeneration(format!(
            "no usable public exponent after {} prime pairs",
            params.max_attempts
        )))
    }

    /// 使用指定的素数生成密钥对
    pub fn from_primes(p: u64, q: u64, params: &KeyGenParams) -> Result<Self, CipherError> {
        if !U64Ext(p).is_prime() || !U64Ext(q).is_prime() {
            return Err(CipherError::InvalidParams(format!(
                "rsa: `{p}` and `{q}` must both be prime"
            )));
        } else if p == q {
            return Err(CipherError::InvalidParams(format!(
                "rsa: the primes must be distinct, both are `{p}`"
            )));
        } else if p.checked_mul(q).is_none() {
            return Err(CipherError::InvalidParams(format!(
                "rsa: modulus `{p} * {q}` overflow"
            )));
        }

        Self::derive(p, q, params).ok_or_else(|| {
            CipherError::KeyGeneration(format!(
                "no usable public exponent in [{}, {}) for p={p}, q={q}",
                params.public_exponent,
                params.public_exponent.saturating_add(params.exponent_search_limit)
            ))
        })
    }

    fn derive(p: u64, q: u64, params: &KeyGenParams) -> Option<Self> {
        let (n, totient) = (p * q, (p - 1) * (q - 1));

        let (mut e, end) = (
            params.public_exponent,
            params
                .public_exponent
                .saturating_add(params.exponent_search_limit),
        );
        while U64Ext(e).gcd(totient) != 1 {
            e = e.checked_add(1)?;
            if e >= end {
                return None;
            }
        }

        let d = U64Ext(e).modinv(totient)?;
        if d <= 1 {
            // e = 1 (mod totient), 加密不改变明文
            return None;
        }

        Some(Self {
            pk: PublicKey { e, n },
            sk: PrivateKey { d, n },
            factor: PrimeFactor { p, q },
        })
    }

    /// (e, n)
    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// (d, n)
    pub fn private_key(&self) -> &PrivateKey {
        &self.sk
    }

    pub fn primes(&self) -> (u64, u64) {
        (self.factor.p, self.factor.q)
    }

    pub fn totient(&self) -> u64 {
        (self.factor.p - 1) * (self.factor.q - 1)
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        let (p, q) = self.primes();
        if !U64Ext(p).is_prime() || !U64Ext(q).is_prime() || p == q {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid prime value".to_string(),
            ));
        }

        if p.checked_mul(q) != Some(self.pk.n) || self.pk.n != self.sk.n {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid modulus".to_string(),
            ));
        }

        let de = self.pk.e as u128 * self.sk.d as u128;
        if de % self.totient() as u128 != 1 {
            return Err(CipherError::InvalidPrivateKey(
                "rsa: invalid exponent".to_string(),
            ));
        }

        Ok(())
    }
}

impl Encrypt for KeyPair {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u64>) -> Result<(), CipherError> {
        self.pk.encrypt(plaintext, ciphertext)
    }
}

impl Decrypt for KeyPair {
    fn decrypt(&self, ciphertext: &[u64], plaintext: &mut Vec<u8>) -> Result<(), CipherError> {
        self.sk.decrypt(ciphertext, plaintext)
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.e, self.n)
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.d, self.n)
    }
}

impl Display for KeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{pk: {}, sk: {}, factor: {{p: {}, q: {}}}}}",
            self.pk, self.sk, self.factor.p, self.factor.q
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyGenParams, KeyPair, PrivateKey, PublicKey};
    use crate::{CipherError, DefaultRand, SeededRand};

    #[test]
    fn textbook_key() {
        let key = KeyPair::from_primes(61, 53, &KeyGenParams::default()).unwrap();
        assert_eq!(key.public_key().modulus(), 3233);
        assert_eq!(key.totient(), 3120);
        // 65537 与 3120 互质, 搜索在起点就结束
        assert_eq!(key.public_key().exponent(), 65537);
        assert_eq!(key.private_key().exponent(), 2753);
        key.is_valid().unwrap();
    }

    #[test]
    fn exponent_search_steps() {
        let params = KeyGenParams {
            public_exponent: 3,
            ..KeyGenParams::default()
        };
        // totient = 72, 3和4都不互质
        let key = KeyPair::from_primes(7, 13, &params).unwrap();
        assert_eq!(key.public_key().exponent(), 5);
        assert_eq!(key.private_key().exponent(), 29);
        key.is_valid().unwrap();

        let params = KeyGenParams {
            exponent_search_limit: 2,
            ..params
        };
        assert!(matches!(
            KeyPair::from_primes(7, 13, &params),
            Err(CipherError::KeyGeneration(_))
        ));
    }

    #[test]
    fn from_bad_primes() {
        let params = KeyGenParams::default();
        assert!(KeyPair::from_primes(61, 61, &params).is_err());
        assert!(KeyPair::from_primes(61, 51, &params).is_err());
        assert!(KeyPair::from_primes(1, 53, &params).is_err());
        assert!(KeyPair::from_primes(4_294_967_291, 4_294_967_279 * 3, &params).is_err());
    }

    #[test]
    fn keygen_invariants() {
        let (params, mut rng) = (KeyGenParams::default(), DefaultRand::default());
        for _ in 0..200 {
            let key = KeyPair::generate(&params, &mut rng).unwrap();
            let (p, q) = key.primes();
            assert_ne!(p, q);
            assert!(params.prime_range.contains(&p) && params.prime_range.contains(&q));
            assert_eq!(key.public_key().modulus(), p * q);
            assert_eq!(
                (key.public_key().exponent() as u128 * key.private_key().exponent() as u128)
                    % key.totient() as u128,
                1
            );
            key.is_valid().unwrap();
        }
    }

    #[test]
    fn keygen_seeded() {
        let params = KeyGenParams::default();
        let k1 = KeyPair::generate(&params, &mut SeededRand::new(11)).unwrap();
        let k2 = KeyPair::generate(&params, &mut SeededRand::new(11)).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn keygen_escalation_exhausted() {
        // 只有素数2和3, totient = 2, 任何奇数e都得到d = 1
        let params = KeyGenParams {
            prime_range: 2..4,
            max_attempts: 5,
            ..KeyGenParams::default()
        };
        assert!(matches!(
            KeyPair::generate(&params, &mut DefaultRand::default()),
            Err(CipherError::KeyGeneration(_))
        ));
    }

    #[test]
    fn invalid_params() {
        let mut rng = DefaultRand::default();
        let cases = [
            KeyGenParams {
                prime_range: 24..29,
                ..KeyGenParams::default()
            },
            KeyGenParams {
                prime_range: 89..97,
                ..KeyGenParams::default()
            },
            KeyGenParams {
                prime_range: 50..(1u64 << 33),
                ..KeyGenParams::default()
            },
            KeyGenParams {
                public_exponent: 1,
                ..KeyGenParams::default()
            },
            KeyGenParams {
                max_attempts: 0,
                ..KeyGenParams::default()
            },
            KeyGenParams {
                public_exponent: u64::MAX,
                ..KeyGenParams::default()
            },
        ];

        for params in cases {
            assert!(
                matches!(
                    KeyPair::generate(&params, &mut rng),
                    Err(CipherError::InvalidParams(_))
                ),
                "{params:?}"
            );
        }
    }

    #[test]
    fn exponent_search_at_u64_max() {
        // u64::MAX = 3 * 5 * 17 * 257 * 641 * 65537 * 6700417, 与3120不互质
        let params = KeyGenParams {
            public_exponent: u64::MAX,
            ..KeyGenParams::default()
        };
        assert!(matches!(
            KeyPair::from_primes(61, 53, &params),
            Err(CipherError::KeyGeneration(_))
        ));

        let params = KeyGenParams {
            public_exponent: u64::MAX - 2,
            exponent_search_limit: 2,
            ..KeyGenParams::default()
        };
        // 搜索窗口恰好到u64::MAX, 两个候选都与3120不互质
        assert!(params.is_valid().is_ok());
        assert!(matches!(
            KeyPair::from_primes(61, 53, &params),
            Err(CipherError::KeyGeneration(_))
        ));
    }

    #[test]
    fn key_constructors() {
        assert!(PublicKey::new(65537, 1).is_err());
        assert!(PublicKey::new(0, 3233).is_err());
        assert!(PrivateKey::new(2753, 0).is_err());
        assert!(PrivateKey::new(0, 3233).is_err());

        let pk = PublicKey::new(65537, 3233).unwrap();
        assert_eq!(pk.to_string(), "(65537,3233)");
        let sk = PrivateKey::new(2753, 3233).unwrap();
        assert_eq!(sk.to_string(), "(2753,3233)");
    }

    #[test]
    fn key_json() {
        let key = KeyPair::from_primes(61, 53, &KeyGenParams::default()).unwrap();
        let s = serde_json::to_string(&key).unwrap();
        let key2: KeyPair = serde_json::from_str(&s).unwrap();
        assert_eq!(key, key2);
        key2.is_valid().unwrap();
    }
}
