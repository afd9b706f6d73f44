use num_integer::Integer;
use num_traits::One;
use rand::Rand;
use std::ops::{Deref, Range};

/// 64位无符号整数上的数论运算, 中间结果使用128位以避免溢出
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U64Ext(pub u64);

impl Deref for U64Ext {
    type Target = u64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u64> for U64Ext {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl U64Ext {
    /// $self^{exp} \mod modulus$, square-and-multiply.
    ///
    /// `modulus == 1`时结果为0, `modulus`不能为0.
    pub fn modpow(&self, exp: u64, modulus: u64) -> u64 {
        debug_assert!(modulus != 0, "modpow: zero modulus");
        if modulus == 1 {
            return 0;
        }

        let m = modulus as u128;
        let (mut base, mut exp, mut res) = (self.0 as u128 % m, exp, 1u128);
        while exp > 0 {
            if exp & 1 == 1 {
                res = res * base % m;
            }
            base = base * base % m;
            exp >>= 1;
        }

        res as u64
    }

    /// self * inv = 1 \mod modulus, `0 <= inv < modulus`
    ///
    /// `gcd(self, modulus) != 1`时没有逆元, 返回None
    pub fn modinv(&self, modulus: u64) -> Option<u64> {
        if modulus == 0 {
            return None;
        }

        let (a, n) = ((self.0 % modulus) as i128, modulus as i128);
        let g = a.extended_gcd(&n);
        g.gcd.is_one().then_some(g.x.rem_euclid(n) as u64)
    }

    pub fn gcd(&self, other: u64) -> u64 {
        self.0.gcd(&other)
    }

    /// 试除法: 先排除2和3的倍数, 再检查`6k±1`形式的因子直到$\sqrt{n}$
    pub fn is_prime(&self) -> bool {
        let n = self.0;
        if n <= 1 {
            return false;
        } else if n <= 3 {
            return true;
        } else if n % 2 == 0 || n % 3 == 0 {
            return false;
        }

        let mut i = 5u64;
        while i <= n / i {
            if n % i == 0 || n % (i + 2) == 0 {
                return false;
            }
            i += 6;
        }

        true
    }

    /// 在`range`中均匀随机选择整数, 直到选中素数为止.
    ///
    /// 选取之前先确认区间内至少存在一个素数, 保证循环能够结束.
    pub fn generate_prime<R: Rand>(range: Range<u64>, rng: &mut R) -> Result<u64, String> {
        if range.is_empty() {
            return Err(format!(
                "prime range [{}, {}) is empty",
                range.start, range.end
            ));
        }

        if !range.clone().any(|x| U64Ext(x).is_prime()) {
            return Err(format!(
                "prime range [{}, {}) contains no prime",
                range.start, range.end
            ));
        }

        loop {
            let p = U64Ext(rng.rand_range(range.clone()));
            if p.is_prime() {
                return Ok(p.0);
            }
        }
    }
}
