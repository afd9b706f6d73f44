use std::ops::Range;

pub trait Rand {
    fn rand(&mut self, random: &mut [u8]);

    /// 生成[0..bound)之间的随机数, `bound == 0`时返回0
    fn rand_below(&mut self, bound: u64) -> u64 {
        if bound <= 1 {
            return 0;
        }

        let bits = u64::BITS - (bound - 1).leading_zeros();
        let mask = if bits == u64::BITS {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        };

        let mut buf = [0u8; 8];
        loop {
            self.rand(&mut buf);
            let r = u64::from_le_bytes(buf) & mask;
            if r < bound {
                return r;
            }
        }
    }

    /// 生成[start..end)之间的随机数, 空区间时返回`start`
    fn rand_range(&mut self, range: Range<u64>) -> u64 {
        range.start + self.rand_below(range.end.saturating_sub(range.start))
    }
}

mod default_rand;
pub use default_rand::DefaultRand;

mod seeded_rand;
pub use seeded_rand::SeededRand;

#[cfg(test)]
mod tests {
    use crate::{DefaultRand, Rand, SeededRand};

    #[test]
    fn rand_below_in_bound() {
        let mut rng = DefaultRand::default();
        for bound in [1u64, 2, 3, 7, 100, 255, 256, 1 << 40, u64::MAX] {
            for _ in 0..64 {
                assert!(rng.rand_below(bound) < bound.max(1));
            }
        }
    }

    #[test]
    fn rand_range_in_range() {
        let mut rng = SeededRand::new(7);
        let mut seen = [false; 100];
        for _ in 0..10_000 {
            let x = rng.rand_range(50..150);
            assert!((50..150).contains(&x), "{x} out of range");
            seen[(x - 50) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "not every value was drawn");
    }

    #[test]
    fn empty_range() {
        let mut rng = SeededRand::new(1);
        assert_eq!(rng.rand_range(5..5), 5);
        assert_eq!(rng.rand_below(0), 0);
    }

    #[test]
    fn seeded_is_reproducible() {
        let (mut a, mut b) = (SeededRand::new(42), SeededRand::new(42));
        let (mut x, mut y) = ([0u8; 32], [0u8; 32]);
        a.rand(&mut x);
        b.rand(&mut y);
        assert_eq!(x, y);
        assert_eq!(a.rand_range(0..1000), b.rand_range(0..1000));
    }
}
