use crate::Rand;
use xrand::rngs::StdRng;
use xrand::{RngCore, SeedableRng};

/// 固定种子的伪随机数, 同一种子生成相同的序列
#[derive(Clone, Debug)]
pub struct SeededRand {
    rng: StdRng,
}

impl SeededRand {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Rand for SeededRand {
    fn rand(&mut self, random: &mut [u8]) {
        self.rng.fill_bytes(random);
    }
}
