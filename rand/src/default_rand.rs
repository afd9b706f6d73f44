use crate::Rand;
use xrand::rngs::OsRng;
use xrand::RngCore;

/// 操作系统提供的随机源, 未指定种子时使用
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultRand {
    rng: OsRng,
}

impl Rand for DefaultRand {
    fn rand(&mut self, random: &mut [u8]) {
        self.rng.fill_bytes(random);
    }
}
