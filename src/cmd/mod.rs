use cipher::rsa::KeyGenParams;
use cipher::{DefaultRand, Rand, SeededRand};
use clap::{ArgMatches, Command};

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()>;
}

/// `--seed`或配置指定了种子时使用固定种子, 否则使用系统随机数
#[derive(Clone)]
pub enum SessionRand {
    Os(DefaultRand),
    Seeded(SeededRand),
}

impl SessionRand {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::Seeded(SeededRand::new(s)),
            None => Self::Os(DefaultRand::default()),
        }
    }
}

impl Rand for SessionRand {
    fn rand(&mut self, random: &mut [u8]) {
        match self {
            Self::Os(r) => r.rand(random),
            Self::Seeded(r) => r.rand(random),
        }
    }
}

/// 一次运行共享的参数
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub params: KeyGenParams,
    pub seed: Option<u64>,
}

impl Session {
    pub fn new(config: &AsymConfig, seed: Option<u64>) -> Self {
        Self {
            params: config.key_gen_params(),
            seed: seed.or(config.seed),
        }
    }

    pub fn rng(&self) -> SessionRand {
        SessionRand::new(self.seed)
    }
}

pub mod args;

pub mod config;
pub use config::AsymConfig;

pub mod menu;
pub use menu::{Menu, MenuCmd};

mod key;
pub use key::KeyGenCmd;

mod crypto;
pub use crypto::{DecryptCmd, EncryptCmd};

mod sign;
pub use sign::{SignCmd, VerifyCmd};

mod dh;
pub use dh::DHCmd;
