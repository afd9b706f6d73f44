use std::sync::OnceLock;

use cipher::rsa::KeyGenParams;
use config::Config;
use serde::{Deserialize, Serialize};

/// 配置来源依次为: 默认值, `ASYM__*`环境变量, `--config`指定的文件
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct AsymConfig {
    // 候选素数区间[prime_low, prime_high)
    pub prime_low: u64,
    pub prime_high: u64,

    // 公钥指数搜索起点
    pub public_exponent: u64,

    pub exponent_search_limit: u64,

    // 最多尝试的素数对个数
    pub max_attempts: usize,

    // 固定随机数种子, 用于复现
    pub seed: Option<u64>,
}

impl Default for AsymConfig {
    fn default() -> Self {
        let params = KeyGenParams::default();
        Self {
            prime_low: params.prime_range.start,
            prime_high: params.prime_range.end,
            public_exponent: params.public_exponent,
            exponent_search_limit: params.exponent_search_limit,
            max_attempts: params.max_attempts,
            seed: None,
        }
    }
}

static CONFIG: OnceLock<AsymConfig> = OnceLock::new();

impl AsymConfig {
    /// 只在第一次调用时加载配置
    pub fn init(f: Option<&str>) -> anyhow::Result<&'static Self> {
        if let Some(c) = CONFIG.get() {
            return Ok(c);
        }

        let c = Self::load(f)?;
        Ok(CONFIG.get_or_init(|| c))
    }

    pub fn load(f: Option<&str>) -> anyhow::Result<Self> {
        let default_config = Config::try_from(&AsymConfig::default())?;

        let mut config = Config::builder().add_source(default_config).add_source(
            config::Environment::with_prefix("ASYM")
                .try_parsing(true)
                .separator("__"),
        );

        if let Some(f) = f {
            config = config.add_source(config::File::with_name(f).required(true));
        }

        let config: AsymConfig = config.build()?.try_deserialize()?;
        config.key_gen_params().is_valid()?;

        log::trace!("{:?}", config);

        Ok(config)
    }

    pub fn key_gen_params(&self) -> KeyGenParams {
        KeyGenParams {
            prime_range: self.prime_low..self.prime_high,
            public_exponent: self.public_exponent,
            exponent_search_limit: self.exponent_search_limit,
            max_attempts: self.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AsymConfig;
    use cipher::rsa::KeyGenParams;
    use std::io::Write;

    #[test]
    fn default_matches_params() {
        assert_eq!(AsymConfig::default().key_gen_params(), KeyGenParams::default());
        assert_eq!(AsymConfig::default().seed, None);
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("asym-config-{}.json", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(br#"{"prime_low": 100, "prime_high": 200, "seed": 9}"#)
            .unwrap();
        drop(f);

        let c = AsymConfig::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(c.key_gen_params().prime_range, 100..200);
        assert_eq!(c.public_exponent, 65537);
        assert_eq!(c.seed, Some(9));
    }

    #[test]
    fn reject_bad_range() {
        let path = std::env::temp_dir().join(format!("asym-bad-{}.json", std::process::id()));
        std::fs::write(&path, br#"{"prime_low": 24, "prime_high": 29}"#).unwrap();

        let c = AsymConfig::load(path.to_str());
        std::fs::remove_file(&path).unwrap();
        assert!(c.is_err());
    }
}
