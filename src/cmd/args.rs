use crate::error::AsymError;
use crate::registry::Registry;
use cipher::rsa::{PrivateKey, PublicKey};
use std::str::FromStr;

/// 用户输入的密钥: `e n`/`d n`数对, 或者已注册的用户名
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Pair(u64, u64),
    Name(String),
}

impl KeyInput {
    pub fn public_key(&self, registry: &Registry) -> Result<PublicKey, AsymError> {
        match self {
            Self::Pair(e, n) => Ok(PublicKey::new(*e, *n)?),
            Self::Name(name) => Ok(registry.lookup(name)?.public_key().clone()),
        }
    }

    pub fn private_key(&self, registry: &Registry) -> Result<PrivateKey, AsymError> {
        match self {
            Self::Pair(d, n) => Ok(PrivateKey::new(*d, *n)?),
            Self::Name(name) => Ok(registry.lookup(name)?.private_key().clone()),
        }
    }
}

impl FromStr for KeyInput {
    type Err = AsymError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<_> = split_tokens(s).collect();
        match tokens.as_slice() {
            [] => Err(AsymError::MalformedInput {
                token: s.to_string(),
                reason: "need a key pair `exp modulus` or a user name".to_string(),
            }),
            [name] if name.parse::<u64>().is_err() => Ok(Self::Name(name.to_string())),
            [x, n] => Ok(Self::Pair(parse_number(x)?, parse_number(n)?)),
            _ => Err(AsymError::MalformedInput {
                token: s.trim().to_string(),
                reason: "a key is exactly two numbers `exp modulus`".to_string(),
            }),
        }
    }
}

fn split_tokens(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
}

pub fn parse_number(token: &str) -> Result<u64, AsymError> {
    token
        .trim()
        .parse::<u64>()
        .map_err(|e| AsymError::MalformedInput {
            token: token.to_string(),
            reason: e.to_string(),
        })
}

/// 解析空白或逗号分隔的整数序列, 例如密文和签名
pub fn parse_numbers(s: &str) -> Result<Vec<u64>, AsymError> {
    split_tokens(s).map(parse_number).collect()
}

pub fn format_numbers(v: &[u64]) -> String {
    v.iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
