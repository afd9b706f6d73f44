//! 用户注册表: 按注册顺序保存, 只增不删, 生命周期和进程相同.

use crate::error::AsymError;
use cipher::rsa::{KeyGenParams, KeyPair, PrivateKey, PublicKey};
use cipher::Rand;

#[derive(Clone, Debug)]
pub struct User {
    name: String,
    key: KeyPair,
}

impl User {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key.public_key()
    }

    pub fn private_key(&self) -> &PrivateKey {
        self.key.private_key()
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key
    }
}

#[derive(Clone, Debug, Default)]
pub struct Registry {
    users: Vec<User>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 名字去掉首尾空白后不能为空, 且不能和已有用户重名.
    /// 名字需要能在密钥输入处被引用, 所以不能是数字, 也不能包含空白或逗号.
    /// 注册时生成新的密钥对.
    pub fn register<R: Rand>(
        &mut self,
        name: &str,
        params: &KeyGenParams,
        rng: &mut R,
    ) -> Result<&User, AsymError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AsymError::EmptyName);
        }

        if name.parse::<u64>().is_ok() || name.contains(|c: char| c.is_whitespace() || c == ',') {
            return Err(AsymError::InvalidName(name.to_string()));
        }

        if self.lookup(name).is_ok() {
            return Err(AsymError::DuplicateName(name.to_string()));
        }

        let key = KeyPair::generate(params, rng)?;
        log::info!("registered user `{name}` with public key {}", key.public_key());

        self.users.push(User {
            name: name.to_string(),
            key,
        });
        Ok(&self.users[self.users.len() - 1])
    }

    pub fn lookup(&self, name: &str) -> Result<&User, AsymError> {
        let name = name.trim();
        self.users
            .iter()
            .find(|u| u.name == name)
            .ok_or_else(|| AsymError::NotFound(name.to_string()))
    }

    pub fn users(&self) -> &[User] {
        self.users.as_slice()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
