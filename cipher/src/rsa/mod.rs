//! RSA
//!
//! - 随机选择两个不同的素数$p$和$q$, 模数$n=p*q$, $\phi(n)=(p-1)*(q-1)$;
//! - 公钥指数$e$从65537开始递增, 直到$gcd(e, \phi(n))=1$;
//! - 私钥指数$d$满足: $d*e \equiv 1 \mod \phi(n)$;
//!
//! 加密: 消息的每个字节$x$独立加密, $y = x ^ e \mod n$, 要求$x \lt n$;
//!
//! 解密: $x = y^d \mod n$;
//!
//! 签名: 消息摘要(字节和模256)的十进制字符串用私钥加密, 验证时用公钥解密后比较.
//!
//! 注意: 素数只有几百大小, 仅用于演示算法, 没有任何安全性.

mod key;
pub use key::{KeyGenParams, KeyPair, PrivateKey, PublicKey};

mod sign;
pub use sign::digest;
