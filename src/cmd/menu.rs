//! 交互式菜单, 每个操作执行完之后才读取下一个选项.
//! 操作失败时打印错误并继续, 输入结束时退出.

use crate::cmd::args::{format_numbers, parse_number, parse_numbers, KeyInput};
use crate::cmd::{Cmd, Session};
use crate::error::AsymError;
use crate::registry::{Registry, User};
use cipher::dh::DHParams;
use cipher::rsa::KeyGenParams;
use cipher::{Encrypt, Rand, Sign, Verify};
use clap::{ArgMatches, Command};
use std::io::{BufRead, Write};
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

const MENU: &str = "
=== RSA Encryption System ===
1. Register new user
2. List registered users
3. Look up a user
4. Encrypt a message
5. Decrypt a message
6. Perform Diffie-Hellman key exchange
7. Sign a message
8. Verify a digital signature
9. Exit
Choose an option: ";

pub struct Menu<I: BufRead, O: Write, R: Rand> {
    input: I,
    output: O,
    registry: Registry,
    params: KeyGenParams,
    dh: DHParams,
    rng: R,
}

impl<I: BufRead, O: Write, R: Rand> Menu<I, O, R> {
    pub fn new(input: I, output: O, params: KeyGenParams, rng: R) -> Self {
        Self {
            input,
            output,
            registry: Registry::new(),
            params,
            dh: DHParams::default(),
            rng,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 直到选择退出或输入结束
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            self.output.flush()?;

            let Some(choice) = self.read_line()? else {
                break;
            };

            let res = match choice.trim() {
                "1" => self.register(),
                "2" => self.list(),
                "3" => self.lookup(),
                "4" => self.encrypt(),
                "5" => self.decrypt(),
                "6" => self.exchange(),
                "7" => self.sign(),
                "8" => self.verify(),
                "9" => {
                    writeln!(self.output, "\nExiting program. Goodbye!")?;
                    break;
                }
                _ => {
                    writeln!(self.output, "\nInvalid option. Please try again.")?;
                    Ok(())
                }
            };

            if let Err(e) = res {
                if e.downcast_ref::<AsymError>() == Some(&AsymError::EndOfInput) {
                    break;
                }
                log::debug!("menu option `{}` failed: {e}", choice.trim());
                writeln!(self.output, "\nError: {e}")?;
            }
        }

        Ok(())
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    fn prompt(&mut self, msg: &str) -> anyhow::Result<String> {
        write!(self.output, "{msg}")?;
        self.output.flush()?;
        self.read_line()?.ok_or_else(|| AsymError::EndOfInput.into())
    }

    fn prompt_key(&mut self, msg: &str) -> anyhow::Result<KeyInput> {
        #[allow(unused_mut)]
        let mut line = self.prompt(msg)?;
        let key = line.parse::<KeyInput>();
        #[cfg(feature = "sec-zeroize")]
        line.zeroize();
        Ok(key?)
    }

    fn write_user(&mut self, user: &User) -> anyhow::Result<()> {
        writeln!(self.output, "\nUser: {}", user.name())?;
        writeln!(self.output, "Public Key (e,n): {}", user.public_key())?;
        writeln!(self.output, "Private Key (d,n): {}", user.private_key())?;
        Ok(())
    }

    fn register(&mut self) -> anyhow::Result<()> {
        let name = self.prompt("\nEnter username to register: ")?;
        let user = self
            .registry
            .register(&name, &self.params, &mut self.rng)?
            .clone();
        writeln!(
            self.output,
            "\nUser \"{}\" registered successfully.",
            user.name()
        )?;
        self.write_user(&user)
    }

    fn list(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "\nRegistered Users and Their Keys:")?;
        if self.registry.is_empty() {
            writeln!(self.output, "No users registered yet.")?;
            return Ok(());
        }

        let users = self.registry.users().to_vec();
        for user in users.iter() {
            self.write_user(user)?;
            writeln!(self.output, "----------------------------------------")?;
        }
        Ok(())
    }

    fn lookup(&mut self) -> anyhow::Result<()> {
        let name = self.prompt("\nEnter username to look up: ")?;
        let user = self.registry.lookup(&name)?.clone();
        self.write_user(&user)
    }

    fn encrypt(&mut self) -> anyhow::Result<()> {
        let key = self.prompt_key("\nEnter public key for encryption (e n) or a username: ")?;
        let key = key.public_key(&self.registry)?;
        let msg = self.prompt("Enter message to encrypt: ")?;

        let mut c = Vec::with_capacity(msg.len());
        key.encrypt(msg.as_bytes(), &mut c)?;
        writeln!(self.output, "\nEncrypted message (numeric values):")?;
        writeln!(self.output, "{}", format_numbers(&c))?;
        Ok(())
    }

    fn decrypt(&mut self) -> anyhow::Result<()> {
        let key = self.prompt_key("\nEnter private key for decryption (d n) or a username: ")?;
        let key = key.private_key(&self.registry)?;
        let c = self.prompt("Enter encrypted message (space-separated numbers):\n")?;
        let c = parse_numbers(&c)?;

        let msg = key.decrypt_to_string(&c)?;
        writeln!(self.output, "\nDecrypted message: {msg}")?;
        Ok(())
    }

    fn exchange(&mut self) -> anyhow::Result<()> {
        let kp = self.dh.generate_keys(&mut self.rng);
        writeln!(
            self.output,
            "\nDiffie-Hellman keys generated with {}.",
            kp.params()
        )?;
        writeln!(self.output, "Public Key: {}", kp.public_key())?;

        let other = self.prompt("Enter other party's public key: ")?;
        let other = parse_number(&other)?;
        writeln!(
            self.output,
            "Computed shared secret: {}",
            kp.compute_shared_secret(other)
        )?;
        Ok(())
    }

    fn sign(&mut self) -> anyhow::Result<()> {
        let key = self.prompt_key("\nEnter private key for signing (d n) or a username: ")?;
        let key = key.private_key(&self.registry)?;
        let msg = self.prompt("Enter message to sign: ")?;

        let mut sig = Vec::with_capacity(4);
        key.sign(msg.as_bytes(), &mut sig)?;
        writeln!(self.output, "Signature (numeric values): {}", format_numbers(&sig))?;
        Ok(())
    }

    fn verify(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "\nDigital Signature Verification")?;
        let msg = self.prompt("Enter message: ")?;
        let sig = self.prompt("Enter signature (space-separated numbers): ")?;
        let sig = parse_numbers(&sig)?;
        let key = self.prompt_key("Enter sender's public key (e n) or a username: ")?;
        let key = key.public_key(&self.registry)?;

        if key.verify(msg.as_bytes(), &sig) {
            writeln!(self.output, "Signature verification SUCCESSFUL.")?;
        } else {
            writeln!(self.output, "Signature verification FAILED.")?;
        }
        Ok(())
    }
}

pub struct MenuCmd {
    session: Session,
}

impl MenuCmd {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Cmd for MenuCmd {
    const NAME: &'static str = "menu";

    fn cmd() -> Command {
        Command::new(Self::NAME).about("interactive menu, the default when no command is given")
    }

    fn run(&self, _m: &ArgMatches) -> anyhow::Result<()> {
        let (stdin, stdout) = (std::io::stdin(), std::io::stdout());
        let mut menu = Menu::new(
            stdin.lock(),
            stdout.lock(),
            self.session.params.clone(),
            self.session.rng(),
        );
        menu.run()?;
        log::debug!("menu exit with {} registered users", menu.registry().len());
        Ok(())
    }
}
