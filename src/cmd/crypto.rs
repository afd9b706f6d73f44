use crate::cmd::args::{format_numbers, parse_numbers};
use crate::cmd::Cmd;
use cipher::rsa::{PrivateKey, PublicKey};
use cipher::Encrypt;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

pub(super) fn key_arg(help: &'static str) -> Arg {
    Arg::new("key")
        .long("key")
        .short('k')
        .num_args(2)
        .value_names(["EXP", "MODULUS"])
        .action(ArgAction::Set)
        .required(true)
        .value_parser(value_parser!(u64))
        .help(help)
}

pub(super) fn key_values(m: &ArgMatches) -> anyhow::Result<(u64, u64)> {
    let v: Vec<u64> = m
        .get_many::<u64>("key")
        .map(|x| x.copied().collect())
        .unwrap_or_default();
    anyhow::ensure!(v.len() == 2, "need the key `EXP MODULUS`");
    Ok((v[0], v[1]))
}

pub struct EncryptCmd;

impl Cmd for EncryptCmd {
    const NAME: &'static str = "encrypt";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("rsa encrypt each byte of the message")
            .arg(key_arg("the public key `e n`"))
            .arg(
                Arg::new("message")
                    .value_name("MESSAGE")
                    .action(ArgAction::Set)
                    .required(true)
                    .help("the message to encrypt"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let (e, n) = key_values(m)?;
        let key = PublicKey::new(e, n)?;
        let msg = m
            .get_one::<String>("message")
            .map(|s| s.as_str())
            .unwrap_or_default();

        let mut c = Vec::with_capacity(msg.len());
        key.encrypt(msg.as_bytes(), &mut c)?;
        println!("{}", format_numbers(&c));
        Ok(())
    }
}

pub struct DecryptCmd;

impl Cmd for DecryptCmd {
    const NAME: &'static str = "decrypt";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("rsa decrypt a sequence of numbers")
            .arg(key_arg("the private key `d n`"))
            .arg(
                Arg::new("ciphertext")
                    .value_name("NUMBERS")
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .required(true)
                    .help("the ciphertext numbers, separated by spaces or commas"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let (d, n) = key_values(m)?;
        let key = PrivateKey::new(d, n)?;
        let c = m
            .get_many::<String>("ciphertext")
            .map(|v| v.map(|s| s.as_str()).collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        let c = parse_numbers(&c)?;

        println!("{}", key.decrypt_to_string(&c)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DecryptCmd, EncryptCmd};
    use crate::cmd::Cmd;

    #[test]
    fn encrypt_args() {
        let m = EncryptCmd::cmd().get_matches_from(["encrypt", "-k", "65537", "3233", "Hi"]);
        EncryptCmd.run(&m).unwrap();

        let m = EncryptCmd::cmd().get_matches_from(["encrypt", "-k", "5", "35", "Hi"]);
        assert!(EncryptCmd.run(&m).is_err());

        assert!(EncryptCmd::cmd()
            .try_get_matches_from(["encrypt", "-k", "65537", "Hi"])
            .is_err());
    }

    #[test]
    fn decrypt_args() {
        let m = DecryptCmd::cmd()
            .get_matches_from(["decrypt", "-k", "2753", "3233", "3000", "3179,1853"]);
        DecryptCmd.run(&m).unwrap();

        let m = DecryptCmd::cmd().get_matches_from(["decrypt", "-k", "2753", "3233", "12", "x"]);
        assert!(DecryptCmd.run(&m).is_err());
    }
}
