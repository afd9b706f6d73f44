use super::crypto::{key_arg, key_values};
use crate::cmd::args::{format_numbers, parse_numbers};
use crate::cmd::Cmd;
use cipher::rsa::{PrivateKey, PublicKey};
use cipher::{Sign, Verify};
use clap::{Arg, ArgAction, ArgMatches, Command};

fn message_arg() -> Arg {
    Arg::new("message")
        .value_name("MESSAGE")
        .action(ArgAction::Set)
        .required(true)
        .help("the message")
}

pub struct SignCmd;

impl Cmd for SignCmd {
    const NAME: &'static str = "sign";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("sign the message digest with the private key")
            .arg(key_arg("the private key `d n`"))
            .arg(message_arg())
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let (d, n) = key_values(m)?;
        let key = PrivateKey::new(d, n)?;
        let msg = m.get_one::<String>("message").cloned().unwrap_or_default();

        let mut sig = Vec::with_capacity(4);
        key.sign(msg.as_bytes(), &mut sig)?;
        println!("{}", format_numbers(&sig));
        Ok(())
    }
}

pub struct VerifyCmd;

impl VerifyCmd {
    fn verify(m: &ArgMatches) -> anyhow::Result<bool> {
        let (e, n) = key_values(m)?;
        let key = PublicKey::new(e, n)?;
        let msg = m.get_one::<String>("message").cloned().unwrap_or_default();
        let sig = m
            .get_one::<String>("signature")
            .map(|s| s.as_str())
            .unwrap_or_default();
        let sig = parse_numbers(sig)?;

        Ok(key.verify(msg.as_bytes(), &sig))
    }
}

impl Cmd for VerifyCmd {
    const NAME: &'static str = "verify";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("verify the message signature with the public key")
            .arg(key_arg("the sender's public key `e n`"))
            .arg(
                Arg::new("signature")
                    .long("signature")
                    .short('s')
                    .action(ArgAction::Set)
                    .required(true)
                    .help("the signature numbers, separated by spaces or commas"),
            )
            .arg(message_arg())
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        if Self::verify(m)? {
            println!("Signature verification SUCCESSFUL.");
        } else {
            println!("Signature verification FAILED.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{SignCmd, VerifyCmd};
    use crate::cmd::Cmd;

    #[test]
    fn verify_args() {
        let m = VerifyCmd::cmd().get_matches_from([
            "verify", "-k", "65537", "3233", "-s", "2630 2970", "abc",
        ]);
        assert!(VerifyCmd::verify(&m).unwrap());
        VerifyCmd.run(&m).unwrap();

        let m = VerifyCmd::cmd().get_matches_from([
            "verify", "-k", "65537", "3233", "-s", "2630,2970", "abd",
        ]);
        assert!(!VerifyCmd::verify(&m).unwrap());

        let m = VerifyCmd::cmd().get_matches_from([
            "verify", "-k", "65537", "3233", "-s", "26x0", "abc",
        ]);
        assert!(VerifyCmd::verify(&m).is_err());
    }

    #[test]
    fn sign_args() {
        let m = SignCmd::cmd().get_matches_from(["sign", "-k", "2753", "3233", "abc"]);
        SignCmd.run(&m).unwrap();

        let m = SignCmd::cmd().get_matches_from(["sign", "-k", "0", "3233", "abc"]);
        assert!(SignCmd.run(&m).is_err());
    }
}
