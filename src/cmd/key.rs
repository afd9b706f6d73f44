use crate::cmd::{Cmd, Session};
use cipher::rsa::KeyPair;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub struct KeyGenCmd {
    session: Session,
}

impl KeyGenCmd {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Cmd for KeyGenCmd {
    const NAME: &'static str = "keygen";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("rsa key pair generate")
            .arg(
                Arg::new("primes")
                    .long("primes")
                    .short('p')
                    .num_args(2)
                    .value_names(["P", "Q"])
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(u64))
                    .help("to derive the key from two specified distinct primes"),
            )
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .help("to specify the output file path to save the key"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let params = &self.session.params;
        let key = match m.get_many::<u64>("primes") {
            Some(primes) => {
                let primes: Vec<_> = primes.copied().collect();
                KeyPair::from_primes(primes[0], primes[1], params)?
            }
            None => KeyPair::generate(params, &mut self.session.rng())?,
        };
        log::debug!("generated {key}");

        let mut out: Box<dyn Write> = match m.get_one::<PathBuf>("output") {
            Some(p) => {
                let f = OpenOptions::new().create_new(true).write(true).open(p)?;
                Box::new(f)
            }
            None => Box::new(std::io::stdout().lock()),
        };

        let s = serde_json::to_string_pretty(&key)?;
        writeln!(out, "{s}")?;
        Ok(())
    }
}
