use crate::cmd::{Cmd, Session};
use cipher::dh::DHParams;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

pub struct DHCmd {
    session: Session,
}

impl DHCmd {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl Cmd for DHCmd {
    const NAME: &'static str = "dh";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("diffie-hellman key exchange")
            .arg(
                Arg::new("peer")
                    .long("peer")
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(u64))
                    .help("the other party's public key, a simulated peer is used if not specified"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let (params, mut rng) = (DHParams::default(), self.session.rng());
        let kp = params.generate_keys(&mut rng);
        println!("Parameters: {params}");
        println!("Public Key: {}", kp.public_key());

        match m.get_one::<u64>("peer").copied() {
            Some(peer) => {
                println!("Computed shared secret: {}", kp.compute_shared_secret(peer));
            }
            None => {
                let peer = params.generate_keys(&mut rng);
                let (ours, theirs) = (
                    kp.compute_shared_secret(peer.public_key()),
                    peer.compute_shared_secret(kp.public_key()),
                );
                println!("Peer Public Key: {}", peer.public_key());
                println!("Computed shared secret: {ours}");
                println!("Peer shared secret: {theirs}");
                anyhow::ensure!(ours == theirs, "dh: shared secrets mismatch");
            }
        }

        Ok(())
    }
}
