use asym::cmd::{
    AsymConfig, Cmd, DHCmd, DecryptCmd, EncryptCmd, KeyGenCmd, MenuCmd, Session, SignCmd,
    VerifyCmd,
};
use asym::log_error;
use clap::{value_parser, Arg, ArgAction, Command};
use log::LevelFilter;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let version = env!("ASYM_VERSION_INFO");
    let app = Command::new("asym")
        .version(version)
        .about("toy rsa, digital signature and diffie-hellman")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .action(ArgAction::Set)
                .required(false)
                .global(true)
                .help("the configuration file path"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .action(ArgAction::Set)
                .required(false)
                .global(true)
                .value_parser(value_parser!(u64))
                .help("fixed random seed to replay a session"),
        )
        .subcommand(MenuCmd::cmd())
        .subcommand(KeyGenCmd::cmd())
        .subcommand(EncryptCmd::cmd())
        .subcommand(DecryptCmd::cmd())
        .subcommand(SignCmd::cmd())
        .subcommand(VerifyCmd::cmd())
        .subcommand(DHCmd::cmd())
        .get_matches();

    // 全局参数会传递到子命令
    let sub = app.subcommand_name().unwrap_or(MenuCmd::NAME);
    let m = app.subcommand().map(|(_, m)| m).unwrap_or(&app);

    let Some(config) = log_error(AsymConfig::init(
        m.get_one::<String>("config").map(|s| s.as_str()),
    )) else {
        std::process::exit(1);
    };
    let seed = m.get_one::<u64>("seed").copied();
    let session = Session::new(config, seed);

    let res = match sub {
        MenuCmd::NAME => MenuCmd::new(&session).run(m),
        KeyGenCmd::NAME => KeyGenCmd::new(&session).run(m),
        EncryptCmd::NAME => EncryptCmd.run(m),
        DecryptCmd::NAME => DecryptCmd.run(m),
        SignCmd::NAME => SignCmd.run(m),
        VerifyCmd::NAME => VerifyCmd.run(m),
        DHCmd::NAME => DHCmd::new(&session).run(m),
        name => Err(anyhow::anyhow!("unsupport for {name}")),
    };

    if log_error(res).is_none() {
        std::process::exit(1);
    }
}
