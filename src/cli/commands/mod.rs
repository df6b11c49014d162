use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("sentinelo")
        .about("Account authentication service")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("SENTINELO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("max-attempts")
                .long("max-attempts")
                .help("Consecutive password failures before an account is locked")
                .default_value("3")
                .env("SENTINELO_MAX_ATTEMPTS")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("lockout-seconds")
                .long("lockout-seconds")
                .help("How long a locked account rejects all login attempts")
                .default_value("60")
                .env("SENTINELO_LOCKOUT_SECONDS")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("audit-log")
                .long("audit-log")
                .help("Append audit events to this file instead of the log stream")
                .env("SENTINELO_AUDIT_LOG"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("SENTINELO_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
