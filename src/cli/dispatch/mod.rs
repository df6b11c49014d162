use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        max_attempts: matches.get_one::<u32>("max-attempts").copied().unwrap_or(3),
        lockout_seconds: matches
            .get_one::<u64>("lockout-seconds")
            .copied()
            .unwrap_or(60),
        audit_log: matches.get_one::<String>("audit-log").cloned(),
    })
}
