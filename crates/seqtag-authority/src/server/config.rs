use anyhow::bail;
use clap::Parser;
use std::path::PathBuf;

/// Runtime configuration for the `seqtag-authority` binary.
///
/// These settings control where the authority listens, where it persists
/// its counter and ledger, and the bounds it enforces on reservations and
/// submissions. All values are parsed from CLI arguments or environment
/// variables, with defaults suitable for a single-instance deployment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "seqtag-authority",
    version,
    about = "The sequence authority of record for seqtag identifier allocation"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Counter value to start from when no state file exists.
    ///
    /// Ignored when a state file is present: the persisted counter wins,
    /// because handing out an earlier value would break monotonicity.
    ///
    /// Environment variable: `INITIAL_COUNTER`
    #[arg(long, env = "INITIAL_COUNTER", default_value_t = 0)]
    pub initial_counter: u64,

    /// Path of the JSON state file holding the counter and the ledger.
    ///
    /// When unset, state lives in memory only and restarts forget it.
    ///
    /// Environment variable: `STATE_FILE`
    #[arg(long, env = "STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Maximum number of identifiers a single reservation may request.
    ///
    /// Enforced to keep one misbehaving client from consuming the
    /// identifier space. Requests above this answer `success: false`.
    ///
    /// Environment variable: `MAX_RESERVE`
    #[arg(long, env = "MAX_RESERVE", default_value_t = 100_000)]
    pub max_reserve: u64,

    /// Maximum number of records a single submission may carry.
    ///
    /// Environment variable: `MAX_BATCH`
    #[arg(long, env = "MAX_BATCH", default_value_t = 10_000)]
    pub max_batch: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub initial_counter: u64,
    pub state_file: Option<PathBuf>,
    pub max_reserve: u64,
    pub max_batch: usize,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_reserve == 0 {
            bail!("MAX_RESERVE must be greater than 0");
        }
        if args.max_batch == 0 {
            bail!("MAX_BATCH must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            initial_counter: args.initial_counter,
            state_file: args.state_file,
            max_reserve: args.max_reserve,
            max_batch: args.max_batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            server_addr: "127.0.0.1:0".into(),
            initial_counter: 0,
            state_file: None,
            max_reserve: 10,
            max_batch: 10,
        }
    }

    #[test]
    fn valid_args_pass_through() {
        let config = ServerConfig::try_from(args()).unwrap();
        assert_eq!(config.max_reserve, 10);
    }

    #[test]
    fn zero_bounds_are_rejected() {
        let mut bad = args();
        bad.max_reserve = 0;
        assert!(ServerConfig::try_from(bad).is_err());

        let mut bad = args();
        bad.max_batch = 0;
        assert!(ServerConfig::try_from(bad).is_err());
    }
}
