//! Available commands.

use clap::Subcommand;

/// Available commands for the launcher.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the local server and follow its output until Ctrl-C
    Start {
        /// Print bridge events as JSON lines instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Check whether the server files are present
    Check,

    /// Probe a running server once
    Ping {
        /// Port the server announced
        #[arg(short, long)]
        port: u16,
    },

    /// Log in through a running server
    Login {
        /// Port the server announced
        #[arg(short, long)]
        port: u16,

        #[command(subcommand)]
        method: LoginMethod,
    },

    /// Show resolved paths
    Paths,
}

/// Supported login methods.
#[derive(Subcommand)]
pub enum LoginMethod {
    /// 4399 account
    #[command(name = "4399")]
    FourThreeNineNine {
        #[arg(long)]
        account: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        captcha: String,
    },

    /// SAuth token
    Sauth {
        #[arg(long)]
        sauth: String,
    },

    /// Official Netease account
    Official {
        #[arg(long)]
        account: String,
        #[arg(long)]
        password: String,
        #[arg(long = "device-id", default_value = "")]
        device_id: String,
        #[arg(long = "device-key", default_value = "")]
        device_key: String,
    },
}

#[cfg(test)]
mod tests {
    use crate::parser::Cli;
    use clap::Parser;

    use super::*;

    #[test]
    fn test_login_4399_parses() {
        let cli = Cli::parse_from([
            "anre", "login", "--port", "51234", "4399", "--account", "me", "--password", "pw",
        ]);
        match cli.command {
            Some(Commands::Login {
                port,
                method: LoginMethod::FourThreeNineNine { account, captcha, .. },
            }) => {
                assert_eq!(port, 51234);
                assert_eq!(account, "me");
                assert_eq!(captcha, "");
            }
            _ => panic!("expected login 4399"),
        }
    }

    #[test]
    fn test_start_defaults_to_text() {
        let cli = Cli::parse_from(["anre", "start"]);
        assert!(matches!(cli.command, Some(Commands::Start { json: false })));
    }
}
