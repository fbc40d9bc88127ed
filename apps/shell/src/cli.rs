use clap::{Parser, Subcommand};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:4583";

#[derive(Parser, Debug)]
#[command(name = "callkit", version, about = "Telephony setup wizard")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "CALLKIT_SERVER",
        default_value = DEFAULT_SERVER,
        help = "Base URL of the control API"
    )]
    pub server: String,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "CALLKIT_ACCOUNT_SID",
        requires = "auth_token",
        help = "Account SID sent as a per-request override"
    )]
    pub account_sid: Option<String>,
    #[arg(
        long,
        global = true,
        env = "CALLKIT_AUTH_TOKEN",
        hide_env_values = true,
        requires = "account_sid",
        help = "Auth token sent as a per-request override"
    )]
    pub auth_token: Option<String>,
    #[arg(short, long, global = true, help = "Log HTTP traffic and retries")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the readiness checklist.
    Status,
    /// Re-render the checklist whenever it changes.
    Watch {
        #[arg(long, default_value_t = 1000, help = "Refresh interval in milliseconds")]
        interval_ms: u64,
        #[arg(long, help = "Exit as soon as every step is done")]
        until_ready: bool,
    },
    Credentials {
        #[command(subcommand)]
        command: CredentialsCommands,
    },
    Numbers {
        #[command(subcommand)]
        command: NumbersCommands,
    },
    Webhook {
        #[command(subcommand)]
        command: WebhookCommands,
    },
    /// Check that the public tunnel URL is reachable from outside.
    Probe,
    /// Place an outbound call once setup is complete.
    Call {
        phone_number: String,
        #[arg(long, help = "Call even when the checklist is not complete")]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CredentialsCommands {
    /// Show the stored credentials, masked.
    Show,
    /// Store the account credentials on the server.
    Set {
        #[arg(value_name = "ACCOUNT_SID")]
        sid: String,
        #[arg(value_name = "AUTH_TOKEN", env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
        token: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum NumbersCommands {
    /// List the numbers provisioned on the account.
    List,
    /// Choose the number used for calls and the webhook.
    Select { sid: String },
}

#[derive(Subcommand, Debug)]
pub enum WebhookCommands {
    /// Point the selected number at `<public URL>/twiml`.
    Update,
    /// Set an arbitrary voice URL on a number.
    Set { sid: String, voice_url: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_must_come_in_pairs() {
        let err = Cli::try_parse_from(["callkit", "--account-sid", "AC1", "status"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "callkit",
            "--account-sid",
            "AC1",
            "--auth-token",
            "secret",
            "numbers",
            "list",
        ])
        .expect("parse");
        assert_eq!(cli.account_sid.as_deref(), Some("AC1"));
        assert!(matches!(cli.command, Commands::Numbers { command: NumbersCommands::List }));
    }

    #[test]
    fn call_takes_a_destination_and_force_flag() {
        let cli = Cli::try_parse_from(["callkit", "call", "+15550001111", "--force"]).expect("parse");
        match cli.command {
            Commands::Call { phone_number, force } => {
                assert_eq!(phone_number, "+15550001111");
                assert!(force);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }
}
