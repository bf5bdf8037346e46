use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sqldraft - turn plain-English change requests into reviewable SQL scripts
#[derive(Parser, Debug, Clone)]
#[command(name = "sqldraft")]
#[command(version, long_about = None)]
#[command(about = "Turn plain-English change requests into reviewable, transaction-wrapped SQL")]
pub struct Args {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH", env = "SQLDRAFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory of SQL templates (one per file)
    #[arg(long, global = true, value_name = "DIR")]
    pub library: Option<PathBuf>,

    /// Log debug details of the pipeline to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a script for a request
    ///
    /// Example: sqldraft generate "change john doe's name to jane doe for user 42"
    Generate {
        /// The request, in plain English
        #[arg(required = true, num_args = 1..)]
        request: Vec<String>,

        /// User recorded in the audit log
        #[arg(short, long)]
        user: Option<String>,

        /// Print {"script", "explanation"} as JSON
        #[arg(long)]
        json: bool,

        /// Do not record the script in the audit log
        #[arg(long)]
        no_audit: bool,

        /// Do not send the notification
        #[arg(long)]
        no_notify: bool,
    },

    /// List loaded templates and the request types each serves
    Templates,

    /// Show recently generated scripts from the audit log
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_generate_joins_words() {
        let args = Args::try_parse_from([
            "sqldraft",
            "generate",
            "delete",
            "old",
            "row",
            "--user",
            "asmith",
            "--json",
        ])
        .unwrap();

        match args.command {
            Command::Generate {
                request,
                user,
                json,
                no_audit,
                ..
            } => {
                assert_eq!(request.join(" "), "delete old row");
                assert_eq!(user.as_deref(), Some("asmith"));
                assert!(json);
                assert!(!no_audit);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[rstest]
    fn test_global_library_flag() {
        let args =
            Args::try_parse_from(["sqldraft", "templates", "--library", "/srv/sql"]).unwrap();
        assert_eq!(args.library, Some(PathBuf::from("/srv/sql")));
        assert!(matches!(args.command, Command::Templates));
    }

    #[rstest]
    fn test_history_default_limit() {
        let args = Args::try_parse_from(["sqldraft", "history"]).unwrap();
        assert!(matches!(args.command, Command::History { limit: 10 }));
    }

    #[rstest]
    fn test_generate_requires_request() {
        assert!(Args::try_parse_from(["sqldraft", "generate"]).is_err());
    }
}
