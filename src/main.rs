use anyhow::Result;
use caravan_finance::cli::enquiry::EnquiryCommand;
use caravan_finance::cli::quote::QuoteArgs;
use caravan_finance::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for caravan_finance::AppCommand {
    fn from(cmd: Commands) -> caravan_finance::AppCommand {
        match cmd {
            Commands::Calc(args) => caravan_finance::AppCommand::Calc(args),
            Commands::Compare(args) => caravan_finance::AppCommand::Compare(args),
            Commands::Schedule { quote, yearly } => {
                caravan_finance::AppCommand::Schedule { quote, yearly }
            }
            Commands::Models => caravan_finance::AppCommand::Models,
            Commands::Enquiry { command } => caravan_finance::AppCommand::Enquiry(command),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Quote repayments for a caravan
    Calc(QuoteArgs),
    /// Compare repayments across terms and payment frequencies
    Compare(QuoteArgs),
    /// Show the month-by-month amortization schedule
    Schedule {
        #[command(flatten)]
        quote: QuoteArgs,
        /// Summarise by year instead of by month
        #[arg(long)]
        yearly: bool,
    },
    /// List the caravan model catalogue
    Models,
    /// Manage finance enquiries
    Enquiry {
        #[command(subcommand)]
        command: EnquiryCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => caravan_finance::cli::setup::setup_at_path(path),
            None => caravan_finance::cli::setup::setup(),
        },
        Some(cmd) => caravan_finance::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
