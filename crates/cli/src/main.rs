use anyhow::Context;
use bookshelf_app::modules::urls::normalize::{UrlNormalizer, UrlOperation};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Bookshelf service command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Create the books table if it does not exist, then exit
    Migrate,
    /// Apply URL rules locally and print the result
    Normalize {
        /// Rules to apply
        #[arg(short, long, value_enum, default_value_t = OperationArg::All)]
        operation: OperationArg,
        url: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OperationArg {
    /// Drop the query and one trailing slash
    Canonical,
    /// Point at the configured host and lower-case the result
    Redirection,
    /// Canonical, then redirection
    All,
}

impl From<OperationArg> for UrlOperation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Canonical => UrlOperation::Canonical,
            OperationArg::Redirection => UrlOperation::Redirection,
            OperationArg::All => UrlOperation::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = bookshelf_kernel::settings::Settings::load()
        .with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => bookshelf_app::bootstrap::serve(settings).await,
        Command::Migrate => {
            bookshelf_app::bootstrap::migrate(&settings).await?;
            tracing::info!("books table is up to date");
            Ok(())
        }
        Command::Normalize { operation, url } => {
            let normalizer = UrlNormalizer::new(settings.urls.redirect_host);
            println!("{}", normalizer.process(&url, operation.into())?);
            Ok(())
        }
    }
}
