use clap::{Parser, Subcommand};
use colored::Colorize;
use quickserve_lib::{
    Client,
    config::CoreConfig,
    demo,
    notify::{Level, Notifications},
};
use sysexits::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod customers;
mod moderators;
mod workers;

#[derive(Parser, Debug)]
#[command(name = "quickserve")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the configured API URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Run against built-in sample data instead of a server
    #[arg(long, global = true)]
    demo: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Operate on customers
    #[command(subcommand)]
    Customers(customers::Command),
    /// Operate on moderators
    #[command(subcommand)]
    Moderators(moderators::Command),
    /// Operate on workers
    #[command(subcommand)]
    Workers(workers::Command),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not set up logging: {err}");
    }

    let cli = Cli::parse();

    let client = match connect(&cli) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            return ExitCode::Config;
        }
    };

    let code = match &cli.command {
        Command::Customers(cmd) => customers::handle(&client, cmd).await,
        Command::Moderators(cmd) => moderators::handle(&client, cmd).await,
        Command::Workers(cmd) => workers::handle(&client, cmd).await,
    };

    print_notifications(client.notifications());

    code
}

fn connect(cli: &Cli) -> quickserve_lib::Result<Client> {
    let mut cfg = CoreConfig::load()?;
    cfg.override_api_url(cli.api_url.clone());

    if cli.demo {
        Ok(demo::client(cfg.query))
    } else {
        Client::new(&cfg)
    }
}

fn print_notifications(notifications: &Notifications) {
    for notification in notifications.drain() {
        match notification.level {
            Level::Success => println!("{}", notification.message.green()),
            Level::Error => eprintln!("{}", notification.message.red()),
        }
    }
}
