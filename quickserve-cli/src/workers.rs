use clap::Subcommand;
use colored::Colorize;
use quickserve_lib::Client;
use sysexits::ExitCode;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List workers and the services they offer
    List,
}

pub async fn handle(client: &Client, cmd: &Command) -> ExitCode {
    match cmd {
        Command::List => match client.workers().get_all().await {
            Ok(workers) => {
                for worker in workers {
                    println!("{}: {}", worker.name.bold(), worker.services().display());
                }
                ExitCode::Ok
            }
            Err(err) => {
                eprintln!("{}", err.message.red());
                ExitCode::Unavailable
            }
        },
    }
}
