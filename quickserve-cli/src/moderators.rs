use clap::Subcommand;
use colored::Colorize;
use quickserve_lib::{Client, workflow::ModeratorDirectory};
use sysexits::ExitCode;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List moderators
    List {
        /// Only show moderators whose name or email contains this
        #[arg(short, long)]
        search: Option<String>,
    },
}

pub async fn handle(client: &Client, cmd: &Command) -> ExitCode {
    match cmd {
        Command::List { search } => {
            let users = match client.customers().get_all().await {
                Ok(users) => users,
                Err(err) => {
                    eprintln!("{}", err.message.red());
                    return ExitCode::Unavailable;
                }
            };

            let mut directory = ModeratorDirectory::new(users);
            if let Some(search) = search {
                directory.set_search(search.clone());
            }

            let view = directory.view();
            println!(
                "Total: {}  Active: {}  Inactive: {}",
                view.summary.total,
                view.summary.active.to_string().green(),
                view.summary.inactive.to_string().red()
            );

            if let Some(empty) = view.empty {
                println!("{}", empty.message().dimmed());
            }

            for moderator in &view.moderators {
                let status = if moderator.is_active() {
                    "active".green()
                } else {
                    "inactive".red()
                };
                println!(
                    "* {} <{}> {}",
                    moderator.display_name(),
                    moderator.email,
                    status
                );
            }

            ExitCode::Ok
        }
    }
}
