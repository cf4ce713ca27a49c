use std::io::{self, BufRead, Write};

use clap::Subcommand;
use colored::Colorize;
use quickserve_lib::{
    Client,
    models::{Customer, RecordId},
    workflow::{CustomerTable, DeleteModal, DeleteOutcome, EditModal, EditOutcome, Field},
};
use sysexits::ExitCode;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List customers
    List {
        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a customer's details
    Update {
        id: RecordId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a customer
    Delete {
        id: RecordId,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle(client: &Client, cmd: &Command) -> ExitCode {
    match cmd {
        Command::List { json } => list(client, *json).await,
        Command::Update {
            id,
            name,
            email,
            phone,
        } => {
            let changes = [
                (Field::Name, name.clone()),
                (Field::Email, email.clone()),
                (Field::Phone, phone.clone()),
            ];
            update(client, id, changes).await
        }
        Command::Delete { id, yes } => delete(client, id, *yes).await,
    }
}

async fn list(client: &Client, json: bool) -> ExitCode {
    let customers = match client.customers().get_all().await {
        Ok(customers) => customers,
        Err(err) => {
            eprintln!("{}", err.message.red());
            return ExitCode::Unavailable;
        }
    };

    if json {
        return match serde_json::to_string_pretty(&customers) {
            Ok(out) => {
                println!("{out}");
                ExitCode::Ok
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::Software
            }
        };
    }

    if customers.is_empty() {
        println!("No customers");
        return ExitCode::Ok;
    }

    for customer in CustomerTable::default().rows(&customers) {
        println!(
            "{:>6}  {:<24} {:<32} {}",
            customer.id.to_string().dimmed(),
            customer.display_name().bold(),
            customer.email,
            customer.phone
        );
    }

    ExitCode::Ok
}

async fn find(client: &Client, id: &RecordId) -> Result<Customer, ExitCode> {
    let customers = client.customers().get_all().await.map_err(|err| {
        eprintln!("{}", err.message.red());
        ExitCode::Unavailable
    })?;

    // Ids typed on the command line can't say whether the server sends them as numbers or strings
    let wanted = id.to_string();
    customers.into_iter().find(|c| c.id.to_string() == wanted).ok_or_else(|| {
        eprintln!("No customer with id {id}");
        ExitCode::NoInput
    })
}

async fn update(
    client: &Client,
    id: &RecordId,
    changes: [(Field, Option<String>); 3],
) -> ExitCode {
    if changes.iter().all(|(_, value)| value.is_none()) {
        eprintln!("Nothing to update, pass at least one of --name, --email or --phone");
        return ExitCode::Usage;
    }

    let target = match find(client, id).await {
        Ok(target) => target,
        Err(code) => return code,
    };

    let mut modal = EditModal::default();
    modal.open(target);
    for (field, value) in changes {
        if let Some(value) = value {
            modal.set_field(field, value);
        }
    }

    let Some(request) = modal.submit() else {
        return ExitCode::Software;
    };
    let result = client.customers().update(&request.id, &request.patch).await;

    match modal.resolve(request.ticket, &result) {
        EditOutcome::Saved => ExitCode::Ok,
        EditOutcome::Rejected => {
            let mut has_field_errors = false;
            for field in Field::ALL {
                if let Some(message) = modal.error(field) {
                    has_field_errors = true;
                    eprintln!("{}: {}", field.to_string().bold(), message.red());
                }
            }

            if has_field_errors {
                ExitCode::DataErr
            } else {
                ExitCode::Unavailable
            }
        }
        EditOutcome::Ignored => ExitCode::Software,
    }
}

async fn delete(client: &Client, id: &RecordId, yes: bool) -> ExitCode {
    let target = match find(client, id).await {
        Ok(target) => target,
        Err(code) => return code,
    };

    let mut modal = DeleteModal::default();
    modal.open(target);

    if !yes {
        let prompt = modal.prompt().unwrap_or_default();
        if !confirm(&prompt) {
            println!("Cancelled");
            return ExitCode::Ok;
        }
    }

    let Some(request) = modal.confirm() else {
        return ExitCode::Software;
    };
    let result = client.customers().delete(&request.id).await;

    match modal.resolve(request.ticket, &result) {
        DeleteOutcome::Deleted => ExitCode::Ok,
        DeleteOutcome::Failed => ExitCode::Unavailable,
        DeleteOutcome::Ignored => ExitCode::Software,
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
