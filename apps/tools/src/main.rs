use anyhow::Result;
use clap::{Parser, Subcommand};
use server_api::ApiContext;
use shared::{domain::UserId, error::ApiException};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/users.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every stored user.
    List,
    Create {
        name: String,
        email: String,
    },
    Delete {
        user_id: i64,
    },
    /// Insert `count` placeholder users, skipping emails already taken.
    Seed {
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let ctx = ApiContext {
        storage: Storage::new(&cli.database_url).await?,
    };

    match cli.command {
        Command::List => {
            let users = server_api::list_users(&ctx)
                .await
                .map_err(ApiException::from)?;
            for user in &users {
                println!("{}\t{}\t{}", user.id, user.name, user.email);
            }
            println!("{} user(s)", users.len());
        }
        Command::Create { name, email } => {
            let user = server_api::create_user(&ctx, &name, &email)
                .await
                .map_err(ApiException::from)?;
            println!("created user_id={}", user.id);
        }
        Command::Delete { user_id } => {
            server_api::delete_user(&ctx, UserId(user_id))
                .await
                .map_err(ApiException::from)?;
            println!("deleted user_id={user_id}");
        }
        Command::Seed { count } => {
            let mut created = 0;
            for n in 1..=count {
                let email = format!("seed{n}@example.com");
                match server_api::create_user(&ctx, &format!("Seed User {n}"), &email).await {
                    Ok(_) => created += 1,
                    Err(err) => tracing::warn!(%email, message = %err.message, "skipped seed user"),
                }
            }
            println!("seeded {created} user(s)");
        }
    }

    Ok(())
}
