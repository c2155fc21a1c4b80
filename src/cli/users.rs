use clap::Subcommand;
use rand::Rng;

use crate::auth::hash_password;
use crate::storage::{CreateUser, SqliteUserStore, UserStore};

/// User management subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a new user
    Create {
        /// User's email address
        #[arg(short, long)]
        email: String,

        /// User's display name
        #[arg(short, long)]
        name: String,

        /// Password (if not provided, a random one will be generated)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List,
}

impl UserCommands {
    /// Execute the user command
    pub async fn execute(self, store: &SqliteUserStore) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            UserCommands::Create {
                email,
                name,
                password,
            } => {
                let password = password.unwrap_or_else(generate_password);
                let password_hash = hash_password(&password)?;

                let user = store
                    .create_user(CreateUser {
                        name,
                        email,
                        password_hash,
                    })
                    .await?;

                println!("User created successfully!");
                println!();
                println!("   Email:    {}", user.email);
                println!("   Name:     {}", user.name);
                println!("   Password: {}", password);
            }
            UserCommands::List => {
                let users = store.list_users().await?;
                println!("{:<30} {:<25} {}", "Email", "Name", "Created");
                println!("{}", "-".repeat(75));
                for user in users {
                    println!(
                        "{:<30} {:<25} {}",
                        user.email,
                        user.name,
                        user.created_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
        }
        Ok(())
    }
}

fn generate_password() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..20)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
