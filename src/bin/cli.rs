use clap::{Parser, Subcommand};
use referral_tracker::{
    config::{ServerConfig, TokenConfig},
    db,
    services::SignupRequest,
    AppState,
};

#[derive(Parser)]
#[command(name = "referral-tracker-cli")]
#[command(about = "CLI tool for managing referral tracker users", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Referral inspection commands
    Referrals {
        #[command(subcommand)]
        command: ReferralCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Unique username
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// Referral code of the inviting user
        #[arg(short, long, default_value = "")]
        referral_code: String,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },
}

#[derive(Subcommand)]
enum ReferralCommands {
    /// List the invitations sent by a user
    List {
        /// Username of the referrer
        #[arg(short, long)]
        username: String,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let pool = db::create_pool().await?;
    db::run_migrations(&pool).await?;

    // Tokens are never issued here, so the signing key is irrelevant
    let state = AppState::new(pool, &ServerConfig::from_env(), &TokenConfig::new(Vec::new()));

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                username,
                email,
                password,
                referral_code,
            } => {
                let password = match password {
                    Some(pw) => pw,
                    None => {
                        let password = get_password("Password")?;
                        if password != get_password("Confirm password")? {
                            eprintln!("❌ Passwords do not match");
                            std::process::exit(1);
                        }
                        password
                    }
                };

                let request = SignupRequest {
                    username,
                    email,
                    password,
                    referral_code,
                };

                match state.user_service.signup(request).await {
                    Ok(user) => {
                        println!("✅ User created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Username: {}", user.username);
                        println!("  Email: {}", user.email);
                        println!("  Referral code: {}", user.referral_code);
                        if let Some(referrer) = user.referred_by {
                            println!("  Referred by: {}", referrer);
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to create user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::List { limit, offset } => {
                match state.user_service.list_users(Some(limit), Some(offset)).await {
                    Ok(users) => {
                        if users.is_empty() {
                            println!("No users found.");
                        } else {
                            println!(
                                "{:<5} {:<20} {:<35} {:<6} {:<20}",
                                "ID", "Username", "Email", "Code", "Referred by"
                            );
                            println!("{}", "-".repeat(90));
                            for user in users {
                                println!(
                                    "{:<5} {:<20} {:<35} {:<6} {:<20}",
                                    user.id,
                                    user.username,
                                    user.email,
                                    user.referral_code,
                                    user.referred_by.as_deref().unwrap_or("-")
                                );
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list users: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        },

        Commands::Referrals { command } => match command {
            ReferralCommands::List { username } => {
                match state.referral_service.referrals_for(&username).await {
                    Ok(referrals) => {
                        if referrals.is_empty() {
                            println!("No referrals found for '{}'.", username);
                        } else {
                            println!("{:<5} {:<25} {:<35} {:<10}", "ID", "Name", "Email", "Status");
                            println!("{}", "-".repeat(78));
                            for referral in referrals {
                                println!(
                                    "{:<5} {:<25} {:<35} {:<10}",
                                    referral.id,
                                    referral.referee_name,
                                    referral.referee_email,
                                    referral.referee_status.as_str()
                                );
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list referrals: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        },
    }

    Ok(())
}
