use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use learnhub::cli::{assign_department, create_admin};
use learnhub_db::{init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "learnhub-cli")]
#[command(about = "LearnHub CLI - Administrative tools for LearnHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a verified administrator account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Assign a teacher to a department
    AssignDepartment {
        /// Teacher's email address
        #[arg(short = 'e', long)]
        email: String,

        /// Department id
        #[arg(short = 'd', long)]
        department_id: i64,
    },
}

fn prompt_text(prompt: &str) -> String {
    match Input::new().with_prompt(prompt).interact_text() {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Failed to read {}: {}", prompt.to_lowercase(), e);
            std::process::exit(1);
        }
    }
}

fn prompt_password() -> String {
    match Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords don't match")
        .interact()
    {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Failed to read password: {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let pool = init_db_pool().await;
    run_migrations(&pool).await;

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => {
            let name = name.unwrap_or_else(|| prompt_text("Name"));
            let email = email.unwrap_or_else(|| prompt_text("Email address"));
            let password = password.unwrap_or_else(prompt_password);

            match create_admin(&pool, &name, &email, &password).await {
                Ok(user) => {
                    println!("\n✅ Admin created successfully!");
                    println!("   Id: {}", user.id);
                    println!("   Email: {}", user.email);
                }
                Err(e) => {
                    eprintln!("\n❌ Error creating admin: {}", e.message());
                    std::process::exit(1);
                }
            }
        }
        Commands::AssignDepartment {
            email,
            department_id,
        } => match assign_department(&pool, &email, department_id).await {
            Ok(profile) => {
                println!("\n✅ Teacher {} assigned to department {}", email, department_id);
                println!("   Profile id: {}", profile.id);
            }
            Err(e) => {
                eprintln!("\n❌ Error assigning department: {}", e.message());
                std::process::exit(1);
            }
        },
    }
}
