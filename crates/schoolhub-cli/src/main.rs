use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use schoolhub_cli::admin::create_admin;
use schoolhub_cli::seeder::{self, SeedConfig};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "schoolhub-cli")]
#[command(about = "SchoolHub CLI - Administrative tools for SchoolHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Full name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create the twelve demo classes (Crèche to Grade 9)
    SeedClasses,
    /// Seed the database with fake teachers and students
    Seed {
        /// Number of teachers to create
        #[arg(short = 't', long, default_value = "10")]
        teachers: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "200")]
        students: usize,

        /// Password for every seeded account
        #[arg(long, default_value = "password123")]
        password: String,
    },
    /// Clear all seeded accounts (keeps admins)
    ClearSeed {
        /// Also delete the demo classes
        #[arg(long)]
        classes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .map_err(|e| format!("Failed to connect to database: {}", e))?;

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await,
        Commands::SeedClasses => {
            let created = seeder::seed_demo_classes(&pool).await?;
            println!("✅ Created {} classes", created);
            Ok(())
        }
        Commands::Seed {
            teachers,
            students,
            password,
        } => {
            let config = SeedConfig::new(teachers, students).with_password(password);
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed { classes } => seeder::clear_all(&pool, classes).await,
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Full name").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    create_admin(pool, &name, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   Email: {}", email);
    println!("   Name: {}", name);
    Ok(())
}
