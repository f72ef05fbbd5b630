use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use markbook::cli::create_admin;
use markbook::cli::seeder::{SeedConfig, clear_seeded_data, seed_database};

#[derive(Parser)]
#[command(name = "markbook-cli")]
#[command(about = "Markbook CLI - Administrative tools for Markbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: String,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: String,

        /// Email address
        #[arg(short = 'e', long)]
        email: String,

        /// Password
        #[arg(short = 'p', long)]
        password: String,
    },
    /// Seed the database with fake users, courses, and classes
    Seed {
        /// Number of teachers to create
        #[arg(long, default_value = "10")]
        teachers: usize,

        /// Number of students to create
        #[arg(long, default_value = "100")]
        students: usize,

        /// Number of classrooms to create
        #[arg(long, default_value = "8")]
        classrooms: usize,

        /// Number of courses to create
        #[arg(long, default_value = "5")]
        courses: usize,

        /// Number of school classes per course
        #[arg(long, default_value = "2")]
        classes_per_course: usize,

        /// Capacity of each school class
        #[arg(long, default_value = "10")]
        students_per_class: usize,
    },
    /// Clear seeded data (keeps manually created accounts)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => match create_admin(&pool, &first_name, &last_name, &email, &password).await {
            Ok(()) => println!("✅ Admin created successfully!"),
            Err(e) => {
                eprintln!("❌ Failed to create admin: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Seed {
            teachers,
            students,
            classrooms,
            courses,
            classes_per_course,
            students_per_class,
        } => {
            let config = SeedConfig {
                teachers,
                students,
                classrooms,
                courses,
                classes_per_course,
                students_per_class,
            };
            if let Err(e) = seed_database(&pool, config).await {
                eprintln!("❌ Seeding failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = clear_seeded_data(&pool).await {
                eprintln!("❌ Failed to clear seeded data: {}", e);
                std::process::exit(1);
            }
        }
    }
}
