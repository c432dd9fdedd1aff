//! quizbuilder CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(
    name = "quizbuilder",
    version,
    about = "Quiz authoring and quiz taking from the terminal"
)]
struct Cli {
    /// Data directory holding the local store
    #[arg(long, global = true, default_value = "./quizbuilder-data")]
    data_dir: PathBuf,

    /// Base URL of the optional result collector
    #[arg(long, global = true, default_value = quizbuilder_sync::DEFAULT_BASE_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// "teacher" or "student"
        #[arg(long, default_value = "student")]
        role: String,
    },

    /// Sign in
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Bearer token for the result collector
        #[arg(long)]
        token: Option<String>,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Create a sample quiz file to get started
    Init,

    /// Author and manage quizzes
    Quiz {
        #[command(subcommand)]
        command: QuizCommands,
    },

    /// Take a quiz
    Take {
        quiz_id: Uuid,

        /// JSON answers file keyed by question index (non-interactive)
        #[arg(long)]
        answers: Option<PathBuf>,
    },

    /// Show your most recent result for a quiz
    Results { quiz_id: Uuid },

    /// Review one attempt question by question
    Review { attempt_id: Uuid },

    /// Teacher analytics
    Dashboard,

    /// Unseen attempt notifications
    Notifications {
        /// Keep polling once per minute
        #[arg(long)]
        watch: bool,

        /// Mark the listed notifications as viewed
        #[arg(long)]
        mark_viewed: bool,
    },

    /// Export your quizzes as a JSON bundle
    Export {
        #[arg(long)]
        output: PathBuf,

        /// Comma-separated quiz ids (default: all your quizzes)
        #[arg(long)]
        ids: Option<String>,
    },

    /// Import a JSON bundle of quizzes
    Import {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Subcommand)]
enum QuizCommands {
    /// Create a quiz from a TOML file
    Create {
        #[arg(long)]
        file: PathBuf,
    },

    /// Replace a quiz's content from a TOML file
    Update {
        id: Uuid,

        #[arg(long)]
        file: PathBuf,
    },

    /// List the quizzes you can see
    List,

    /// Make a quiz available to students
    Publish { id: Uuid },

    /// Hide a quiz from students
    Unpublish { id: Uuid },

    /// Delete a quiz
    Delete { id: Uuid },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizbuilder=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let store = commands::open_store(&cli.data_dir);

    let result = match cli.command {
        Commands::Register {
            name,
            email,
            password,
            role,
        } => commands::account::register(&store, name, email, password, &role),
        Commands::Login {
            email,
            password,
            token,
        } => commands::account::login(&store, &email, &password, token),
        Commands::Logout => commands::account::logout(&store),
        Commands::Whoami => commands::account::whoami(&store),
        Commands::Init => commands::init::execute(),
        Commands::Quiz { command } => match command {
            QuizCommands::Create { file } => commands::quiz::create(&store, &file),
            QuizCommands::Update { id, file } => commands::quiz::update(&store, id, &file),
            QuizCommands::List => commands::quiz::list(&store),
            QuizCommands::Publish { id } => commands::quiz::set_published(&store, id, true),
            QuizCommands::Unpublish { id } => commands::quiz::set_published(&store, id, false),
            QuizCommands::Delete { id } => commands::quiz::delete(&store, id),
        },
        Commands::Take { quiz_id, answers } => {
            commands::take::execute(&store, &cli.api_url, quiz_id, answers.as_deref()).await
        }
        Commands::Results { quiz_id } => commands::results::latest(&store, quiz_id),
        Commands::Review { attempt_id } => commands::results::review(&store, attempt_id),
        Commands::Dashboard => commands::dashboard::execute(&store),
        Commands::Notifications { watch, mark_viewed } => {
            commands::notifications::execute(&store, watch, mark_viewed).await
        }
        Commands::Export { output, ids } => commands::exchange::export(&store, &output, ids),
        Commands::Import { input } => commands::exchange::import(&store, &input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
