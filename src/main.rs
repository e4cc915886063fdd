use clap::Parser;
use moodlog::cli::{
    handle_init, handle_list, handle_serve, handle_tracker, handle_user_add, handle_user_list,
    Cli, Commands, UserAction,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("moodlog=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let db = cli.db;

    let result = match cli.command {
        Commands::Init => handle_init(db),
        Commands::Serve { addr, collision } => handle_serve(db, addr, collision),
        Commands::User(user_cmd) => match user_cmd.action {
            UserAction::Add { username } => handle_user_add(db, username),
            UserAction::List { json } => handle_user_list(db, json),
        },
        Commands::List { user, json } => handle_list(db, user, json),
        Commands::Tracker {
            user,
            month,
            collision,
            json,
        } => handle_tracker(db, user, month, collision, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
