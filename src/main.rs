use chrono::Local;
use clap::Parser;
use tcache::application::sync::SyncController;
use tcache::application::{
    ensure_remote_repository, list_logs, search_logs, view_log, CreateLogService, CreateOutcome,
    RepoProvisioning, SetupAnswers,
};
use tcache::cli::output::{
    format_debug_report, format_log_list, format_pull_outcome, format_push_outcome,
    format_search_results, format_sync_status,
};
use tcache::cli::{Cli, Commands, GithubCommand};
use tcache::error::TcacheError;
use tcache::infrastructure::{GitHubClient, LogRepository, LogStore, RealGit, TerminalPrompter};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e.display_with_suggestions());
        let code = e.exit_code();
        if code != 0 {
            std::process::exit(code);
        }
    }
}

fn run(cli: Cli) -> Result<(), TcacheError> {
    let repository = LogRepository::discover()?;
    repository.initialize()?;

    let command = cli.command.unwrap_or(Commands::New);

    if command.pulls_on_start() {
        pull_on_start(&repository);
    }

    match command {
        Commands::New => cmd_new(&repository),
        Commands::View { date } => {
            let viewed = view_log(&repository, date.as_deref(), Local::now().date_naive())?;
            match viewed.content {
                Some(content) => println!("\n{}", content),
                None => println!("No cache found for {}", viewed.date.format("%Y-%m-%d")),
            }
            Ok(())
        }
        Commands::List { limit } => {
            let logs = list_logs(&repository, limit)?;
            println!("{}", format_log_list(&logs).trim_end());
            Ok(())
        }
        Commands::Search { term } => {
            let results = search_logs(&repository, &term)?;
            println!("{}", format_search_results(&term, &results).trim_end());
            Ok(())
        }
        Commands::Github { action } => {
            cmd_github(&repository, action.unwrap_or(GithubCommand::Status))
        }
    }
}

fn cmd_new(repository: &LogRepository) -> Result<(), TcacheError> {
    println!("Task Cache - Quick Daily Task Log");
    println!("Press Ctrl+C at any time to cancel");
    println!("Tip: Use double spaces to create bullet points on new lines\n");

    let service = CreateLogService::new(repository.clone());
    let mut prompter = TerminalPrompter::stdio();

    match service.execute(&mut prompter, Local::now().naive_local())? {
        CreateOutcome::Cancelled => {
            println!("Exiting without changes.");
            Ok(())
        }
        CreateOutcome::Saved(path) => {
            println!("\nTask cache saved to {}", path.display());
            auto_sync(repository);
            Ok(())
        }
    }
}

/// Push after a save when auto-sync is on; failures leave the saved log in place
fn auto_sync(repository: &LogRepository) {
    let config = match repository.load_sync_config() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "could not read sync config");
            return;
        }
    };
    if !(config.is_enabled() && config.auto_sync) {
        return;
    }

    println!("Pushing task cache to GitHub...");
    let mut sync = SyncController::new(RealGit::new(), repository.clone(), config);
    match sync.push() {
        Ok(outcome) => println!("{}", format_push_outcome(outcome)),
        Err(e) => eprintln!("Sync failed: {}", e.display_with_suggestions()),
    }
}

fn pull_on_start(repository: &LogRepository) {
    let config = match repository.load_sync_config() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "could not read sync config");
            return;
        }
    };
    if !(config.is_enabled() && config.sync_on_start) {
        return;
    }

    println!("Pulling task cache from GitHub...");
    let mut sync = SyncController::new(RealGit::new(), repository.clone(), config);
    match sync.pull() {
        Ok(outcome) => println!("{}", format_pull_outcome(outcome, &sync.config().branch)),
        Err(e) => eprintln!("Sync failed: {}", e.display_with_suggestions()),
    }
}

fn cmd_github(repository: &LogRepository, action: GithubCommand) -> Result<(), TcacheError> {
    let config = repository.load_sync_config()?;
    let mut sync = SyncController::new(RealGit::new(), repository.clone(), config);

    match action {
        GithubCommand::Status => {
            print!("{}", format_sync_status(&sync.status()));
        }
        GithubCommand::Setup => {
            println!("Task Cache - GitHub Sync Setup\n");
            if sync.config().token.is_empty() {
                println!("A GitHub Personal Access Token is required for authentication.");
                println!("Create one at https://github.com/settings/tokens");
                println!("Make sure it has \"repo\" scope for private repositories.\n");
            }

            let mut prompter = TerminalPrompter::stdio();
            let answers = SetupAnswers::prompt(&mut prompter, sync.config())?;
            sync.configure(answers)?;
            println!("\nGitHub repository configured successfully.");
        }
        GithubCommand::Push => {
            println!("Pushing task cache to GitHub...");
            let outcome = sync.push()?;
            println!("{}", format_push_outcome(outcome));
        }
        GithubCommand::Pull => {
            println!("Pulling task cache from GitHub...");
            let outcome = sync.pull()?;
            println!("{}", format_pull_outcome(outcome, &sync.config().branch));
        }
        GithubCommand::CreateRepo => {
            let client = GitHubClient::new()?;
            match ensure_remote_repository(&client, sync.config())? {
                RepoProvisioning::AlreadyExists => println!("Repository already exists."),
                RepoProvisioning::Created => println!("Repository created successfully."),
            }
        }
        GithubCommand::Debug => {
            print!("{}", format_debug_report(&sync.debug_report()));
        }
    }

    Ok(())
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
