mod account_number;
mod cli;
mod db;
mod error;
mod fmt;
mod importer;
mod models;
mod money;
mod networth;
mod reader;
mod registry;
mod settings;
mod storage;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{BanksCommands, Cli, Commands, FamilyCommands, MemberCommands, NetworthCommands};

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    reader::register_builtin_readers(registry::global());

    let result = match cli.command {
        Commands::Init {
            data_dir,
            default_bank,
        } => cli::init::run(data_dir, default_bank),
        Commands::Family { command } => match command {
            FamilyCommands::Add { name } => cli::family::add(&name),
            FamilyCommands::List => cli::family::list(),
            FamilyCommands::Show { id } => cli::family::show(id),
            FamilyCommands::Rename { id, name } => cli::family::rename(id, &name),
            FamilyCommands::Delete { id } => cli::family::delete(id),
        },
        Commands::Member { command } => match command {
            MemberCommands::Add {
                name,
                family,
                nickname,
            } => cli::member::add(&name, family, nickname.as_deref()),
            MemberCommands::List { family } => cli::member::list(family),
            MemberCommands::Show { id } => cli::member::show(id),
            MemberCommands::Update { id, name, nickname } => {
                cli::member::update(id, &name, nickname.as_deref())
            }
            MemberCommands::Delete { id } => cli::member::delete(id),
        },
        Commands::Banks { command } => match command {
            Some(BanksCommands::Add { name }) => cli::banks::add(&name),
            None => cli::banks::list(),
        },
        Commands::Readers => cli::banks::readers(),
        Commands::Import { file, member, bank } => cli::import::run(&file, member, bank.as_deref()),
        Commands::Accounts { member } => cli::accounts::list(member),
        Commands::Networth { command } => match command {
            NetworthCommands::Member { id } => cli::networth::member(id),
            NetworthCommands::Family { id } => cli::networth::family(id),
        },
    };

    if let Err(e) = result {
        tracing::debug!(kind = ?e.kind(), "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
