use clap::Parser;
use totpvault::cli::commands;
use totpvault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    totpvault::logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Add {
            ref name,
            ref secret,
            ref uri,
        } => commands::add::execute(&cli, name.as_deref(), secret.as_deref(), uri.as_deref()),
        Commands::List => commands::list::execute(&cli),
        Commands::Code { ref name, copy } => commands::code::execute(&cli, name, copy),
        Commands::Rename {
            ref name,
            ref new_name,
        } => commands::rename::execute(&cli, name, new_name),
        Commands::Remove { ref name, force } => commands::remove::execute(&cli, name, force),
        Commands::Watch { ref names } => commands::watch::execute(&cli, names),
        Commands::Export { plain, ref output } => {
            commands::export::execute(&cli, plain, output.as_deref())
        }
        Commands::Import {
            ref file,
            on_conflict,
            dry_run,
        } => commands::import_cmd::execute(&cli, file, on_conflict, dry_run),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        totpvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
