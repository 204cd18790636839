use clap::Parser;
use kvnotes::application::init::init;
use kvnotes::application::{export_note, list_notes, ConfigService, NoteEdit, NoteService};
use kvnotes::cli::{format_note, format_note_list, format_stats, Cli, Commands};
use kvnotes::domain::{NoteId, NoteQuery, SortKey};
use kvnotes::error::NotesError;
use kvnotes::infrastructure::{Backend, KeyValueStore, NoteRepository, Workspace};
use kvnotes::logging::init_logging;
use std::str::FromStr;

fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

/// Discover the workspace and open the store its config points at
fn open_repository() -> Result<NoteRepository<Box<dyn KeyValueStore>>, NotesError> {
    let workspace = Workspace::discover()?;
    let config = workspace.load_config()?.with_env_overrides()?;
    let store = workspace.open_store(&config)?;
    Ok(NoteRepository::new(store))
}

fn note_service() -> Result<NoteService<Box<dyn KeyValueStore>>, NotesError> {
    Ok(NoteService::new(open_repository()?))
}

fn run(cli: Cli) -> Result<(), NotesError> {
    match cli.command {
        Commands::Init {
            path,
            backend,
            redis_url,
        } => {
            let backend = Backend::from_str(&backend).map_err(NotesError::Config)?;
            let config = init(&path, backend, redis_url.as_deref())?;

            println!("Initialized kvnotes workspace at {}", path.display());
            println!("Backend: {}", config.backend);
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let service = ConfigService::new(Workspace::discover()?);

            if list {
                let config = service.list()?;
                println!("backend = {}", config.backend);
                println!("redis_url = {}", config.redis_url);
                println!("data_file = {}", config.data_file.display());
                println!("timeout_secs = {}", config.timeout_secs);
                println!("created = {}", config.created.to_rfc3339());
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: kvnotes config [--list | <key> [<value>]]");
                println!("Valid keys: backend, redis_url, data_file, timeout_secs, created");
            }
            Ok(())
        }
        Commands::Add {
            title,
            content,
            star,
        } => {
            let note = note_service()?.add(&title, &content, star)?;
            println!("Created note {}", note.id);
            Ok(())
        }
        Commands::Sample => {
            let note = note_service()?.add_sample()?;
            println!("Created note {}", note.id);
            Ok(())
        }
        Commands::Show { id } => {
            let id = NoteId::from_str(&id)?;
            let note = note_service()?.show(&id)?;
            print!("{}", format_note(&note));
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            content,
            star,
            unstar,
        } => {
            let id = NoteId::from_str(&id)?;
            let edit = NoteEdit {
                title,
                content,
                starred: Commands::star_change(star, unstar),
            };
            let note = note_service()?.edit(&id, edit)?;
            println!("Saved note {}", note.id);
            Ok(())
        }
        Commands::Star { id } => {
            let id = NoteId::from_str(&id)?;
            let note = note_service()?.toggle_star(&id)?;
            if note.starred {
                println!("Starred note {}", note.id);
            } else {
                println!("Unstarred note {}", note.id);
            }
            Ok(())
        }
        Commands::Rm { id } => {
            let id = NoteId::from_str(&id)?;
            note_service()?.remove(&id)?;
            println!("Deleted note {}", id);
            Ok(())
        }
        Commands::Clear { yes } => {
            if !yes {
                return Err(NotesError::Config(
                    "Refusing to delete all notes without --yes".to_string(),
                ));
            }
            let count = note_service()?.clear()?;
            println!("Deleted {} notes", count);
            Ok(())
        }
        Commands::List {
            search,
            starred,
            sort,
        } => {
            let query = NoteQuery::new()
                .with_search(search.trim())
                .starred_only(starred)
                .sorted_by(SortKey::from_str(&sort)?);
            let repository = open_repository()?;
            let listing = list_notes(&repository, &query)?;
            print!("{}", format_note_list(&listing.notes));
            if listing.notes.is_empty() {
                println!();
            }
            Ok(())
        }
        Commands::Stats { search, starred } => {
            let query = NoteQuery::new()
                .with_search(search.trim())
                .starred_only(starred);
            let repository = open_repository()?;
            let listing = list_notes(&repository, &query)?;
            print!("{}", format_stats(&listing.stats, listing.shown()));
            Ok(())
        }
        Commands::Export { id, output } => {
            let id = NoteId::from_str(&id)?;
            let repository = open_repository()?;
            let current_dir = std::env::current_dir()?;
            let path = export_note(&repository, &id, output.as_deref(), &current_dir)?;
            println!("Exported note {} to {}", id, path.display());
            Ok(())
        }
    }
}
