use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use todo_record::codec::{read_file, write_file};
use todo_record::parser::parse_checklist;
use todo_record::{Config, Error, Result, Todo, TodoId, TodoList};
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Todo file, `.json` or `.toml` (defaults to TODO_FILE or the config file)
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Print every todo
    List,
    /// Add an open todo
    Add { text: String },
    /// Mark a todo as done
    Done { id: TodoId },
    /// Flip the done flag
    Toggle { id: TodoId },
    /// Set or clear the interact flag
    Interact { id: TodoId, value: InteractArg },
    /// Remove a todo
    Rm { id: TodoId },
    /// Append the task-list items of a Markdown file
    Import { markdown: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InteractArg {
    True,
    False,
    Unset,
}

impl From<InteractArg> for Option<bool> {
    fn from(arg: InteractArg) -> Self {
        match arg {
            InteractArg::True => Some(true),
            InteractArg::False => Some(false),
            InteractArg::Unset => None,
        }
    }
}

fn init_logging(level: &str) {
    let parsed = level.parse::<Level>();
    tracing_subscriber::fmt()
        .with_max_level(*parsed.as_ref().unwrap_or(&Level::INFO))
        .with_writer(std::io::stderr)
        .init();
    if parsed.is_err() {
        warn!(level, "unknown log level, using info");
    }
}

fn format_todo(todo: &Todo) -> String {
    let done = if todo.done { "[x]" } else { "[ ]" };
    let interact = match todo.interact {
        Some(true) => "true",
        Some(false) => "false",
        None => "-",
    };
    format!("{}\t{}\t{}\t{}", todo.id, done, interact, todo.text)
}

fn run(path: &Path, command: Commands) -> Result<()> {
    let mut list = TodoList::from_todos(read_file(path)?);

    match command {
        Commands::List => {
            for todo in list.todos() {
                println!("{}", format_todo(todo));
            }
            return Ok(());
        }
        Commands::Add { text } => {
            let id = list.add(text)?;
            println!("Todo added with ID {}", id);
        }
        Commands::Done { id } => list.set_done(id, true)?,
        Commands::Toggle { id } => {
            let done = list.toggle(id)?;
            println!("Todo {} is now {}", id, if done { "done" } else { "open" });
        }
        Commands::Interact { id, value } => list.set_interact(id, value.into())?,
        Commands::Rm { id } => {
            let removed = list.remove(id)?;
            println!("Removed todo {}: {}", removed.id, removed.text);
        }
        Commands::Import { markdown } => {
            let contents = fs::read_to_string(&markdown)?;
            let first_id = list.next_id().ok_or(Error::IdsExhausted)?;
            let imported = parse_checklist(&contents, first_id);
            info!(count = imported.len(), source = %markdown.display(), "imported checklist");
            for todo in imported {
                list.upsert(todo);
            }
        }
    }

    write_file(path, list.todos())
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_level);

    let path = args.file.unwrap_or_else(|| config.default_todo_file());
    let command = args.command.unwrap_or(Commands::List);

    match run(&path, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
