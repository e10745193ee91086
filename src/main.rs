use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use noteboard::{
    logging, Board, BoardEvent, BoardStore, CardField, CardId, ColumnKind, NoteboardConfig,
};

#[derive(Parser)]
#[command(name = "noteboard")]
#[command(author, version, about = "A three-column checklist kanban for the terminal")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (defaults to ./noteboard.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the board
    Show {
        /// Output the saved layout as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a card in a column (intake, in-progress, done)
    AddCard { column: ColumnKind },

    /// Delete a card
    RemoveCard { id: CardId },

    /// Append a checklist item to a card
    AddItem { id: CardId, text: String },

    /// Mark an item (numbered from 1) as done
    Check { id: CardId, item: usize },

    /// Mark an item (numbered from 1) as not done
    Uncheck { id: CardId, item: usize },

    /// Flip an item (numbered from 1)
    Toggle { id: CardId, item: usize },

    /// Rename a card
    Title { id: CardId, text: String },

    /// Change a card's color
    Color { id: CardId, value: String },

    /// Replace the text of an item (numbered from 1)
    ItemText {
        id: CardId,
        item: usize,
        text: String,
    },

    /// Delete the saved board
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let project_root = std::env::current_dir().context("Failed to read current directory")?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| project_root.join(NoteboardConfig::FILE_NAME));
    let config = NoteboardConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    logging::init(
        &config.logging.level,
        cli.verbose,
        config.logging.file.as_deref(),
    );

    let persistence = config.persistence(&project_root)?;
    persistence
        .storage()
        .initialize()
        .await
        .context("Failed to initialize storage")?;

    let mut store =
        BoardStore::open(persistence.clone(), config.board.default_color.clone()).await;
    let mut events = store.subscribe();

    match cli.command {
        Commands::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.board())?);
            } else {
                print_board(store.board());
            }
        }
        Commands::AddCard { column } => {
            let id = store.add_card(column).await?;
            println!("Created {} in {}", id, column);
        }
        Commands::RemoveCard { id } => match store.remove_card(id).await {
            Some(card) => println!("Removed {} {}", id, card.title),
            None => println!("No card {}", id),
        },
        Commands::AddItem { id, text } => {
            if !store.add_item(id, &text).await? {
                println!("Item not added: text is empty or the card already has 5 items");
            }
        }
        Commands::Check { id, item } => {
            store.set_item_completed(id, item_index(item)?, true).await?;
        }
        Commands::Uncheck { id, item } => {
            store.set_item_completed(id, item_index(item)?, false).await?;
        }
        Commands::Toggle { id, item } => {
            store.toggle_item(id, item_index(item)?).await?;
        }
        Commands::Title { id, text } => {
            store.edit_card_field(id, CardField::Title, &text).await?;
        }
        Commands::Color { id, value } => {
            store.edit_card_field(id, CardField::Color, &value).await?;
        }
        Commands::ItemText { id, item, text } => {
            store.edit_item_text(id, item_index(item)?, &text).await?;
        }
        Commands::Reset => {
            persistence.clear().await?;
            println!("Board cleared");
        }
    }

    while let Ok(event) = events.try_recv() {
        report(&event);
    }
    Ok(())
}

fn item_index(number: usize) -> Result<usize> {
    number.checked_sub(1).context("Item numbers start at 1")
}

fn report(event: &BoardEvent) {
    match event {
        BoardEvent::CardMoved { card_id, from, to } => {
            println!("Moved {} from {} to {}", card_id, from, to)
        }
        BoardEvent::PersistenceFailed { reason } => {
            eprintln!("Warning: change not saved: {}", reason)
        }
        _ => {}
    }
}

fn print_board(board: &Board) {
    for kind in ColumnKind::ALL {
        let column = board.column(kind);
        let count = match kind.capacity() {
            Some(capacity) => format!("{}/{}", column.cards.len(), capacity),
            None => column.cards.len().to_string(),
        };
        let locked = if kind == ColumnKind::Intake && board.is_intake_locked() {
            " [locked]"
        } else {
            ""
        };
        println!("== {} ({}){}", column.title, count, locked);

        for card in &column.cards {
            println!(
                "  {} {} [{}] {}/{}",
                card.id,
                card.title,
                card.color,
                card.completed_count(),
                card.items.len()
            );
            for (number, item) in card.items.iter().enumerate() {
                let mark = if item.completed { 'x' } else { ' ' };
                println!("    {}. [{}] {}", number + 1, mark, item.text);
            }
            if let Some(date) = card.completed_date {
                println!("    completed {}", date.format("%Y-%m-%d %H:%M"));
            }
        }
    }
}
