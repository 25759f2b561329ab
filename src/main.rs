use std::future::Future;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use flowboard_editor::{ChannelNotifier, Editor, EditorEvent, EditorOptions};
use flowboard_model::{PositionEdit, Sequence};
use flowboard_store::FsStore;

/// Flowboard - layout synchronization for sequence flow editing
#[derive(Parser)]
#[command(name = "flowboard")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.flowboard)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Register a sequence document with the store
  Import {
    /// Path to the sequence file (JSON)
    sequence_file: PathBuf,
  },

  /// Load the layout for a sequence and print the renderable graph
  Render {
    /// Path to the sequence file (JSON)
    sequence_file: PathBuf,

    /// Presentation mode: no auto-connection, no edits
    #[arg(long)]
    read_only: bool,
  },

  /// Apply position edits (JSON array on stdin) and save the layout
  Move {
    /// Path to the sequence file (JSON)
    sequence_file: PathBuf,
  },

  /// Regenerate the layout from the stored step structure
  AutoLayout {
    /// Path to the sequence file (JSON)
    sequence_file: PathBuf,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowboard=info")),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  let data_dir = cli.data_dir.unwrap_or_else(|| {
    dirs::home_dir()
      .expect("could not determine home directory")
      .join(".flowboard")
  });

  match cli.command {
    Some(Commands::Import { sequence_file }) => {
      run(async { import(sequence_file, data_dir).await })?;
    }
    Some(Commands::Render {
      sequence_file,
      read_only,
    }) => {
      run(async { render(sequence_file, data_dir, read_only).await })?;
    }
    Some(Commands::Move { sequence_file }) => {
      run(async { apply_moves(sequence_file, data_dir).await })?;
    }
    Some(Commands::AutoLayout { sequence_file }) => {
      run(async { auto_layout(sequence_file, data_dir).await })?;
    }
    None => {
      println!("flowboard - use --help to see available commands");
    }
  }

  Ok(())
}

fn run<F: Future<Output = Result<()>>>(fut: F) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(fut)
}

async fn import(sequence_file: PathBuf, data_dir: PathBuf) -> Result<()> {
  let sequence = read_sequence(&sequence_file).await?;
  let store = FsStore::new(&data_dir);

  store
    .put_sequence(&sequence)
    .await
    .context("failed to store sequence document")?;

  eprintln!(
    "Imported sequence '{}' ({} steps) into {}",
    sequence.metadata.id,
    sequence.steps.len(),
    data_dir.display()
  );

  Ok(())
}

async fn render(sequence_file: PathBuf, data_dir: PathBuf, read_only: bool) -> Result<()> {
  let sequence = read_sequence(&sequence_file).await?;
  let options = EditorOptions {
    read_only,
    ..EditorOptions::default()
  };
  let (editor, mut events) = session(data_dir, options);

  editor.select_sequence(Some(sequence));
  editor.load_layout().await;

  let graph = editor
    .render()
    .context("nothing to render - sequence did not settle")?;
  report_events(&mut events);

  eprintln!(
    "Rendered {} nodes, {} edges",
    graph.nodes.len(),
    graph.edges.len()
  );
  println!("{}", serde_json::to_string_pretty(&graph)?);

  Ok(())
}

async fn apply_moves(sequence_file: PathBuf, data_dir: PathBuf) -> Result<()> {
  let sequence = read_sequence(&sequence_file).await?;
  let edits = read_edits_from_stdin()?;
  let (editor, mut events) = session(data_dir, EditorOptions::default());

  editor.select_sequence(Some(sequence));
  editor.load_layout().await;
  editor.render();

  editor.record_position_edits(&edits);
  eprintln!("Applied {} position edits", edits.len());

  editor
    .save_layout()
    .await
    .context("failed to save layout")?;
  report_events(&mut events);

  Ok(())
}

async fn auto_layout(sequence_file: PathBuf, data_dir: PathBuf) -> Result<()> {
  let sequence = read_sequence(&sequence_file).await?;
  let store = FsStore::new(&data_dir);

  // The regenerator arranges the stored step list, so make sure the store
  // has the current one before asking.
  store
    .put_sequence(&sequence)
    .await
    .context("failed to store sequence document")?;

  let (editor, mut events) = session(data_dir, EditorOptions::default());
  editor.select_sequence(Some(sequence));
  editor.load_layout().await;

  editor
    .auto_layout()
    .await
    .context("failed to regenerate layout")?;
  editor
    .save_layout()
    .await
    .context("failed to save regenerated layout")?;
  report_events(&mut events);

  let graph = editor
    .render()
    .context("nothing to render - sequence did not settle")?;
  println!("{}", serde_json::to_string_pretty(&graph)?);

  Ok(())
}

fn session(
  data_dir: PathBuf,
  options: EditorOptions,
) -> (
  Editor<FsStore, ChannelNotifier>,
  mpsc::UnboundedReceiver<EditorEvent>,
) {
  let (tx, rx) = mpsc::unbounded_channel();
  let store = Arc::new(FsStore::new(data_dir));
  (
    Editor::with_notifier(store, options, ChannelNotifier::new(tx)),
    rx,
  )
}

/// Surface editor events the way a UI host would show toasts.
fn report_events(events: &mut mpsc::UnboundedReceiver<EditorEvent>) {
  while let Ok(event) = events.try_recv() {
    match event {
      EditorEvent::AutoConnected { sequence_id } => {
        eprintln!("Auto-connected steps in '{}'", sequence_id);
      }
      EditorEvent::LayoutSaved { sequence_id } => {
        eprintln!("Layout saved for '{}'", sequence_id);
      }
      EditorEvent::SaveFailed { error } => {
        eprintln!("Save failed: {}", error);
      }
      EditorEvent::RegenerateStarted { sequence_id } => {
        eprintln!("Regenerating layout for '{}'", sequence_id);
      }
      EditorEvent::LayoutRegenerated { sequence_id } => {
        eprintln!("Layout regenerated for '{}'", sequence_id);
      }
      EditorEvent::RegenerateFailed { error } => {
        eprintln!("Regeneration failed: {}", error);
      }
      EditorEvent::FitRequested => {}
    }
  }
}

async fn read_sequence(path: &PathBuf) -> Result<Sequence> {
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read sequence file: {}", path.display()))?;

  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse sequence file: {}", path.display()))
}

fn read_edits_from_stdin() -> Result<Vec<PositionEdit>> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    return Ok(Vec::new());
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read edits from stdin")?;

  if input.trim().is_empty() {
    Ok(Vec::new())
  } else {
    serde_json::from_str(&input).context("failed to parse position edits JSON from stdin")
  }
}
