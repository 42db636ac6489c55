// MyMusic Tab - command line front end
// Create, export and play tab documents without a UI

use clap::{Parser, Subcommand};
use mymusic_tab::audio::{ChannelBackend, TriggerEvent};
use mymusic_tab::messaging::channels::TriggerConsumer;
use mymusic_tab::project::{load_document_file, save_document_file};
use mymusic_tab::{
    EditorConfig, PlaybackDriver, PlaybackScheduler, Project, SleepTimer, TabStore,
    export_plain_text,
};
use ringbuf::traits::Consumer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mymusic_tab")]
#[command(about = "MyMusic Tab: guitar, bass and drum tablature editor core")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty project file (.json or .ron)
    New { name: String, file: PathBuf },

    /// Print a project as plain-text tab
    Export { file: PathBuf },

    /// Play a project, printing each trigger
    Play {
        file: PathBuf,

        /// Loop back to the start at the end
        #[arg(long = "loop")]
        looping: bool,

        /// Disable the click track
        #[arg(long)]
        no_click: bool,

        /// Stop after this many cells
        #[arg(long)]
        max_steps: Option<usize>,
    },
}

fn print_trigger(event: &TriggerEvent) {
    match event {
        TriggerEvent::Tone {
            frequency_hz,
            duration_sec,
            waveform,
        } => println!("  tone  {:>8.2} Hz  {:.3}s  {:?}", frequency_hz, duration_sec, waveform),
        TriggerEvent::Click { accented } => {
            println!("  click{}", if *accented { " (accent)" } else { "" })
        }
    }
}

/// Drain the trigger channel on its own thread, printing each event,
/// until `done` is set and the channel is empty
fn spawn_trigger_printer(mut triggers: TriggerConsumer, done: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            let finished = done.load(Ordering::Acquire);
            while let Some(event) = triggers.try_pop() {
                print_trigger(&event);
            }
            if finished {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
    })
}

fn load_config(path: Option<PathBuf>) -> EditorConfig {
    let path = match path.map(Ok).unwrap_or_else(EditorConfig::default_path) {
        Ok(path) => path,
        Err(e) => {
            warn!("{}; using default settings", e);
            return EditorConfig::default();
        }
    };
    EditorConfig::load_or_default(&path).unwrap_or_else(|e| {
        warn!("Ignoring config {}: {}", path.display(), e);
        EditorConfig::default()
    })
}

fn open(file: &Path, config: &EditorConfig) -> Result<TabStore, Box<dyn std::error::Error>> {
    let document = load_document_file(file)?;
    let mut store = TabStore::new(Project::default()).with_history_limit(config.history_limit);
    store.load_document(&document)?;
    Ok(store)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config);

    match cli.command {
        Commands::New { name, file } => {
            let mut project = Project::new(name);
            project.tempo = mymusic_tab::tab::Tempo::new(config.default_bpm)?;
            let store = TabStore::new(project);
            save_document_file(&file, &store.to_document())?;
            info!("Created '{}' at {}", store.project().name, file.display());
        }

        Commands::Export { file } => {
            let store = open(&file, &config)?;
            print!("{}", export_plain_text(store.project(), store.tab_data()));
        }

        Commands::Play {
            file,
            looping,
            no_click,
            max_steps,
        } => {
            let store = open(&file, &config)?;
            let (backend, triggers) = ChannelBackend::with_config(&config);
            let mut scheduler = PlaybackScheduler::with_config(backend, SleepTimer::new(), &config);
            scheduler.set_looping(looping || config.loop_playback);
            if no_click {
                scheduler.set_click_enabled(false);
            }

            let mut driver = PlaybackDriver::new();
            if let Some(max_steps) = max_steps {
                driver = driver.with_max_steps(max_steps);
            }

            info!(
                "Playing '{}' at {} BPM",
                store.project().name,
                store.project().tempo.bpm()
            );
            let done = Arc::new(AtomicBool::new(false));
            let printer = spawn_trigger_printer(triggers, Arc::clone(&done));
            let steps = driver.run(&mut scheduler, &store);
            done.store(true, Ordering::Release);
            if printer.join().is_err() {
                warn!("Trigger printer stopped early");
            }

            info!("Played {} cells", steps);
            let dropped = scheduler.backend().dropped();
            if dropped > 0 {
                warn!("{} triggers dropped; raise trigger_channel_capacity", dropped);
            }
        }
    }

    Ok(())
}
