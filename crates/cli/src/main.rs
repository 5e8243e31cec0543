mod command;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use motionquest_core::{
    create_store, load_config, load_config_from_env, metrics, validate_config, Config, ImageUrls,
    KvAdapter, ModalEvent, SanitizedConfig, Session, TmdbClient,
};

use command::{Command, HELP};

/// Default config file, used when present and `MOTIONQUEST_CONFIG` is unset
const DEFAULT_CONFIG_FILE: &str = "motionquest.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr; stdout belongs to the UI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = read_config()?;
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!("Configuration: {:?}", sanitized);
    if !sanitized.tmdb.api_key_configured {
        warn!(
            "No TMDB API key configured; searches will fail until MOTIONQUEST_TMDB__API_KEY is set"
        );
    }

    let store = create_store(&config.storage).context("Failed to open preference store")?;
    let client = Arc::new(
        TmdbClient::new(config.tmdb.clone()).context("Failed to create TMDB client")?,
    );
    let images = client.images().clone();

    let mut session = Session::new(client, KvAdapter::new(store), &config.search);
    let ui = Ui {
        images,
        min_query_len: config.search.min_query_len,
    };

    println!("{}", HELP);
    ui.print_list(&session);

    let mut search_updates = session.subscribe_search();
    let mut detail_updates = session.subscribe_details();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    debug!("Input closed");
                    break;
                };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => ui.apply(&mut session, command),
                    Err(e) => println!("{}", e),
                }
            }
            Ok(()) = search_updates.changed() => {
                ui.print_list(&session);
            }
            Ok(()) = detail_updates.changed() => {
                ui.print_detail(&session);
            }
        }
    }

    Ok(())
}

fn read_config() -> Result<Config> {
    let explicit = std::env::var("MOTIONQUEST_CONFIG").ok().map(PathBuf::from);
    let path = explicit.or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    });

    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => {
            info!("No config file, using defaults and environment");
            load_config_from_env().context("Failed to load config from environment")
        }
    }
}

struct Ui {
    images: ImageUrls,
    min_query_len: usize,
}

impl Ui {
    fn apply(&self, session: &mut Session, command: Command) {
        match command {
            Command::Query(text) => session.type_query(text),
            Command::Clear => session.clear_query(),
            Command::ToggleFavorite(id) => {
                let favorite = session.toggle_favorite(id);
                println!(
                    "{} {} favorites",
                    id,
                    if favorite { "added to" } else { "removed from" }
                );
                self.print_list(session);
            }
            Command::FavoritesOnly(enabled) => {
                if !session.favorites_toggle_available() {
                    println!("The favorites filter is available once there are results.");
                    return;
                }
                let enabled = enabled.unwrap_or(!session.favorites_only());
                session.set_favorites_only(enabled);
                self.print_list(session);
            }
            Command::Sort(key) => {
                session.set_sort_key(key);
                self.print_list(session);
            }
            Command::Direction(direction) => {
                match direction {
                    Some(direction) => session.set_sort_direction(direction),
                    None => {
                        session.toggle_sort_direction();
                    }
                }
                self.print_list(session);
            }
            Command::Open(id) => {
                if let Some(event) = session.open_details(id) {
                    on_modal(event);
                }
            }
            Command::Close => match session.close_details() {
                Some(event) => on_modal(event),
                None => println!("No details are open."),
            },
            Command::Stats => print!("{}", metrics::encode_metrics()),
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
    }

    fn print_list(&self, session: &Session) {
        println!();
        println!(
            "{}",
            render::list(&session.list_view(), self.min_query_len, &self.images, |id| {
                session.is_favorite(id)
            })
        );
        println!(
            "{}",
            render::status(
                session.sort_spec(),
                session.favorites_only(),
                session.favorites_toggle_available(),
                session.favorites().len(),
            )
        );
    }

    fn print_detail(&self, session: &Session) {
        if let Some(text) = render::detail(&session.detail_state(), &self.images) {
            println!();
            println!("{}", text);
        }
    }
}

fn on_modal(event: ModalEvent) {
    match event {
        ModalEvent::Opened(id) => debug!("Detail panel opened for {}", id),
        ModalEvent::Closed => println!("Details closed."),
    }
}
