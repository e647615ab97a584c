//! Cadenza Listener - browse and play the Cadenza music catalog
use anyhow::Context;
use cadenza_client::{HttpCatalogClient, MAX_SCORE};
use cadenza_core::{PageQuery, Track, TrackId};
use cadenza_listener::{
    config::ListenerConfig,
    display::{format_duration, pagination_line, playback_summary, track_line},
};
use cadenza_session::ListenerSession;
use cadenza_settings::JsonSettings;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadenza")]
#[command(about = "Cadenza music catalog listener", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./cadenza.toml when present)
    #[arg(short, long, global = true, env = "CADENZA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List approved tracks
    List {
        #[arg(short, long)]
        page: Option<u32>,
        #[arg(short, long)]
        size: Option<u32>,
        /// Keep loading pages until the catalog is exhausted
        #[arg(long)]
        all: bool,
    },
    /// Search the catalog
    Search {
        keyword: String,
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Show a track's detail and rating
    Show { id: u64 },
    /// Resolve a track for playback
    Play { id: u64 },
    /// Queue the first catalog page and walk it like the player would
    Queue {
        /// Playlist index to start at
        #[arg(short, long, default_value_t = 0)]
        start: usize,
        /// Number of simulated end-of-track events
        #[arg(short, long, default_value_t = 0)]
        advance: usize,
    },
    /// Favorite a track, or remove it with --remove
    Favorite {
        id: u64,
        #[arg(long)]
        remove: bool,
    },
    /// List favorite tracks
    Favorites {
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// List recently played tracks
    History {
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Rate a track from 1 to 5
    Rate { id: u64, score: u8 },
    /// Show the signed-in user
    Whoami,
    /// Show or set the stored volume (0.0-1.0)
    Volume { level: Option<f32> },
    /// Show or set the play mode (sequence, loop, random)
    Mode { mode: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadenza=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ListenerConfig::load(cli.config.as_deref())?;
    let (client, session) = connect(&config).await?;

    let result = run(cli.command, &client, &session).await;
    session.shutdown();
    result
}

/// Build the catalog client, sign in when credentials are configured, and
/// open a session over the persisted player settings
async fn connect(
    config: &ListenerConfig,
) -> anyhow::Result<(Arc<HttpCatalogClient>, ListenerSession)> {
    let client = Arc::new(HttpCatalogClient::new(config.client_config())?);
    tracing::debug!("Catalog server: {}", client.base_url());

    if !client.is_authenticated().await {
        if let Some((username, password)) = config.credentials() {
            client
                .login(username, password)
                .await
                .with_context(|| format!("Login failed for {}", username))?;
        }
    }

    let settings = JsonSettings::open(&config.settings.path).with_context(|| {
        format!(
            "Failed to open settings at {}",
            config.settings.path.display()
        )
    })?;

    let session = ListenerSession::with_config(
        client.clone(),
        Arc::new(settings),
        config.session_config(),
    );
    Ok((client, session))
}

async fn run(
    command: Commands,
    client: &HttpCatalogClient,
    session: &ListenerSession,
) -> anyhow::Result<()> {
    let catalog = session.catalog();
    let engine = session.engine();

    match command {
        Commands::List { page, size, all } => {
            let query = PageQuery { page, size };
            catalog.fetch_list(query, false).await?;
            if all {
                while catalog.load_more().await?.is_some() {}
            }
            print_tracks(&catalog.tracks());
            println!("{}", pagination_line(&catalog.pagination()));
        }
        Commands::Search { keyword, page } => {
            let query = PageQuery { page, size: None };
            catalog.search_music(&keyword, query).await?;
            if catalog.is_empty() {
                println!("No tracks match \"{}\"", keyword);
            } else {
                print_tracks(&catalog.tracks());
                println!("{}", pagination_line(&catalog.pagination()));
            }
        }
        Commands::Show { id } => {
            let id = TrackId::new(id);
            let detail = catalog.fetch_music_detail(id).await?;
            println!("{}", track_line(&detail.track));
            if let Some(album) = &detail.track.album {
                println!("  album: {}", album);
            }
            if let Some(description) = &detail.track.description {
                println!("  {}", description);
            }

            let stats = client.rating(id).await?;
            let score = stats
                .avg_score
                .map_or_else(|| "unrated".to_string(), |s| format!("{:.1}/{}", s, MAX_SCORE));
            println!(
                "  plays: {}  favorites: {}  score: {} ({} ratings)",
                stats.play_count.unwrap_or(0),
                stats.favorite_count.unwrap_or(0),
                score,
                stats.total_ratings.unwrap_or(0)
            );
        }
        Commands::Play { id } => {
            session.play_track(TrackId::new(id)).await?;
            println!("{}", playback_summary(&engine.state()));
        }
        Commands::Queue { start, advance } => {
            catalog.fetch_list(PageQuery::default(), false).await?;
            session.play_list(start).await?;
            println!("{}", playback_summary(&engine.state()));

            for _ in 0..advance {
                if !engine.has_next() {
                    println!("End of playlist");
                    break;
                }
                engine.on_ended().await?;
                println!("{}", playback_summary(&engine.state()));
            }
        }
        Commands::Favorite { id, remove } => {
            let favorite = session.toggle_favorite(TrackId::new(id), remove).await?;
            if favorite {
                println!("Added {} to favorites", id);
            } else {
                println!("Removed {} from favorites", id);
            }
        }
        Commands::Favorites { page } => {
            catalog
                .fetch_favorite_list(PageQuery { page, size: None })
                .await?;
            print_tracks(&catalog.favorites());
        }
        Commands::History { page } => {
            catalog
                .fetch_play_history(PageQuery { page, size: None })
                .await?;
            print_tracks(&catalog.history());
        }
        Commands::Rate { id, score } => {
            client.rate(TrackId::new(id), score).await?;
            println!("Rated {} with {}/{}", id, score, MAX_SCORE);
        }
        Commands::Whoami => {
            let user = client.current_user().await?;
            println!("{} ({})", user.display_name(), user.username);
            if let Some(role) = &user.role {
                println!("  role: {}", role);
            }
            if let Some(email) = &user.email {
                println!("  email: {}", email);
            }
        }
        Commands::Volume { level } => {
            if let Some(level) = level {
                engine.set_volume(level);
            }
            println!(
                "volume {:.0}% (output {:.0}%)",
                engine.volume() * 100.0,
                engine.output_gain() * 100.0
            );
        }
        Commands::Mode { mode } => {
            if let Some(mode) = mode {
                if !engine.set_play_mode_str(&mode) {
                    anyhow::bail!(
                        "Unknown play mode: {} (expected sequence, loop or random)",
                        mode
                    );
                }
            }
            let mode = engine.play_mode();
            println!("{} ({})", mode.label(), mode);
        }
    }

    Ok(())
}

fn print_tracks(tracks: &[Track]) {
    if tracks.is_empty() {
        println!("(no tracks)");
        return;
    }
    for track in tracks {
        println!("{}", track_line(track));
    }
    let total: u64 = tracks.iter().map(|t| u64::from(t.duration)).sum();
    println!("{} tracks, {}", tracks.len(), format_duration(total));
}
