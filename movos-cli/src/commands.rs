//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Subcommand;
use movos_browse::notifications::new_content_message;
use movos_browse::{Browser, HeadlessPlatform, LoadOutcome, PlaybackController, Tab};
use movos_catalog::{
    CatalogError, DISCOVERY_GENRES, DemoGateway, DiscoveryGenre, FeedCategory, MediaGateway,
    TmdbGateway,
};
use movos_core::{
    JsonFileStore, LocalAccountStore, MediaSummary, MediaType, MovosConfig, MovosError,
};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the home feeds
    Home {
        /// Expand one feed: trending, mixed_releases, latest_movies, latest_tv, top_rated
        #[arg(long)]
        see_all: Option<FeedCategory>,
        /// Pages to load for the expanded feed
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },
    /// Search movies and TV shows
    Search {
        /// Search terms
        query: String,
        /// Result pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },
    /// List search history, or remove one entry
    History {
        /// Entry to remove
        #[arg(long)]
        remove: Option<String>,
    },
    /// Browse popular movies of a genre
    Genre {
        /// Genre name, e.g. "Sci-Fi"; omit to list genres
        name: Option<String>,
        /// Pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },
    /// Show details and the trailer link for a title
    Details {
        /// Catalog id of the title
        id: String,
        /// movie or tv
        #[arg(short = 't', long = "type", default_value = "movie")]
        media_type: MediaType,
        /// Toggle the title in the saved list
        #[arg(long)]
        save: bool,
    },
    /// List saved titles
    Saved,
    /// List recently viewed titles
    Recent {
        /// Clear the watch history
        #[arg(long)]
        clear: bool,
    },
    /// Sign in to a local account
    Login {
        email: String,
        password: String,
    },
    /// Create a local account and sign in
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

/// Options shared by every command
#[derive(Debug, Default)]
pub struct GlobalOptions {
    pub demo: bool,
    pub data_dir: Option<PathBuf>,
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands, options: GlobalOptions) -> anyhow::Result<()> {
    let browser = launch(&options).await?;

    match command {
        Commands::Home { see_all, pages } => show_home(&browser, see_all, pages).await,
        Commands::Search { query, pages } => search(&browser, &query, pages).await,
        Commands::History { remove } => show_history(&browser, remove.as_deref()),
        Commands::Genre { name, pages } => browse_genre(&browser, name.as_deref(), pages).await,
        Commands::Details {
            id,
            media_type,
            save,
        } => show_details(&browser, &id, media_type, save).await,
        Commands::Saved => {
            print_items("Saved", &browser.session().saved());
            Ok(())
        }
        Commands::Recent { clear } => {
            if clear {
                browser
                    .session()
                    .clear_recently_viewed()
                    .context("clearing watch history")?;
                println!("{}", browser.notifications().current().message);
                return Ok(());
            }
            print_items("Recently Viewed", &browser.session().recently_viewed());
            Ok(())
        }
        Commands::Login { email, password } => {
            let profile = browser
                .session()
                .sign_in(&email, &password)
                .await
                .map_err(|e| user_error(MovosError::from(e)))?;
            println!("Signed in as {} <{}>", profile.name, profile.email);
            Ok(())
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            let profile = browser
                .session()
                .register(&name, &email, &password)
                .await
                .map_err(|e| user_error(MovosError::from(e)))?;
            println!("Welcome, {} ({})", profile.name, profile.initials());
            Ok(())
        }
        Commands::Logout => {
            browser.session().sign_out().await?;
            println!("Signed out");
            Ok(())
        }
        Commands::Whoami => {
            match browser.session().user() {
                Some(profile) => println!(
                    "{} <{}>, member since {}",
                    profile.name, profile.email, profile.joined
                ),
                None => println!("Not signed in. Use 'movos login' or 'movos register'."),
            }
            Ok(())
        }
    }
}

fn user_error(error: MovosError) -> anyhow::Error {
    anyhow::anyhow!(error.user_message())
}

/// Builds the gateway, store and browser from configuration
///
/// # Errors
/// - `CatalogError::MissingApiKey` - No TMDB key and not in demo mode
/// - `StorageError::Io` - Preference store could not be opened
async fn launch(options: &GlobalOptions) -> anyhow::Result<Browser> {
    let mut config = MovosConfig::from_env();
    if let Some(data_dir) = &options.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    // A terminal run exits before a delayed toast could show.
    config.browse.notification_delay = std::time::Duration::ZERO;
    config.validate()?;

    let gateway: Arc<dyn MediaGateway> = if options.demo {
        Arc::new(DemoGateway::new())
    } else {
        match TmdbGateway::new(&config.catalog) {
            Ok(gateway) => Arc::new(gateway),
            Err(CatalogError::MissingApiKey) => {
                bail!("No TMDB API key configured. Set MOVOS_TMDB_API_KEY or pass --demo.")
            }
            Err(e) => return Err(MovosError::from_catalog_error(e).into()),
        }
    };

    let path = config.storage.preferences_path();
    let store = Arc::new(
        JsonFileStore::open(&path)
            .with_context(|| format!("opening preference store at {}", path.display()))?,
    );
    let accounts = Arc::new(LocalAccountStore::new(store.clone()));

    tracing::debug!(demo = options.demo, store = %path.display(), "Launching browser");
    Ok(Browser::launch(gateway, store, accounts, &config.browse).await?)
}

/// Load home feeds and optionally page through one of them
///
/// # Errors
/// - `anyhow::Error` - The expanded feed failed to load
pub async fn show_home(
    browser: &Browser,
    see_all: Option<FeedCategory>,
    pages: u32,
) -> anyhow::Result<()> {
    let report = browser.load_home().await;
    if report.new_titles > 0 {
        println!("{}\n", new_content_message(report.new_titles));
    }
    for category in &report.failed {
        println!("(could not load {})", category.title());
    }

    let Some(category) = see_all else {
        for category in FeedCategory::ALL {
            let items = browser.feeds().home_feed(category);
            print_items(category.title(), &items[..items.len().min(5)]);
        }
        print_items("Recently Viewed", &report.recently_viewed);
        return Ok(());
    };

    browser.see_all(category);
    load_pages(browser, pages).await?;
    if let Some((category, feed)) = browser.feeds().see_all() {
        print_items(category.title(), feed.items());
        println!("Loaded {} page(s)", feed.page());
    }
    Ok(())
}

/// Run a search and print the results
///
/// # Errors
/// - `anyhow::Error` - The search failed
pub async fn search(browser: &Browser, query: &str, pages: u32) -> anyhow::Result<()> {
    browser.search().input(query);
    match browser.search().submit().await {
        LoadOutcome::NoContext => bail!("Search query is empty"),
        LoadOutcome::Failed => bail!("Search failed, see the log for details"),
        _ => {}
    }
    browser.select_tab(Tab::Search);
    load_pages(browser, pages).await?;

    let results = browser.search().results();
    if results.is_empty() {
        println!("No results for \"{}\"", query.trim());
        return Ok(());
    }
    print_items(&format!("Results for \"{}\"", query.trim()), &results);
    Ok(())
}

fn show_history(browser: &Browser, remove: Option<&str>) -> anyhow::Result<()> {
    if let Some(term) = remove {
        if !browser.search().remove_history(term) {
            bail!("\"{term}\" is not in the search history");
        }
    }
    let history = browser.search().history();
    if history.is_empty() {
        println!("No recent searches");
    }
    for term in history {
        println!("  {term}");
    }
    Ok(())
}

/// Browse a discovery genre
///
/// # Errors
/// - `anyhow::Error` - Unknown genre or the genre failed to load
pub async fn browse_genre(browser: &Browser, name: Option<&str>, pages: u32) -> anyhow::Result<()> {
    let Some(name) = name else {
        for genre in DISCOVERY_GENRES {
            println!("  {:<10} {}", genre.name, genre.keywords.join(", "));
        }
        return Ok(());
    };

    let genre = match DiscoveryGenre::by_name(name) {
        Some(genre) => genre,
        None => match DiscoveryGenre::matching(name).as_slice() {
            [only] => *only,
            _ => bail!("Unknown genre \"{name}\". Run 'movos genre' to list genres."),
        },
    };

    if browser.select_genre(genre).await == LoadOutcome::Failed {
        bail!("Could not load {} titles", genre.name);
    }
    load_pages(browser, pages).await?;
    print_items(genre.name, &browser.genres().items());
    Ok(())
}

/// Show detail record and trailer links for one title
///
/// # Errors
/// - `anyhow::Error` - The title does not exist
pub async fn show_details(
    browser: &Browser,
    id: &str,
    media_type: MediaType,
    save: bool,
) -> anyhow::Result<()> {
    let Some(detail) = browser
        .details()
        .load_by_id(id, media_type)
        .await
        .map_err(|e| user_error(MovosError::from_catalog_error(e)))?
    else {
        bail!("No {media_type} with id {id}");
    };

    let summary = &detail.summary;
    println!("{} ({})  ★ {:.1}", summary.title, summary.year, summary.rating);
    if !detail.duration.is_empty() {
        println!("{}", detail.duration);
    }
    if !summary.genres.is_empty() {
        println!("{}", summary.genres.join(" • "));
    }
    if let Some(director) = &detail.director {
        println!("Director: {director}");
    }
    println!("\n{}\n", summary.synopsis);
    for member in &detail.cast {
        println!("  {} as {}", member.name, member.role);
    }

    let mut player = PlaybackController::new(HeadlessPlatform, None);
    let session = player.enter(&detail.trailer);
    println!("\nTrailer: {}", session.embed_url);
    println!("Watch on YouTube: {}", session.external_url);
    player.exit();

    if save {
        let toggle = browser.session().toggle_saved(summary);
        println!("{}", browser.notifications().current().message);
        tracing::debug!(?toggle, id = %summary.id, "Saved list toggled");
    } else if browser.session().is_saved(&summary.id) {
        println!("In your saved list");
    }
    Ok(())
}

async fn load_pages(browser: &Browser, pages: u32) -> anyhow::Result<()> {
    for _ in 1..pages {
        match browser.load_more().await {
            LoadOutcome::Loaded(0) | LoadOutcome::NoContext => break,
            LoadOutcome::Loaded(_) => {}
            LoadOutcome::Failed => bail!("Loading the next page failed"),
            LoadOutcome::AlreadyLoading | LoadOutcome::Stale => break,
        }
    }
    Ok(())
}

fn print_items(title: &str, items: &[MediaSummary]) {
    let today = chrono::Utc::now().date_naive();
    println!("{title}");
    println!("{:-<60}", "");
    if items.is_empty() {
        println!("  (nothing here yet)");
    }
    for item in items {
        let badge = item
            .badge(today)
            .map(|badge| format!(" [{}]", badge.label()))
            .unwrap_or_default();
        println!(
            "  {:<8} {:<45} {} ★ {:.1}{}",
            item.id, item.title, item.year, item.rating, badge
        );
    }
    println!();
}
