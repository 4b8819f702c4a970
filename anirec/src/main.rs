use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use anirec::{api::ProxyApi, recommend, view};
use anirec_auth::{FlowError, Settings, StoredToken, TokenStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("\n{}", e);
        eprintln!("Run `anirec login` to sign in again.");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings = Settings::new().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("\nPlease create a config.toml file with at least:");
        eprintln!("\nclient_id = \"<your MAL client id>\"");
        eprintln!("# server_url = \"http://localhost:8080\"");
        eprintln!("# redirect_uri = \"http://localhost:3000/auth/callback\"");
        e
    })?;

    let command = std::env::args().nth(1);
    let token = match command.as_deref() {
        // Force a fresh login, ignoring any stored token
        Some("login") => {
            let store = TokenStore::open();
            anirec_auth::login(&settings, &store).await?
        }
        // View only: never start the interactive flow
        Some("list") => stored_token()?,
        None => anirec_auth::authenticate(&settings).await?,
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Usage: anirec [login|list]");
            std::process::exit(2);
        }
    };

    run_list_view(&settings, &token).await
}

fn stored_token() -> Result<StoredToken> {
    let store = TokenStore::open();
    let token = store.load_tokens().ok_or(FlowError::NoToken)?;
    if token.is_expired() {
        return Err(FlowError::NoToken.into());
    }
    Ok(token)
}

async fn run_list_view(settings: &Settings, token: &StoredToken) -> Result<()> {
    let api = ProxyApi::new(settings.server_url.clone());

    println!("Loading your anime profile...");
    let profile = api.fetch_profile(&token.access_token).await?;
    let list = api.fetch_anime_list(&token.access_token).await?;
    tracing::debug!(entries = list.data.len(), "fetched anime list");

    print!("{}", view::render_profile(&profile));
    print!("{}", view::render_watch_list(&list.data));

    if let Some(recommender_url) = &settings.recommender_url {
        offer_recommendations(recommender_url, profile.id, &list.data).await;
    }

    Ok(())
}

async fn offer_recommendations(
    recommender_url: &str,
    user_id: u64,
    entries: &[mal_api::models::AnimeListEntry],
) {
    let ratings = recommend::prepare_ratings(entries);
    if ratings.is_empty() {
        println!("\nNo rated anime yet, skipping recommendations.");
        return;
    }

    println!(
        "\nGenerate recommendations from your {} rated anime? [y/N]",
        ratings.len()
    );
    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() || !input.trim().eq_ignore_ascii_case("y") {
        return;
    }

    let http_client = reqwest::Client::new();
    match recommend::generate_recommendations(&http_client, recommender_url, user_id, ratings)
        .await
    {
        Ok(session_id) => {
            println!("Recommendation session created: {}", session_id);
            println!("Results: {}/recommendations/results/{}", recommender_url, session_id);
        }
        Err(e) => eprintln!("{}", e),
    }
}
