// Entrypoint for the CLI application.
// - Single initialization point: load `.env`, set up logging, read the
//   configuration and build both clients.
// - Hands a `Controller` to the menu loop, which blocks until the user exits.

use anyhow::Context;
use book_recommender::config::{self, Config};
use book_recommender::gemini::GeminiClient;
use book_recommender::reviews::SupabaseStore;
use book_recommender::ui::main_menu;
use book_recommender::view::Controller;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let loaded = config::load_dotenv();

    // Logs go to stderr and stay quiet unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(files = ?loaded, "loaded .env files");

    let cfg = Config::from_env().context("Reading configuration")?;
    let model = GeminiClient::new(&cfg.gemini_api_key, &cfg.gemini_model)
        .context("Failed to build Gemini client")?;
    let store = SupabaseStore::new(&cfg.supabase_url, &cfg.supabase_key)
        .context("Failed to build Supabase client")?;
    tracing::info!(model = model.model(), "clients ready");

    let mut controller = Controller::new(model, store, rand::rng());
    main_menu(&mut controller)?;
    Ok(())
}
