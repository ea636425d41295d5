mod app;
use dua_review::*;

use app::DuaApp;
use config::Config;
use export::json::import_json;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let db_path = config.db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store: Arc<dyn PersistenceStore> = Arc::new(SqliteStore::open(&db_path)?);

    let collection = match &config.content.path {
        Some(path) => import_json(path)?,
        None => DuaCollection::bundled()?,
    };
    info!(
        "Loaded collection '{}' ({} duas)",
        collection.name,
        collection.len()
    );

    let sim_clock = config
        .review
        .simulate_days
        .then(|| Arc::new(ManualClock::starting_now()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Dua Review",
        options,
        Box::new(move |_cc| Ok(Box::new(DuaApp::new(config, collection, store, sim_clock)))),
    )?;
    Ok(())
}
