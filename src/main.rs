use saved_views_grid::app::App;
use saved_views_grid::infra::paths::AppPaths;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let mut config = dioxus::desktop::Config::new()
        .with_window(dioxus::desktop::WindowBuilder::new().with_title("Saved Views"));
    match AppPaths::resolve() {
        Ok(paths) => {
            if let Some(dir) = paths.webview_data_dir() {
                match std::fs::create_dir_all(&dir) {
                    Ok(()) => config = config.with_data_directory(dir),
                    Err(err) => {
                        tracing::warn!(error = %err, dir = %dir.display(), "webview data dir unavailable")
                    }
                }
            }
        }
        Err(err) => tracing::warn!(error = %err, "app data dir unavailable"),
    }

    dioxus::LaunchBuilder::desktop().with_cfg(config).launch(App);
}
