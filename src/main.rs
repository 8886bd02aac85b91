#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // .env is optional; the bundled config covers builds without one
    if let Err(err) = dotenvy::dotenv() {
        tracing::debug!("no .env loaded: {err}");
    }
}

// Browser builds have no process environment; config falls back to the bundled file
#[cfg(target_arch = "wasm32")]
fn load_dotenv() {}

#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    // dioxus may already have installed a subscriber; keep whichever came first
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .try_init();
}

// dioxus installs its own logger in the browser
#[cfg(target_arch = "wasm32")]
fn init_tracing() {}

fn main() {
    init_tracing();
    load_dotenv();
    dioxus::launch(emotion_detector::ui::App);
}
