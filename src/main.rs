mod app;
mod catalog;
mod config;
mod detail;
mod feed;
mod position;
mod projection;
mod roster;
mod scene;
mod state;
mod view;

#[cfg(target_arch = "wasm32")]
use eframe::wasm_bindgen::JsCast;

use app::App;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::load_or_default();
    let side = config.view.canvas_size + 40.0;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([side, side + 80.0])
            .with_title("Humans in Space"),
        ..Default::default()
    };

    eframe::run_native(
        "spacecrew-viz",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, config)))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element with id 'canvas'");
            return;
        };

        let config = config::load_or_default();
        let web_options = eframe::WebOptions::default();
        if let Err(e) = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(App::new(cc, config)))),
            )
            .await
        {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
}
