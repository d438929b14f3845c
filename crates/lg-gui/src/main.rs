//! LittleGuy desktop toy: macroquad entry point.
//!
//! Usage: `littleguy-gui [--config FILE] [--verbose]`.

mod logging;

use std::path::Path;

use log::error;
use macroquad::prelude::*;

use lg_gui::app::AppState;
use lg_gui::input::{escape_pressed, poll_pointer};
use lg_gui::render::draw_scene;
use lg_gui::theme::{WINDOW_H, WINDOW_W, palette};
use lg_simulation::SimConfig;

fn window_conf() -> Conf {
    Conf {
        window_title: "LittleGuy".to_owned(),
        window_width: WINDOW_W,
        window_height: WINDOW_H,
        window_resizable: true,
        ..Default::default()
    }
}

fn load_config(args: &[String]) -> Result<SimConfig, String> {
    match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => SimConfig::load(Path::new(&w[1])).map_err(|e| e.to_string()),
        None => Ok(SimConfig::default()),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    logging::init(args.iter().any(|a| a == "--verbose"));

    let app =
        load_config(&args).and_then(|config| AppState::new(config).map_err(|e| e.to_string()));
    let mut app = match app {
        Ok(app) => app,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    loop {
        // Clear with black (letterbox bars)
        clear_background(palette::BLACK);
        app.canvas.apply();
        draw_rectangle(0.0, 0.0, app.canvas.width, app.canvas.height, palette::WHITE);

        let pointer = poll_pointer(&app.canvas);
        app.update(pointer, get_frame_time());

        draw_scene(&app.canvas, &app.sim.views(), app.particles.particles());

        if escape_pressed() {
            break;
        }

        next_frame().await;
    }
}
