use std::path::Path;

use piston_window::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RenderConfig;
use crate::field::Field;
use crate::game::Simulation;
use crate::strategy::Strategy;

const STATS_AREA_HEIGHT: f64 = 50.0;
const MIN_WINDOW_WIDTH: f64 = 480.0;
const FONT_PATH: &str = "assets/FiraSans-Regular.ttf";

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to open viewer window: {0}")]
    Window(String),
}

/// Animates the simulation in a window, one step per update tick, until the
/// configured step count is reached or the window is closed.
pub fn run_viewer(sim: &mut Simulation, render: &RenderConfig) -> Result<(), ViewerError> {
    let cell_size = render.cell_size as f64;
    let field_width = sim.field().cols() as f64 * cell_size;
    let field_height = sim.field().rows() as f64 * cell_size;
    let window_width = field_width.max(MIN_WINDOW_WIDTH);

    let mut window: PistonWindow = WindowSettings::new(
        "Spatial Prisoner's Dilemma",
        [window_width as u32, (field_height + STATS_AREA_HEIGHT) as u32],
    )
    .exit_on_esc(true)
    .build()
    .map_err(|err| ViewerError::Window(err.to_string()))?;
    window.set_ups(render.updates_per_second);

    let mut glyphs = {
        let font_path = Path::new(FONT_PATH);
        if font_path.exists() {
            window.load_font(font_path).ok()
        } else {
            warn!(path = FONT_PATH, "font not found, stats bar will be blank");
            None
        }
    };

    while let Some(e) = window.next() {
        if e.update_args().is_some() && !sim.is_finished() {
            sim.step();
        }

        window.draw_2d(&e, |c, g, device| {
            clear([0.1, 0.1, 0.1, 1.0], g);

            rectangle(
                [0.2, 0.2, 0.2, 1.0],
                [0.0, 0.0, window_width, STATS_AREA_HEIGHT],
                c.transform,
                g,
            );

            if let Some(ref mut glyphs) = glyphs {
                let field = sim.field();
                let stats_text = format!(
                    "Step {}/{} | C: {} D: {} | b = {}",
                    sim.steps_taken(),
                    sim.config().steps,
                    field.count(Strategy::Cooperate),
                    field.count(Strategy::Defect),
                    sim.config().temptation,
                );
                let drawn = text::Text::new_color([1.0, 1.0, 1.0, 1.0], 18).draw(
                    &stats_text,
                    glyphs,
                    &c.draw_state,
                    c.transform.trans(10.0, 30.0),
                    g,
                );
                if drawn.is_err() {
                    warn!("failed to draw stats text");
                }
                glyphs.factory.encoder.flush(device);
            }

            draw_field(
                sim.field(),
                cell_size,
                c.transform.trans(0.0, STATS_AREA_HEIGHT),
                g,
            );
        });
    }

    info!(steps = sim.steps_taken(), "viewer closed");
    Ok(())
}

fn draw_field(field: &Field, cell_size: f64, transform: math::Matrix2d, g: &mut G2d) {
    for (row, col, cell) in field.iter() {
        rectangle(
            cell.transition().color(),
            [col as f64 * cell_size, row as f64 * cell_size, cell_size, cell_size],
            transform,
            g,
        );
    }
}
