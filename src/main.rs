use macroquad::prelude::*;
use stigmergy::simulation::params::Params;
use stigmergy::simulation::world::World;
use tracing_subscriber::EnvFilter;

mod graphics;

fn load_params() -> Params {
    let Some(path) = std::env::args().nth(1) else {
        return Params::default();
    };

    match Params::load_from_file(&path) {
        Ok(params) => {
            tracing::info!(%path, "loaded parameters");
            params
        }
        Err(e) => {
            tracing::warn!(%path, error = %e, "falling back to default parameters");
            Params::default()
        }
    }
}

#[macroquad::main("Stigmergy")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let params = load_params();
    let mut world = match World::new(params) {
        Ok(world) => world,
        Err(e) => {
            tracing::error!(error = %e, "cannot build world");
            return;
        }
    };

    loop {
        clear_background(BLACK);

        world.tick(get_frame_time());

        graphics::draw_arena(world.params());
        graphics::draw_scent(&world);
        graphics::draw_nests(&world);
        graphics::draw_agents(&world);
        graphics::draw_status(&world);

        next_frame().await
    }
}
