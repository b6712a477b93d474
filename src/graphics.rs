use macroquad::prelude::*;
use ndarray::Array1;
use stigmergy::simulation::agent::AgentState;
use stigmergy::simulation::locatable::Locatable;
use stigmergy::simulation::nest::Rgba;
use stigmergy::simulation::params::Params;
use stigmergy::simulation::world::World;

/// Scent weaker than this is not drawn.
const MIN_VISIBLE_STRENGTH: f32 = 0.01;

trait ToScreen {
    type Output;
    fn to_screen(&self, params: &Params) -> Self::Output;
}

fn screen_scale(params: &Params) -> f32 {
    (screen_width() / params.box_width).min(screen_height() / params.box_height)
}

impl ToScreen for Array1<f32> {
    type Output = Vec2;
    fn to_screen(&self, params: &Params) -> Vec2 {
        let scale = screen_scale(params);
        vec2(self[0] * scale, self[1] * scale)
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, params: &Params) -> f32 {
        self * screen_scale(params)
    }
}

fn to_color(c: Rgba) -> Color {
    Color::from_rgba(c.r, c.g, c.b, c.a)
}

pub fn draw_arena(params: &Params) {
    let size = vec2(params.box_width, params.box_height) * screen_scale(params);
    draw_rectangle(0.0, 0.0, size.x, size.y, Color::from_rgba(220, 220, 220, 255));
}

pub fn draw_scent(world: &World) {
    let params = world.params();
    let dot = 1.0f32.to_screen(params).max(1.0);

    for sample in world.samples() {
        if sample.strength <= MIN_VISIBLE_STRENGTH {
            continue;
        }
        let Some(nest) = world.nests().iter().find(|n| n.id == sample.owner_id) else {
            continue;
        };

        let alpha = (sample.strength / params.max_pheromone_strength).clamp(0.1, 1.0);
        let mut color = to_color(nest.color);
        color.a = alpha;

        let p = sample.pos().to_screen(params);
        draw_rectangle(p.x, p.y, dot, dot, color);
    }
}

pub fn draw_nests(world: &World) {
    let params = world.params();
    for nest in world.nests() {
        let p = nest.pos().to_screen(params);
        draw_circle(p.x, p.y, nest.radius.to_screen(params), to_color(nest.fill_color()));
    }
}

pub fn draw_agents(world: &World) {
    let params = world.params();
    let size = params.agent_size.to_screen(params);

    for agent in &world.agents {
        let p = agent.pos().to_screen(params);
        draw_rectangle(p.x - size / 2.0, p.y - size / 2.0, size, size, to_color(agent.color));
    }
}

pub fn draw_status(world: &World) {
    let mut text = format!("t={:.1}s", world.time);
    for state in AgentState::ALL {
        let label = match state {
            AgentState::Exploring => "exploring",
            AgentState::ReturningToNest => "returning",
            AgentState::RestingAtNest => "resting",
        };
        text.push_str(&format!("  {label}={}", world.count_in_state(state)));
    }
    text.push_str(&format!("  scent={}", world.field.len()));
    draw_text(&text, 10.0, screen_height() - 10.0, 20.0, DARKGRAY);

    for (i, event) in world.event_log().recent(5).enumerate() {
        draw_text(&event.description(), 10.0, 20.0 + i as f32 * 16.0, 16.0, BLACK);
    }
}
