use anyhow::{anyhow, Result};
use hecs::Entity;
use sdl2::pixels::Color;
use sdl2::Sdl;

use ledge::engine::input::InputState;
use ledge::engine::time::FrameTimer;
use ledge::engine::window::GameWindow;
use ledge::scene::test_scene::{SCENE_HEIGHT, SCENE_WIDTH};
use ledge::{Simulation, TickStatus};

const TICK_RATE: u32 = 60;

const BACKGROUND: Color = Color { r: 100, g: 100, b: 100, a: 255 };
const BLOCK: Color = Color { r: 255, g: 255, b: 255, a: 255 };
const ACTOR: Color = Color { r: 230, g: 120, b: 40, a: 255 };
const HITBOX: Color = Color { r: 255, g: 255, b: 0, a: 255 };

/// Windowed host: polls SDL input, ticks the simulation once per frame and
/// draws every hitbox.
pub struct GameApp {
    sim: Simulation,
    player: Entity,
    window: GameWindow,
}

impl GameApp {
    pub fn new(sdl: &Sdl, sim: Simulation, player: Entity) -> Result<Self> {
        let window = GameWindow::new(sdl, "ledge", SCENE_WIDTH, SCENE_HEIGHT)?;
        Ok(Self {
            sim,
            player,
            window,
        })
    }

    pub fn run(&mut self, sdl: &Sdl) -> Result<()> {
        let mut event_pump = sdl.event_pump().map_err(|e| anyhow!(e))?;
        let mut input = InputState::new();
        let mut timer = FrameTimer::new(TICK_RATE);

        loop {
            timer.tick();
            input.update(&mut event_pump);

            if self.sim.tick(&input.snapshot()) == TickStatus::Quit {
                break;
            }
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        self.window.clear(BACKGROUND);

        for view in self.sim.snapshot() {
            // Draw where the actor is now; the stored hitbox lags one commit.
            let mut area = view.hitbox;
            area.min += view.velocity;
            if view.state.is_some() {
                self.window.fill(&area, ACTOR)?;
                self.window.outline(&area, HITBOX)?;
            } else {
                self.window.fill(&area, BLOCK)?;
            }
        }

        let player = (self.sim.position(self.player), self.sim.state(self.player));
        if let (Some(pos), Some(state)) = player {
            let title = format!("ledge ({:.0}, {:.0}) {:?}", pos.x, pos.y, state);
            self.window.set_title(&title)?;
        }

        self.window.present();
        Ok(())
    }
}
