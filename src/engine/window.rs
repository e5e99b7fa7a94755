use anyhow::{anyhow, Result};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::Sdl;

use crate::components::Aabb;

/// SDL2 window with an accelerated 2D canvas.
pub struct GameWindow {
    canvas: Canvas<Window>,
}

impl GameWindow {
    pub fn new(sdl: &Sdl, title: &str, width: u32, height: u32) -> Result<Self> {
        let video = sdl.video().map_err(|e| anyhow!("failed to init SDL2 video: {e}"))?;

        let window = video
            .window(title, width, height)
            .position_centered()
            .build()?;

        let canvas = window.into_canvas().accelerated().build()?;
        Ok(Self { canvas })
    }

    pub fn clear(&mut self, color: Color) {
        self.canvas.set_draw_color(color);
        self.canvas.clear();
    }

    pub fn fill(&mut self, area: &Aabb, color: Color) -> Result<()> {
        self.canvas.set_draw_color(color);
        self.canvas.fill_rect(to_rect(area)).map_err(|e| anyhow!(e))
    }

    pub fn outline(&mut self, area: &Aabb, color: Color) -> Result<()> {
        self.canvas.set_draw_color(color);
        self.canvas.draw_rect(to_rect(area)).map_err(|e| anyhow!(e))
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.canvas.window_mut().set_title(title)?;
        Ok(())
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }
}

fn to_rect(area: &Aabb) -> Rect {
    Rect::new(
        area.left().round() as i32,
        area.top().round() as i32,
        area.size.x.max(1.0).round() as u32,
        area.size.y.max(1.0).round() as u32,
    )
}
