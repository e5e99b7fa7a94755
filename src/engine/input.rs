use std::collections::HashSet;

use clap::ValueEnum;

/// Logical keys the simulation understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Key {
    Left,
    Right,
    Jump,
    Quit,
}

/// The set of logical keys held during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pressed: HashSet<Key>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Held now but not in `previous`.
    pub fn just_pressed(&self, previous: &Self, key: Key) -> bool {
        self.is_pressed(key) && !previous.is_pressed(key)
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    pub fn should_quit(&self) -> bool {
        self.is_pressed(Key::Quit)
    }
}

impl FromIterator<Key> for InputSnapshot {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            pressed: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[Key; N]> for InputSnapshot {
    fn from(keys: [Key; N]) -> Self {
        keys.into_iter().collect()
    }
}

#[cfg(feature = "host")]
pub use self::sdl::InputState;

#[cfg(feature = "host")]
mod sdl {
    use sdl2::event::Event;
    use sdl2::keyboard::Scancode;
    use sdl2::EventPump;
    use std::collections::HashSet;

    use super::{InputSnapshot, Key};

    /// Raw keyboard state accumulated from SDL events.
    pub struct InputState {
        pub keys: HashSet<Scancode>,
        pub quit: bool,
    }

    impl InputState {
        pub fn new() -> Self {
            Self {
                keys: HashSet::new(),
                quit: false,
            }
        }

        pub fn update(&mut self, event_pump: &mut EventPump) {
            for event in event_pump.poll_iter() {
                match event {
                    Event::Quit { .. } => self.quit = true,
                    Event::KeyDown {
                        scancode: Some(sc), ..
                    } => {
                        self.keys.insert(sc);
                    }
                    Event::KeyUp {
                        scancode: Some(sc), ..
                    } => {
                        self.keys.remove(&sc);
                    }
                    _ => {}
                }
            }
        }

        /// Map held scancodes onto logical keys.
        pub fn snapshot(&self) -> InputSnapshot {
            let mut snapshot: InputSnapshot =
                self.keys.iter().filter_map(|&sc| map_key(sc)).collect();
            if self.quit {
                snapshot.press(Key::Quit);
            }
            snapshot
        }
    }

    fn map_key(sc: Scancode) -> Option<Key> {
        match sc {
            Scancode::A | Scancode::Left => Some(Key::Left),
            Scancode::D | Scancode::Right => Some(Key::Right),
            Scancode::W | Scancode::Up | Scancode::Space => Some(Key::Jump),
            Scancode::Escape => Some(Key::Quit),
            _ => None,
        }
    }
}
