pub mod input;
#[cfg(feature = "host")]
pub mod time;
#[cfg(feature = "host")]
pub mod window;
