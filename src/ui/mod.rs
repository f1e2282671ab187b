pub mod countdown;
pub mod icons;
pub mod render;

pub use countdown::Countdown;
