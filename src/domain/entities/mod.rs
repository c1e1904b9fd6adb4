//! Domain entities

pub mod command;
pub mod intent;
pub mod effect;

pub use command::Command;
pub use intent::Intent;
pub use effect::Effect;
