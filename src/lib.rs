pub mod comparator;
pub mod effects;
pub mod encoded;
pub mod enhance;
pub mod export;
pub mod gui;
pub mod intake;
pub mod logging;
pub mod preferences;
pub mod session;
pub mod settings;
pub mod task;
