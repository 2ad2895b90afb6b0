pub mod api;
pub mod filters;
pub mod forms;
pub mod identity;
pub mod listing;
pub mod logging;
pub mod notify;
pub mod player;
pub mod prefs;
pub mod shell;
pub mod ui;
