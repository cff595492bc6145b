use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

mod auth;
mod export;
mod serve;

pub use auth::auth;
pub use export::export;
pub use export::records;
pub use serve::serve;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
