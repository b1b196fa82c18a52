mod app;
mod audio;
mod config;
mod error;
mod library;
mod mpris;
mod playback;
mod runtime;
mod settings;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
