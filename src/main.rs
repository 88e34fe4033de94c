mod audio;
mod config;
mod library;
mod logging;
mod runtime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()?;
    Ok(())
}
