use anyhow::Result;

use sqlite_typegen::Args;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let paths = Args::from_env().resolve()?;
    sqlite_typegen::generate(&paths)?;
    Ok(())
}
