/// objwire - OBJ wireframe rasterizer
///
/// Reads the vertices and triangular faces of an OBJ file, draws every edge
/// into a pixel buffer and prints an ASCII preview.
/// Logging is controlled through `RUST_LOG` (default `info`).

use clap::Parser;
use objwire_terminal::Args;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.run()?;

    Ok(())
}
