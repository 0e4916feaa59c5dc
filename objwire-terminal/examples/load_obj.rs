/// Example: Load an OBJ file and preview its wireframe in the terminal
///
/// Usage: cargo run --example load_obj -- path/to/file.obj

use std::env;
use std::io::{self, Write};
use objwire_core::{draw_wireframe, obj, GeometryStore, PixelBuffer, SENTINEL};
use objwire_terminal::{AsciiRenderer, CHANNELS};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let store = if args.len() < 2 {
        eprintln!("Usage: {} <obj-file>", args[0]);
        eprintln!("\nNo OBJ file provided, using default cube...");
        GeometryStore::cube(2.0)
    } else {
        println!("Loading OBJ file: {}", args[1]);
        obj::parse_file(&args[1])?
    };

    let counts = store.counts();
    println!("Loaded {} vertices and {} faces", counts.vertices, counts.faces);

    let mut buffer = PixelBuffer::new(320, 160, CHANNELS)?;
    let stats = draw_wireframe(&store, &mut buffer, &SENTINEL)?;
    println!("Drew {} edges ({} pixels)", stats.edges, stats.pixels);

    let mut renderer = AsciiRenderer::fit(&buffer, 80);
    renderer.render(&buffer);

    let mut stdout = io::stdout().lock();
    renderer.draw(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}
