/// Command-line driver: parse an OBJ file, draw its wireframe, preview it
use std::io::{stdout, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::terminal;
use objwire_core::{draw_wireframe, ObjParser, ParseReport, PixelBuffer, WireframeStats, SENTINEL};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Samples per pixel; the sentinel color is an RGB triple
pub const CHANNELS: usize = SENTINEL.len();

const FALLBACK_COLUMNS: u16 = 80;

/// Draw the edges of a triangle mesh read from an OBJ file
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// OBJ file to read
    pub path: PathBuf,

    /// Pixel buffer width
    #[arg(long, default_value_t = 1080, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Pixel buffer height
    #[arg(long, default_value_t = 1080, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Fail on the first malformed record instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Do not print the ASCII preview
    #[arg(long)]
    pub no_preview: bool,

    /// Preview width in characters (defaults to the terminal width)
    #[arg(long)]
    pub columns: Option<u16>,
}

/// Everything produced by one run
#[derive(Debug)]
pub struct Rendered {
    pub report: ParseReport,
    pub stats: WireframeStats,
    pub buffer: PixelBuffer,
}

impl Args {
    pub fn render(&self) -> anyhow::Result<Rendered> {
        let outcome = ObjParser::new()
            .strict(self.strict)
            .parse_file(&self.path)
            .with_context(|| format!("failed to load {}", self.path.display()))?;

        let mut buffer = PixelBuffer::new(self.width as usize, self.height as usize, CHANNELS)
            .context("failed to allocate the pixel buffer")?;
        let stats = draw_wireframe(&outcome.store, &mut buffer, &SENTINEL)
            .with_context(|| format!("failed to draw {}", self.path.display()))?;

        tracing::info!(
            faces = stats.faces,
            edges = stats.edges,
            pixels = stats.pixels,
            "drew wireframe"
        );

        Ok(Rendered {
            report: outcome.report,
            stats,
            buffer,
        })
    }

    pub fn preview_columns(&self) -> u16 {
        self.columns
            .or_else(|| terminal::size().ok().map(|(width, _)| width))
            .filter(|&width| width > 0)
            .unwrap_or(FALLBACK_COLUMNS)
    }

    pub fn run(&self) -> anyhow::Result<Rendered> {
        let rendered = self.render()?;

        if !self.no_preview {
            let columns = self.preview_columns() as usize;
            let mut renderer = AsciiRenderer::fit(&rendered.buffer, columns);
            renderer.render(&rendered.buffer);

            let mut stdout = stdout().lock();
            renderer.draw(&mut stdout)?;
            stdout.flush()?;
        }

        Ok(rendered)
    }
}
