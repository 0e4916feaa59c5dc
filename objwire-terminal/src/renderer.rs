/// ASCII preview of a pixel buffer for terminal output
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use objwire_core::PixelBuffer;

const LIT: char = '#';
const UNLIT: char = ' ';

/// Downsamples a [`PixelBuffer`] onto a character grid
pub struct AsciiRenderer {
    columns: usize,
    rows: usize,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            char_buffer: vec![UNLIT; columns * rows],
        }
    }

    /// Size the grid to `columns` characters, keeping the buffer's aspect
    /// ratio with terminal cells roughly twice as tall as they are wide
    pub fn fit(buffer: &PixelBuffer, columns: usize) -> Self {
        let columns = columns.max(1);
        let rows = if buffer.width() == 0 {
            1
        } else {
            (columns * buffer.height()).div_ceil(buffer.width() * 2)
        };
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(UNLIT);
    }

    /// Mark every character cell that covers at least one lit pixel
    pub fn render(&mut self, buffer: &PixelBuffer) {
        self.clear();
        if buffer.width() == 0 || buffer.height() == 0 {
            return;
        }
        for (x, y) in buffer.lit_pixels() {
            let column = (x * self.columns / buffer.width()).min(self.columns - 1);
            let row = (y * self.rows / buffer.height()).min(self.rows - 1);
            self.char_buffer[row * self.columns + column] = LIT;
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.char_buffer
            .chunks(self.columns)
            .map(|row| row.iter().collect())
            .collect()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetForegroundColor(Color::Cyan))?;
        for line in self.lines() {
            writer.queue(Print(line.trim_end()))?;
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}
