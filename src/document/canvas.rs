//! Drawing surface for images.
//!
//! A canvas starts fully unpainted and is filled row range by row range
//! from a [`Bitmap`].

use std::ops::Range;

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// One cell of an image: a glyph with an optional color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub ch: char,
    pub color: Option<Rgb>,
}

impl Pixel {
    pub fn glyph(ch: char) -> Self {
        Self { ch, color: None }
    }

    pub fn colored(color: Rgb) -> Self {
        Self {
            ch: '█',
            color: Some(color),
        }
    }
}

/// A decoded image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Bitmap {
    /// Build a bitmap from rows. Short rows are padded with spaces.
    pub fn from_rows(rows: Vec<Vec<Pixel>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();
        let mut pixels = Vec::with_capacity(width * height);
        for mut row in rows {
            row.resize(width, Pixel::glyph(' '));
            pixels.extend(row);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row(&self, y: usize) -> Option<&[Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.pixels[start..start + self.width])
    }
}

/// Canvas node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Option<Pixel>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Copy `rows` of `bitmap` onto the same rows of the canvas.
    pub fn paint_rows(&mut self, bitmap: &Bitmap, rows: Range<usize>) {
        let end = rows.end.min(self.height).min(bitmap.height());
        for y in rows.start..end {
            if let Some(src) = bitmap.row(y) {
                let start = y * self.width;
                for (x, pixel) in src.iter().take(self.width).enumerate() {
                    self.cells[start + x] = Some(*pixel);
                }
            }
        }
    }

    pub fn row(&self, y: usize) -> Option<&[Option<Pixel>]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Number of rows with at least one painted cell.
    pub fn painted_rows(&self) -> usize {
        (0..self.height)
            .filter(|&y| self.row(y).is_some_and(|row| row.iter().any(Option::is_some)))
            .count()
    }

    pub fn is_fully_painted(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}
