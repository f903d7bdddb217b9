// src/common/fonts.rs

use std::path::{Path, PathBuf};

use genpdf::fonts::{FontData, FontFamily};
use rusttype::Font;

use crate::common::error::AppError;

/// One font family, loaded once and shared by the rasterizer and the PDF writer.
///
/// Files follow the genpdf naming convention:
/// `<dir>/<family>-Regular.ttf`, `-Bold`, `-Italic` and `-BoldItalic`.
pub struct FontSet {
    pub family: String,
    pub regular: Font<'static>,
    pub bold: Font<'static>,
    data: FontFamily<Vec<u8>>,
}

impl FontSet {
    pub fn load(dir: &Path, family: &str) -> Result<Self, AppError> {
        let read = |style: &str| -> Result<Vec<u8>, AppError> {
            let path = font_path(dir, family, style);
            std::fs::read(&path).map_err(|e| {
                tracing::warn!("Font file {} could not be read: {}", path.display(), e);
                AppError::FontNotFound(path.display().to_string())
            })
        };

        let data = FontFamily {
            regular: read("Regular")?,
            bold: read("Bold")?,
            italic: read("Italic")?,
            bold_italic: read("BoldItalic")?,
        };

        let parse = |bytes: &Vec<u8>, style: &str| {
            Font::try_from_vec(bytes.clone())
                .ok_or_else(|| AppError::FontNotFound(font_path(dir, family, style).display().to_string()))
        };
        let regular = parse(&data.regular, "Regular")?;
        let bold = parse(&data.bold, "Bold")?;

        tracing::debug!("Loaded font family {} from {}", family, dir.display());

        Ok(Self {
            family: family.to_string(),
            regular,
            bold,
            data,
        })
    }

    /// A fresh genpdf family; genpdf takes ownership of the font data per document.
    pub fn pdf_family(&self) -> Result<FontFamily<FontData>, AppError> {
        Ok(FontFamily {
            regular: FontData::new(self.data.regular.clone(), None)?,
            bold: FontData::new(self.data.bold.clone(), None)?,
            italic: FontData::new(self.data.italic.clone(), None)?,
            bold_italic: FontData::new(self.data.bold_italic.clone(), None)?,
        })
    }
}

fn font_path(dir: &Path, family: &str, style: &str) -> PathBuf {
    dir.join(format!("{family}-{style}.ttf"))
}

#[cfg(test)]
pub(crate) fn test_fonts() -> FontSet {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("fonts");
    FontSet::load(&dir, "DejaVuSans").expect("bundled test fonts")
}
