//! Page geometry: sheet and margins in device pixels

use crate::{LayoutError, Result, MM_PER_INCH};
use render_model::Rect;
use serde::{Deserialize, Serialize};

/// Margin widths in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            left: 20.0,
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
        }
    }
}

/// The sheet rectangle and the margin rectangle inside it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub sheet: Rect,
    pub margins: Rect,
}

impl PageGeometry {
    pub fn new(sheet: Rect, margins: Rect) -> Self {
        Self { sheet, margins }
    }

    /// Build geometry from a sheet size and margin widths in millimetres
    pub fn from_millimetres(width: f64, height: f64, margins: PageMargins, dpi: f64) -> Self {
        let dpmm = dpi / MM_PER_INCH;
        let sheet = Rect::new(0.0, 0.0, width * dpmm, height * dpmm);
        let inner = Rect::new(
            margins.left * dpmm,
            margins.top * dpmm,
            (width - margins.left - margins.right) * dpmm,
            (height - margins.top - margins.bottom) * dpmm,
        );
        Self::new(sheet, inner)
    }

    /// Margin rect for the current sheet.
    ///
    /// Mirrored sheets swap the left and right margin widths, as on the back
    /// of a printed page.
    pub fn current_margins(&self, mirrored: bool) -> Rect {
        if !mirrored {
            return self.margins;
        }
        let left = self.margins.x - self.sheet.x;
        let right = self.sheet.right() - self.margins.right();
        Rect::new(
            self.sheet.x + right,
            self.margins.y,
            self.sheet.width - left - right,
            self.margins.height,
        )
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sheet.width > 0.0 && self.sheet.height > 0.0) {
            return Err(LayoutError::InvalidPageSetup(format!(
                "sheet must have positive size, got {}x{}",
                self.sheet.width, self.sheet.height
            )));
        }
        if !(self.margins.width > 0.0 && self.margins.height > 0.0) {
            return Err(LayoutError::InvalidPageSetup(format!(
                "margin area must have positive size, got {}x{}",
                self.margins.width, self.margins.height
            )));
        }
        if !self.sheet.contains_rect(&self.margins) {
            return Err(LayoutError::InvalidPageSetup(
                "margin area extends outside the sheet".to_string(),
            ));
        }
        Ok(())
    }
}
