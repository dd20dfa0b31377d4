//! PDFium library loader with platform-specific search paths.

use crate::error::{DocumentError, DocumentResult};
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Environment variable naming a directory that holds the PDFium library
pub const PDFIUM_DIR_ENV: &str = "FIELDBOARD_PDFIUM_DIR";

pub struct PdfiumLoader;

impl PdfiumLoader {
    /// Bind PDFium from the known search directories, then the system library.
    ///
    /// Search order:
    /// 1. `$FIELDBOARD_PDFIUM_DIR`
    /// 2. `lib/` in the current working directory
    /// 3. `lib/` next to the executable
    /// 4. `Resources/lib/` of a macOS bundle
    /// 5. System library
    pub fn load() -> DocumentResult<Pdfium> {
        for dir in Self::search_dirs() {
            let path = Pdfium::pdfium_platform_library_name_at_path(&dir);
            if !path.exists() {
                continue;
            }
            match Pdfium::bind_to_library(&path) {
                Ok(bindings) => {
                    debug!(path = %path.display(), "bound pdfium");
                    return Ok(Pdfium::new(bindings));
                }
                Err(e) => warn!(path = %path.display(), error = ?e, "failed to bind pdfium"),
            }
        }
        Pdfium::bind_to_system_library()
            .map(Pdfium::new)
            .map_err(|e| DocumentError::Raster(format!("failed to load pdfium: {:?}", e)))
    }

    fn search_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        if let Some(dir) = std::env::var_os(PDFIUM_DIR_ENV) {
            dirs.push(PathBuf::from(dir));
        }

        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd.join("lib"));
        }

        if let Ok(exe) = std::env::current_exe()
            && let Some(parent) = exe.parent()
        {
            dirs.push(parent.join("lib"));
            if let Some(grandparent) = parent.parent() {
                dirs.push(grandparent.join("Resources/lib"));
            }
        }

        dirs
    }
}
