//! Management of font files registered for the whole process.

use crate::error::{Error, Result};

use fontconfig::{Fontconfig, Pattern};
use fontconfig_sys::fontconfig as sys;
use std::collections::{BTreeMap, HashMap};
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

static FONTCONFIG: OnceLock<Option<Fontconfig>> = OnceLock::new();
static FONT_MAP: OnceLock<FontMap> = OnceLock::new();

/// Maps the keys used in theme font lists to the family names fontconfig
/// knows the registered files by.
#[derive(Debug, Default)]
pub struct FontMap {
    loaded: HashMap<String, String>,
}

impl FontMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.loaded.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Comma separated family list for pango; unknown keys are passed through
    /// so system fonts can be named directly.
    pub fn family_list(&self, keys: &[&str]) -> String {
        keys.iter()
            .map(|k| self.get(k).unwrap_or(*k))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn load_font_from_file(&mut self, key: &str, fp: impl AsRef<Path>) -> Result<&str> {
        let fp = fp.as_ref();
        let fc = FONTCONFIG
            .get_or_init(Fontconfig::new)
            .as_ref()
            .ok_or_else(|| Error::load_font(key, "fontconfig is unavailable"))?;
        if !fp.is_file() {
            return Err(Error::load_font(key, format!("{} not found", fp.display())));
        }
        let c_fp = CString::new(fp.to_string_lossy().to_string())
            .map_err(|_| Error::load_font(key, "path contains a NUL byte"))?;
        let family = Self::scan_family(fc, &c_fp)
            .ok_or_else(|| Error::load_font(key, "not a font file"))?;

        let status = unsafe {
            sys::FcConfigAppFontAddFile(std::ptr::null_mut(), c_fp.as_ptr() as *const sys::FcChar8)
        };
        if status == 0 {
            return Err(Error::load_font(key, "fontconfig rejected the file"));
        }
        self.loaded.insert(key.to_string(), family);
        Ok(&self.loaded[key])
    }

    fn scan_family(fc: &Fontconfig, c_fp: &CString) -> Option<String> {
        unsafe {
            let set = sys::FcFontSetCreate();
            let status = sys::FcFileScan(
                set,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                c_fp.as_ptr() as *const sys::FcChar8,
                1,
            );
            let result = if status == 0 || (*set).nfont < 1 {
                None
            } else {
                let pat = Pattern::from_pattern(fc, *(*set).fonts);
                let family = pat
                    .get_string(sys::constants::FC_FAMILY.as_cstr())
                    .map(str::to_string);
                family
            };
            sys::FcFontSetDestroy(set);
            result
        }
    }
}

/// Registers every configured font file once per process. Files that can't be
/// loaded are skipped with a warning.
pub fn register(fonts: &BTreeMap<String, PathBuf>) -> &'static FontMap {
    FONT_MAP.get_or_init(|| {
        let mut map = FontMap::new();
        for (key, path) in fonts {
            match map.load_font_from_file(key, path) {
                Ok(family) => info!(%key, family, "registered font"),
                Err(e) => warn!(error = %e, "skipping font"),
            }
        }
        map
    })
}

/// The process-wide font map, empty until [`register`] has run.
pub fn registered() -> &'static FontMap {
    static EMPTY: OnceLock<FontMap> = OnceLock::new();
    FONT_MAP.get().unwrap_or_else(|| EMPTY.get_or_init(FontMap::new))
}
