use crate::animation::resize_gif;
use crate::error::{Error, Result};
use crate::format::OutputFormat;
use crate::ops;
use crate::timing::Timings;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Report precision for header reads, which finish in microseconds.
pub const HEADER_PRECISION: usize = 6;
pub const DEFAULT_PRECISION: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BenchKind {
    Header,
    Resize {
        format: OutputFormat,
        width: u32,
        height: u32,
    },
    ResizeGif {
        width: u32,
        height: u32,
    },
    Transcode {
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Asset path, relative to the runner's assets directory.
    pub path: PathBuf,
    pub iterations: usize,
    #[serde(flatten)]
    pub kind: BenchKind,
}

impl BenchCase {
    pub fn new(path: impl Into<PathBuf>, iterations: usize, kind: BenchKind) -> Self {
        Self {
            label: None,
            path: path.into(),
            iterations,
            kind,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    pub fn label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        let file = self.file_name();
        match &self.kind {
            BenchKind::Header => format!("{file} header read"),
            BenchKind::Resize {
                format,
                width,
                height,
            } => format!("{file} => {width}x{height} {format}"),
            BenchKind::ResizeGif { width, height } => format!("{file} => {width}x{height} GIF"),
            BenchKind::Transcode { format } => format!("{file} => {format}"),
        }
    }

    pub fn precision(&self) -> usize {
        match self.kind {
            BenchKind::Header => HEADER_PRECISION,
            _ => DEFAULT_PRECISION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    pub cases: Vec<BenchCase>,
}

impl Default for Suite {
    fn default() -> Self {
        use BenchKind::*;
        use OutputFormat::*;

        let header = |label: &str, path: &str, n| BenchCase::new(path, n, Header).labeled(label);
        let resize = |label: &str, path: &str, format, width, height, n| {
            BenchCase::new(
                path,
                n,
                Resize {
                    format,
                    width,
                    height,
                },
            )
            .labeled(label)
        };
        let resize_gif = |label: &str, path: &str, width, height, n| {
            BenchCase::new(path, n, ResizeGif { width, height }).labeled(label)
        };
        let transcode = |label: &str, path: &str, format, n| {
            BenchCase::new(path, n, Transcode { format }).labeled(label)
        };

        Self {
            cases: vec![
                header("JPEG 1920x1080 header read", "1920.jpeg", 10000),
                header("PNG 1920x1080 header read", "1920.png", 10000),
                header("WEBP 1920x1080 header read", "1920.webp", 100),
                header("GIF 1920x1080 header read", "1920.gif", 10000),
                resize("JPEG 256x256 => 32x32", "256.jpeg", Jpeg, 32, 32, 1000),
                resize("PNG 256x256 => 32x32", "256.png", Png, 32, 32, 1000),
                resize("WEBP 256x256 => 32x32", "256.webp", WebP, 32, 32, 1000),
                resize_gif("GIF 256x256 => 32x32", "256.gif", 32, 32, 1000),
                resize("JPEG 1920x1080 => 800x600", "1920.jpeg", Jpeg, 800, 600, 100),
                resize("PNG 1920x1080 => 800x600", "1920.png", Png, 800, 600, 100),
                resize("WEBP 1920x1080 => 800x600", "1920.webp", WebP, 800, 600, 100),
                resize_gif("GIF 1920x1080 => 800x600", "1920.gif", 800, 600, 50),
                transcode("PNG 256x256 => WEBP 256x256", "256.png", WebP, 100),
                transcode("JPEG 256x256 => PNG 256x256", "256.jpeg", Png, 100),
                transcode("GIF 256x256 => PNG 256x256", "256.gif", Png, 100),
            ],
        }
    }
}

impl Suite {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let suite = Self::from_json(&json).map_err(|source| Error::Suite {
            path: path.to_path_buf(),
            source,
        })?;
        suite.validate()?;
        Ok(suite)
    }

    pub fn validate(&self) -> Result<()> {
        for case in &self.cases {
            if case.iterations == 0 {
                return Err(Error::NoIterations(case.label()));
            }
            match case.kind {
                BenchKind::Resize { width, height, .. } | BenchKind::ResizeGif { width, height }
                    if width == 0 || height == 0 =>
                {
                    return Err(Error::Dimensions { width, height });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Keeps the cases whose label contains `pattern`, ignoring case.
    pub fn filtered(mut self, pattern: &str) -> Self {
        let pattern = pattern.to_lowercase();
        self.cases
            .retain(|case| case.label().to_lowercase().contains(&pattern));
        self
    }
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub label: String,
    /// `WxH` for header reads, `N Bytes` of first output otherwise.
    pub detail: String,
    pub timings: Timings,
    pub precision: usize,
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:\t{},\t{}",
            self.label,
            self.detail,
            self.timings.report(self.precision)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Runner {
    pub assets_dir: PathBuf,
    /// Where the first output of each case is written, if anywhere.
    pub out_dir: Option<PathBuf>,
    pub prefix: String,
    pub max_iterations: Option<usize>,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("."),
            out_dir: None,
            prefix: String::from("rs"),
            max_iterations: None,
        }
    }
}

impl Runner {
    pub fn iterations(&self, case: &BenchCase) -> usize {
        let n = match self.max_iterations {
            Some(max) => case.iterations.min(max),
            None => case.iterations,
        };
        n.max(1)
    }

    pub fn run(&self, case: &BenchCase) -> Result<CaseReport> {
        let path = self.assets_dir.join(&case.path);
        let blob = fs::read(&path)?;
        let n = self.iterations(case);
        debug!("{}: {} bytes, {} iterations", path.display(), blob.len(), n);

        let mut timings = Timings::with_capacity(n);
        let mut detail = String::new();
        for i in 0..n {
            if let Some(d) = timings.time(|| self.iteration(case, &blob, i == 0))? {
                detail = d;
            }
        }

        Ok(CaseReport {
            label: case.label(),
            detail,
            timings,
            precision: case.precision(),
        })
    }

    fn iteration(&self, case: &BenchCase, blob: &[u8], first: bool) -> Result<Option<String>> {
        match &case.kind {
            BenchKind::Header => {
                let (width, height) = ops::read_header(blob)?;
                Ok(first.then(|| format!("{width}x{height}")))
            }
            BenchKind::Resize {
                format,
                width,
                height,
            } => {
                let out = ops::resize(blob, *format, *width, *height)?;
                self.first_output(first, &out, || {
                    format!("{}_{}.{}", self.prefix, width, format.extension())
                })
            }
            BenchKind::ResizeGif { width, height } => {
                let out = resize_gif(blob, *width, *height)?;
                self.first_output(first, &out, || format!("{}_{}.gif", self.prefix, width))
            }
            BenchKind::Transcode { format } => {
                let out = ops::transcode(blob, *format)?;
                self.first_output(first, &out, || {
                    format!(
                        "{}_{}_transcode.{}",
                        self.prefix,
                        case.file_name(),
                        format.extension()
                    )
                })
            }
        }
    }

    fn first_output<F>(&self, first: bool, out: &[u8], name: F) -> Result<Option<String>>
    where
        F: FnOnce() -> String,
    {
        if !first {
            return Ok(None);
        }
        if let Some(dir) = &self.out_dir {
            let path = dir.join(name());
            fs::write(&path, out)?;
            debug!("wrote {}", path.display());
        }
        Ok(Some(format!("{} Bytes", out.len())))
    }
}
