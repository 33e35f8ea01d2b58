//! Command-line interface for neogrid.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use neogrid_config::Config;

/// neogrid - GPU renderer for editor-driven character grids
#[derive(Parser, Debug)]
#[command(name = "neogrid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Font family name or path to a TTF/OTF file
    #[arg(long, value_name = "FAMILY_OR_PATH")]
    pub font: Option<String>,

    /// Font size in points
    #[arg(long, value_name = "POINTS")]
    pub font_size: Option<f32>,

    /// DPI override (default: platform DPI times the window scale factor)
    #[arg(long, value_name = "DPI")]
    pub dpi: Option<f32>,

    /// Initial grid rows
    #[arg(long, value_name = "ROWS")]
    pub rows: Option<usize>,

    /// Initial grid columns
    #[arg(long, value_name = "COLS")]
    pub cols: Option<usize>,

    /// Draw box-drawing and block characters from the font instead of procedurally
    #[arg(long)]
    pub no_box_drawing: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LevelFilter>,

    /// Exit after the specified number of seconds
    #[arg(long, value_name = "SECONDS")]
    pub exit_after: Option<f64>,
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    pub font: Option<String>,
    pub font_size: Option<f32>,
    pub dpi: Option<f32>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub no_box_drawing: bool,
    pub config_path: Option<PathBuf>,
    pub log_level: Option<LevelFilter>,
    pub exit_after: Option<f64>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            font: cli.font,
            font_size: cli.font_size,
            dpi: cli.dpi,
            rows: cli.rows,
            cols: cli.cols,
            no_box_drawing: cli.no_box_drawing,
            config_path: cli.config,
            log_level: cli.log_level,
            exit_after: cli.exit_after,
        }
    }
}

impl RuntimeOptions {
    /// Override config values with the ones given on the command line.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(font) = &self.font {
            config.font_family = font.clone();
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if self.dpi.is_some() {
            config.dpi = self.dpi;
        }
        if let Some(rows) = self.rows {
            config.initial_rows = rows;
        }
        if let Some(cols) = self.cols {
            config.initial_cols = cols;
        }
        if self.no_box_drawing {
            config.box_drawing = false;
        }
    }
}

/// Parse the process arguments. `--help` and `--version` exit here.
pub fn process_cli() -> RuntimeOptions {
    Cli::parse().into()
}
