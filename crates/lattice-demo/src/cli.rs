//! Command-line configuration for the demo.

use clap::{Parser, ValueEnum};
use winit::dpi::LogicalSize;

use lattice_engine::logging::LoggingConfig;
use lattice_engine::paint::Color;
use lattice_engine::window::{RedrawMode, RuntimeConfig};

/// Largest `--lines` value accepted.
pub const MAX_GRID_LINES: u32 = 10_000;

#[derive(Parser, Debug, Clone)]
#[command(name = "lattice-demo")]
#[command(about = "Draws a line grid, a point and an optional square", long_about = None)]
pub struct Cli {
    /// Window title
    #[arg(long, default_value = "Lattice Demo")]
    pub title: String,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Grid lines on each side of the axes
    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_GRID_LINES))
    )]
    pub lines: u32,

    /// Distance between grid lines in NDC units
    #[arg(long, default_value_t = 0.1, value_parser = positive_finite)]
    pub spacing: f32,

    /// Point position as `x,y` in NDC
    #[arg(long, default_value = "0,0", value_parser = parse_pair, allow_hyphen_values = true)]
    pub point: (f32, f32),

    /// Point size in pixels
    #[arg(long, default_value_t = 10.0, value_parser = positive_finite)]
    pub point_size: f32,

    /// Square to draw over the grid
    #[arg(long, value_enum, default_value_t = SquareMode::Off)]
    pub square: SquareMode,

    /// Fill color as `r,g,b` in [0, 1] or `#rrggbb`
    #[arg(long, default_value = "1,0.5,0.5", value_parser = parse_rgb)]
    pub color: Color,

    /// Clear color as `r,g,b` in [0, 1] or `#rrggbb`
    #[arg(long, default_value = "0,0,0", value_parser = parse_rgb)]
    pub clear: Color,

    /// Redraw every loop iteration instead of on demand
    #[arg(long)]
    pub continuous: bool,

    /// Log filter, overrides RUST_LOG (e.g. "lattice_engine=debug")
    #[arg(long)]
    pub log: Option<String>,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, ValueEnum)]
pub enum SquareMode {
    #[default]
    Off,
    /// Filled with `--color`
    Flat,
    /// Red per-vertex color
    Colored,
}

/// Everything the demo needs at startup.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
    pub grid_lines: u32,
    pub spacing: f32,
    pub point: (f32, f32),
    pub point_size: f32,
    pub square: SquareMode,
    pub color: Color,
    pub clear: Color,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig {
                title: "Lattice Demo".to_string(),
                initial_size: LogicalSize::new(800.0, 600.0),
                redraw: RedrawMode::OnDemand,
            },
            logging: LoggingConfig::default(),
            grid_lines: 10,
            spacing: 0.1,
            point: (0.0, 0.0),
            point_size: 10.0,
            square: SquareMode::Off,
            color: Color::SALMON,
            clear: Color::BLACK,
        }
    }
}

impl From<Cli> for DemoConfig {
    fn from(cli: Cli) -> Self {
        let redraw = if cli.continuous {
            RedrawMode::Continuous
        } else {
            RedrawMode::OnDemand
        };

        Self {
            runtime: RuntimeConfig {
                title: cli.title,
                initial_size: LogicalSize::new(f64::from(cli.width), f64::from(cli.height)),
                redraw,
            },
            logging: LoggingConfig {
                env_filter: cli.log,
                ..LoggingConfig::default()
            },
            grid_lines: cli.lines,
            spacing: cli.spacing,
            point: cli.point,
            point_size: cli.point_size,
            square: cli.square,
            color: cli.color,
            clear: cli.clear,
        }
    }
}

fn positive_finite(s: &str) -> Result<f32, String> {
    let v: f32 = s.trim().parse().map_err(|_| format!("`{s}` is not a number"))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(format!("`{s}` must be a finite number greater than 0"))
    }
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got `{s}`"));
    }

    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        let v: f32 = part.parse().map_err(|_| format!("`{part}` is not a number"))?;
        if !v.is_finite() {
            return Err(format!("`{part}` is not finite"));
        }
        *slot = v;
    }
    Ok(out)
}

fn parse_pair(s: &str) -> Result<(f32, f32), String> {
    let [x, y] = parse_floats::<2>(s)?;
    Ok((x, y))
}

fn parse_rgb(s: &str) -> Result<Color, String> {
    if s.trim_start().starts_with('#') {
        return Color::from_hex(s.trim()).ok_or_else(|| format!("`{s}` is not a #rrggbb color"));
    }

    let [r, g, b] = parse_floats::<3>(s)?;
    if [r, g, b].iter().any(|c| !(0.0..=1.0).contains(c)) {
        return Err(format!("color channels in `{s}` must be within [0, 1]"));
    }
    Ok(Color::rgb(r, g, b))
}
