use anyhow::Result;

use lattice_engine::paint::Color;
use lattice_engine::render::geometry::grid_byte_size;
use lattice_engine::render::shapes::{Grid, Point, Square};
use lattice_engine::render::{PrimitiveRenderer, RenderCtx, RenderTarget};

use crate::cli::{DemoConfig, SquareMode};

/// GPU objects of the demo, created on the first frame.
pub struct Scene {
    renderer: PrimitiveRenderer,
    grid: Grid,
    point: Point,
    square: Option<Square>,
}

impl Scene {
    pub fn new(ctx: &RenderCtx<'_>, config: &DemoConfig) -> Result<Self> {
        check_grid_fits(config.grid_lines, ctx.device.limits().max_buffer_size)?;

        let mut renderer = PrimitiveRenderer::new();
        renderer.prepare(ctx.device, ctx.surface_format)?;

        let grid = Grid::new(ctx.device, config.grid_lines, config.spacing);
        let (x, y) = config.point;
        let point = Point::new(ctx.device, x, y);
        let square = match config.square {
            SquareMode::Off => None,
            SquareMode::Flat => Some(Square::new(ctx.device)),
            SquareMode::Colored => Some(Square::with_color(ctx.device, Color::RED.to_rgb())),
        };

        log::info!(
            "scene ready: grid {}x{:.3}, point at ({x}, {y}), square {:?}",
            config.grid_lines,
            config.spacing,
            config.square
        );

        Ok(Self {
            renderer,
            grid,
            point,
            square,
        })
    }

    /// Draws grid, point and square (in that order) over the cleared frame.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        config: &DemoConfig,
    ) -> Result<()> {
        let mut pass = self.renderer.begin_pass(ctx, target, config.color)?;

        self.grid.render(&mut pass);
        self.point.render(&mut pass, config.point_size);
        if let Some(square) = &self.square {
            square.render(&mut pass);
        }

        Ok(())
    }
}

/// Fails when the grid's vertex buffer would exceed the device's buffer limit.
fn check_grid_fits(lines: u32, max_buffer_size: u64) -> Result<()> {
    let bytes = grid_byte_size(lines);
    anyhow::ensure!(
        bytes <= max_buffer_size,
        "a grid of {lines} lines needs {bytes} bytes, the device allows at most {max_buffer_size}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_MAX_BUFFER: u64 = 256 << 20;

    #[test]
    fn default_grid_fits() {
        assert!(check_grid_fits(10, DEFAULT_MAX_BUFFER).is_ok());
        assert!(check_grid_fits(crate::cli::MAX_GRID_LINES, DEFAULT_MAX_BUFFER).is_ok());
    }

    #[test]
    fn oversized_grid_is_an_error() {
        let err = check_grid_fits(3_000_000, DEFAULT_MAX_BUFFER).unwrap_err();
        assert!(err.to_string().contains("288000048 bytes"));
    }

    #[test]
    fn limit_is_inclusive() {
        let exact = grid_byte_size(4);
        assert!(check_grid_fits(4, exact).is_ok());
        assert!(check_grid_fits(4, exact - 1).is_err());
    }
}
