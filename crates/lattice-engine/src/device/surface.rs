use winit::dpi::PhysicalSize;

/// Picks the surface format.
///
/// With `prefer_srgb` an sRGB 8-bit format is chosen when offered; without it a
/// non-sRGB 8-bit format is preferred. Falls back to the first offered format.
/// Returns `None` only when the surface offers nothing.
pub fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let preferred: [wgpu::TextureFormat; 2] = if prefer_srgb {
        [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ]
    } else {
        [wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Rgba8Unorm]
    };

    preferred
        .into_iter()
        .find(|f| formats.contains(f))
        .or_else(|| formats.first().copied())
}

/// Picks the composite alpha mode, honoring `requested` only if supported.
pub fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Size used to configure the surface for a window of `size`.
///
/// Windows can report 0x0 before they are mapped; wgpu rejects that, so each
/// axis is clamped to one pixel until the first real resize.
pub(crate) fn surface_extent(size: PhysicalSize<u32>) -> PhysicalSize<u32> {
    PhysicalSize::new(size.width.max(1), size.height.max(1))
}

/// Applies a new drawable size to the surface configuration.
///
/// wgpu cannot configure a 0x0 surface (minimized windows); in that case only
/// the tracked size is updated and configuration waits for a real size.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode as Alpha, TextureFormat as Tf};

    #[test]
    fn srgb_preferred_when_requested() {
        let formats = [Tf::Bgra8Unorm, Tf::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(Tf::Bgra8UnormSrgb));
    }

    #[test]
    fn linear_preferred_by_default() {
        let formats = [Tf::Bgra8UnormSrgb, Tf::Rgba8Unorm];
        assert_eq!(choose_surface_format(&formats, false), Some(Tf::Rgba8Unorm));
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [Tf::Rgb10a2Unorm, Tf::Rgba16Float];
        assert_eq!(choose_surface_format(&formats, true), Some(Tf::Rgb10a2Unorm));
        assert_eq!(choose_surface_format(&[], false), None);
    }

    #[test]
    fn surface_extent_never_zero() {
        assert_eq!(surface_extent(PhysicalSize::new(0, 0)), PhysicalSize::new(1, 1));
        assert_eq!(surface_extent(PhysicalSize::new(0, 600)), PhysicalSize::new(1, 600));
        assert_eq!(surface_extent(PhysicalSize::new(800, 600)), PhysicalSize::new(800, 600));
    }

    #[test]
    fn alpha_mode_respects_support() {
        let supported = [Alpha::Opaque, Alpha::PreMultiplied];
        assert_eq!(choose_alpha_mode(&supported, Some(Alpha::PreMultiplied)), Alpha::PreMultiplied);
        assert_eq!(choose_alpha_mode(&supported, Some(Alpha::PostMultiplied)), Alpha::Opaque);
        assert_eq!(choose_alpha_mode(&[], None), Alpha::Auto);
    }
}
