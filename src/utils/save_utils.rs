use crate::core::renderer::Renderer;
use crate::io::render_settings::RenderSettings;
use image::ColorType;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// 保存 RGB8 数据为 PNG
pub fn save_image(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), String> {
    image::save_buffer(path, data, width, height, ColorType::Rgb8)
        .map_err(|e| format!("保存图像到 {} 失败: {}", path.display(), e))?;
    info!("图像已保存到 {}", path.display());
    Ok(())
}

/// 按给定百分位把有限深度归一化到 [0, 1]，
/// 未写入过的无穷深度映射为 1.0
pub fn normalize_depth(depth_buffer: &[f32], min_percentile: f32, max_percentile: f32) -> Vec<f32> {
    let mut finite_depths: Vec<f32> = depth_buffer.iter().copied().filter(|d| d.is_finite()).collect();

    let (min_clip, max_clip) = if finite_depths.is_empty() {
        warn!("没有有限的深度值，深度图将是纯色");
        (0.0, 1.0)
    } else {
        finite_depths.sort_unstable_by(f32::total_cmp);
        let last = finite_depths.len() - 1;
        let percentile_index =
            |p: f32| ((p / 100.0 * last as f32).round() as usize).min(last);

        let mut min_clip = finite_depths[percentile_index(min_percentile)];
        let mut max_clip = finite_depths[percentile_index(max_percentile)];
        if max_clip - min_clip < 1e-6 {
            min_clip = finite_depths[0];
            max_clip = finite_depths[last];
            if max_clip - min_clip < 1e-6 {
                max_clip = min_clip + 1.0;
            }
        }
        (min_clip, max_clip)
    };

    let inv_range = 1.0 / (max_clip - min_clip);
    depth_buffer
        .iter()
        .map(|&depth| {
            if depth.is_finite() {
                ((depth.clamp(min_clip, max_clip) - min_clip) * inv_range).clamp(0.0, 1.0)
            } else {
                1.0
            }
        })
        .collect()
}

/// JET 色图: 0 -> 蓝, 0.5 -> 绿, 1 -> 红，输出 RGB8
pub fn apply_colormap_jet(values: &[f32]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|&v| {
            let value = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
            let (r, g, b) = if value <= 0.25 {
                (0.0, value * 4.0, 1.0)
            } else if value <= 0.5 {
                (0.0, 1.0, 1.0 - (value - 0.25) * 4.0)
            } else if value <= 0.75 {
                ((value - 0.5) * 4.0, 1.0, 0.0)
            } else {
                (1.0, 1.0 - (value - 0.75) * 4.0, 0.0)
            };
            [r, g, b].map(|c: f32| (c * 255.0).round() as u8)
        })
        .collect()
}

fn output_path(settings: &RenderSettings, suffix: &str) -> PathBuf {
    Path::new(&settings.output_dir).join(format!("{}_{}.png", settings.output, suffix))
}

/// 保存 `<output>_color.png`，启用时再保存 `<output>_depth.png`
pub fn save_render_with_settings(renderer: &Renderer, settings: &RenderSettings) -> Result<(), String> {
    let width = renderer.width() as u32;
    let height = renderer.height() as u32;

    let color_data = renderer.frame_buffer.get_color_buffer_bytes(settings.color_range);
    save_image(&output_path(settings, "color"), &color_data, width, height)?;

    if settings.save_depth {
        // 越近越红
        let depth_normalized: Vec<f32> = normalize_depth(renderer.depth_buffer(), 1.0, 99.0)
            .into_iter()
            .map(|d| 1.0 - d)
            .collect();
        let depth_colored = apply_colormap_jet(&depth_normalized);
        save_image(&output_path(settings, "depth"), &depth_colored, width, height)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_range_and_background() {
        let depths = [1.0, 2.0, 3.0, f32::INFINITY];
        let normalized = normalize_depth(&depths, 0.0, 100.0);
        assert_eq!(normalized, vec![0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn normalize_handles_constant_and_empty_buffers() {
        let normalized = normalize_depth(&[4.0, 4.0], 1.0, 99.0);
        assert_eq!(normalized, vec![0.0, 0.0]);
        let normalized = normalize_depth(&[f32::INFINITY; 3], 1.0, 99.0);
        assert_eq!(normalized, vec![1.0; 3]);
    }

    #[test]
    fn jet_endpoints() {
        assert_eq!(apply_colormap_jet(&[0.0]), vec![0, 0, 255]);
        assert_eq!(apply_colormap_jet(&[0.5]), vec![0, 255, 0]);
        assert_eq!(apply_colormap_jet(&[1.0]), vec![255, 0, 0]);
    }
}
