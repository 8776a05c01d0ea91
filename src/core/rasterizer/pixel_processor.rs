use super::triangle_data::{BoundingBox, Triangle};
use crate::core::error::RasterError;
use crate::core::frame_buffer::FrameBuffer;
use crate::core::render_config::{RasterConfig, ShadingMode};
use crate::geometry::interpolation::{
    barycentric_2d, inside_triangle, interpolate_depth, perspective_correct,
};
use nalgebra::{Point2, Vector3};

const AREA_EPSILON: f32 = 1e-6;

/// 单个像素所有采样点的覆盖统计
#[derive(Debug, Clone, Copy)]
struct PixelCoverage {
    covered: usize,
    min_depth: f32,
    color_sum: Vector3<f32>,
}

/// 把一个三角形光栅化到帧缓冲区。
///
/// 包围盒内每个像素按配置的采样模式采样。至少有一个采样点被覆盖的像素，
/// 用最近的覆盖采样深度做深度测试；通过后写入采样颜色之和除以采样数，
/// 平面着色时即 `color * covered / N`。返回写入的像素数。
pub fn rasterize_triangle(
    triangle: &Triangle,
    triangle_index: usize,
    frame_buffer: &mut FrameBuffer,
    config: &RasterConfig,
) -> Result<usize, RasterError> {
    if triangle.area_x2().abs() < AREA_EPSILON {
        return Err(RasterError::DegenerateTriangle {
            triangle: triangle_index,
        });
    }

    let Some(bbox) = BoundingBox::from_triangle(triangle, frame_buffer.width(), frame_buffer.height())
    else {
        return Ok(0);
    };

    let sample_count = config.sample_pattern.len();
    if sample_count == 0 {
        return Ok(0);
    }

    let mut written = 0;
    bbox.for_each_pixel(|x, y| {
        let coverage = sample_pixel(triangle, x, y, config);
        if coverage.covered == 0 {
            return;
        }
        let color = coverage.color_sum / sample_count as f32;
        if frame_buffer.test_and_write(x, y, coverage.min_depth, &color) {
            written += 1;
        }
    });

    Ok(written)
}

fn sample_pixel(triangle: &Triangle, x: i64, y: i64, config: &RasterConfig) -> PixelCoverage {
    let mut coverage = PixelCoverage {
        covered: 0,
        min_depth: f32::INFINITY,
        color_sum: Vector3::zeros(),
    };

    for sample in config.sample_pattern.sample_points(x, y) {
        if let Some((depth, color)) = shade_sample(triangle, sample, config.shading) {
            coverage.covered += 1;
            coverage.min_depth = coverage.min_depth.min(depth);
            coverage.color_sum += color;
        }
    }
    coverage
}

/// 单个采样点的深度和颜色，未覆盖时返回 None
fn shade_sample(
    triangle: &Triangle,
    sample: Point2<f32>,
    shading: ShadingMode,
) -> Option<(f32, Vector3<f32>)> {
    let v = &triangle.vertices;
    if !inside_triangle(sample, v) {
        return None;
    }

    let bary = barycentric_2d(sample, v)?;
    let depth = interpolate_depth(bary, v)?;
    if !depth.is_finite() {
        return None;
    }

    let color = match shading {
        ShadingMode::Flat => triangle.color(),
        ShadingMode::Interpolated => perspective_correct(bary, triangle.w(), triangle.colors)?,
    };
    Some((depth, color))
}
