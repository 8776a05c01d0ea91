use crate::core::frame_buffer::ColorRange;
use crate::core::rasterizer::SamplePattern;
use crate::core::render_config::{RasterConfig, ShadingMode};
use crate::core::scene::{Scene, SceneCamera, SceneMesh};
use nalgebra::Point3;

/// 渲染参数，来自 TOML 配置或命令行
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    // ===== 文件 =====
    /// 输出图像的基础文件名
    pub output: String,
    /// 输出目录
    pub output_dir: String,

    // ===== 渲染 =====
    pub width: usize,
    pub height: usize,
    /// 1（仅像素中心）或 4
    pub msaa_samples: u32,
    pub shading: ShadingMode,
    /// 同时保存伪彩色深度图
    pub save_depth: bool,
    /// 顶点颜色的通道范围
    pub color_range: ColorRange,
    pub z_near: f32,
    pub z_far: f32,

    // ===== 相机 =====
    pub eye: Point3<f32>,
    /// 垂直视场角（度）
    pub fov: f32,
    /// 模型绕 z 轴旋转角度（度）
    pub angle: f32,

    // ===== 几何 =====
    pub meshes: Vec<SceneMesh>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output: "output".to_string(),
            output_dir: "output_rust".to_string(),
            width: 700,
            height: 700,
            msaa_samples: 1,
            shading: ShadingMode::Flat,
            save_depth: true,
            color_range: ColorRange::Byte,
            z_near: 0.1,
            z_far: 50.0,
            eye: Point3::new(0.0, 0.0, 5.0),
            fov: 45.0,
            angle: 0.0,
            meshes: Scene::default_meshes(),
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "图像尺寸必须为正，实际为 {}x{}",
                self.width, self.height
            ));
        }
        if !(self.z_near < self.z_far) {
            return Err(format!(
                "z_near ({}) 必须小于 z_far ({})",
                self.z_near, self.z_far
            ));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(format!("fov 必须在 (0, 180) 度之间，实际为 {}", self.fov));
        }
        if SamplePattern::from_sample_count(self.msaa_samples).is_none() {
            return Err(format!(
                "不支持的 MSAA 采样数 {}（只能是 1 或 4）",
                self.msaa_samples
            ));
        }
        Ok(())
    }

    pub fn raster_config(&self) -> Result<RasterConfig, String> {
        let sample_pattern = SamplePattern::from_sample_count(self.msaa_samples).ok_or_else(|| {
            format!(
                "不支持的 MSAA 采样数 {}（只能是 1 或 4）",
                self.msaa_samples
            )
        })?;
        let mut config = RasterConfig::default()
            .with_depth_range(self.z_near, self.z_far)
            .with_shading(self.shading);
        config.sample_pattern = sample_pattern;
        Ok(config)
    }

    pub fn scene(&self) -> Scene {
        Scene {
            meshes: self.meshes.clone(),
            camera: SceneCamera {
                eye: self.eye,
                fov_y_deg: self.fov,
                aspect_ratio: self.width as f32 / self.height as f32,
                z_near: self.z_near,
                z_far: self.z_far,
            },
            angle_deg: self.angle,
        }
    }

    pub fn color_range_name(&self) -> &'static str {
        match self.color_range {
            ColorRange::Unit => "unit",
            ColorRange::Byte => "byte",
        }
    }
}

pub fn parse_color_range(name: &str) -> Option<ColorRange> {
    match name.to_lowercase().as_str() {
        "unit" => Some(ColorRange::Unit),
        "byte" => Some(ColorRange::Byte),
        _ => None,
    }
}
