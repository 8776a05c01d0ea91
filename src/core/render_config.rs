use crate::core::rasterizer::SamplePattern;

/// 采样点颜色的计算方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    /// 整个三角形使用第一个顶点的颜色
    #[default]
    Flat,
    /// 逐采样点透视校正插值顶点颜色
    Interpolated,
}

impl ShadingMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "flat" => Some(ShadingMode::Flat),
            "interpolated" => Some(ShadingMode::Interpolated),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShadingMode::Flat => "flat",
            ShadingMode::Interpolated => "interpolated",
        }
    }
}

/// 光栅化配置，渲染器生命周期内不变
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    /// 深度重映射区间的近端
    pub z_near: f32,
    /// 深度重映射区间的远端
    pub z_far: f32,
    pub sample_pattern: SamplePattern,
    pub shading: ShadingMode,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            z_near: 0.1,
            z_far: 50.0,
            sample_pattern: SamplePattern::single(),
            shading: ShadingMode::Flat,
        }
    }
}

impl RasterConfig {
    pub fn with_depth_range(mut self, z_near: f32, z_far: f32) -> Self {
        self.z_near = z_near;
        self.z_far = z_far;
        self
    }

    pub fn with_msaa(mut self, enabled: bool) -> Self {
        self.sample_pattern = if enabled {
            SamplePattern::msaa4()
        } else {
            SamplePattern::single()
        };
        self
    }

    pub fn with_shading(mut self, shading: ShadingMode) -> Self {
        self.shading = shading;
        self
    }
}
