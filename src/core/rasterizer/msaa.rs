use nalgebra::{Point2, Vector2};

/// 子像素采样位置，相对像素左下角的偏移
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePattern {
    offsets: Vec<Vector2<f32>>,
}

impl SamplePattern {
    /// 像素中心单个采样
    pub fn single() -> Self {
        Self {
            offsets: vec![Vector2::new(0.5, 0.5)],
        }
    }

    /// 四分之一网格上的 4x MSAA
    pub fn msaa4() -> Self {
        Self {
            offsets: vec![
                Vector2::new(0.25, 0.25),
                Vector2::new(0.75, 0.25),
                Vector2::new(0.25, 0.75),
                Vector2::new(0.75, 0.75),
            ],
        }
    }

    /// 按采样数获取采样模式，只支持 1 和 4
    pub fn from_sample_count(sample_count: u32) -> Option<Self> {
        match sample_count {
            1 => Some(Self::single()),
            4 => Some(Self::msaa4()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// 像素 (x, y) 在屏幕空间的采样点
    pub fn sample_points(&self, pixel_x: i64, pixel_y: i64) -> impl Iterator<Item = Point2<f32>> + '_ {
        let corner = Point2::new(pixel_x as f32, pixel_y as f32);
        self.offsets.iter().map(move |offset| corner + offset)
    }
}

impl Default for SamplePattern {
    fn default() -> Self {
        Self::single()
    }
}
