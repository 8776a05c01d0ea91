use nalgebra::Vector3;
use rayon::prelude::*;
use std::ops::BitOr;

/// 选择 `clear` 要重置的缓冲区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
}

impl ClearMask {
    pub const COLOR: ClearMask = ClearMask {
        color: true,
        depth: false,
    };
    pub const DEPTH: ClearMask = ClearMask {
        color: false,
        depth: true,
    };
    pub const ALL: ClearMask = ClearMask {
        color: true,
        depth: true,
    };
}

impl BitOr for ClearMask {
    type Output = ClearMask;

    fn bitor(self, rhs: ClearMask) -> ClearMask {
        ClearMask {
            color: self.color || rhs.color,
            depth: self.depth || rhs.depth,
        }
    }
}

/// 顶点颜色的取值约定，导出字节时使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorRange {
    /// 通道取值 [0, 1]
    Unit,
    /// 通道取值 [0, 255]
    #[default]
    Byte,
}

impl ColorRange {
    pub fn to_u8(self, channel: f32) -> u8 {
        let scaled = match self {
            ColorRange::Unit => channel * 255.0,
            ColorRange::Byte => channel,
        };
        scaled.round().clamp(0.0, 255.0) as u8
    }
}

/// 帧缓冲区，存储渲染颜色和每像素最近深度。
///
/// 光栅化时 y 轴向上，而数组第 0 行是图像顶部，由 `get_index` 完成翻转。
pub struct FrameBuffer {
    width: usize,
    height: usize,
    /// 数值越小越近，初始为 +inf
    depth_buffer: Vec<f32>,
    color_buffer: Vec<Vector3<f32>>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let num_pixels = width * height;
        FrameBuffer {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; num_pixels],
            color_buffer: vec![Vector3::zeros(); num_pixels],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, mask: ClearMask) {
        if mask.color {
            self.color_buffer
                .par_iter_mut()
                .for_each(|color| *color = Vector3::zeros());
        }
        if mask.depth {
            self.depth_buffer
                .par_iter_mut()
                .for_each(|depth| *depth = f32::INFINITY);
        }
    }

    /// 像素 (x, y) 的线性索引，y 自下而上。
    /// 超出 `[0, width) x [0, height)` 返回 `None`
    #[inline]
    pub fn get_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((self.height - 1 - y) * self.width + x)
    }

    /// 在 `point.xy` 写入颜色，越界时返回 false
    pub fn set_pixel(&mut self, point: &Vector3<f32>, color: &Vector3<f32>) -> bool {
        if !point.x.is_finite() || !point.y.is_finite() {
            return false;
        }
        match self.get_index(point.x.floor() as i64, point.y.floor() as i64) {
            Some(index) => {
                self.color_buffer[index] = *color;
                true
            }
            None => false,
        }
    }

    pub fn depth_at(&self, x: i64, y: i64) -> Option<f32> {
        self.get_index(x, y).map(|index| self.depth_buffer[index])
    }

    pub fn color_at(&self, x: i64, y: i64) -> Option<Vector3<f32>> {
        self.get_index(x, y).map(|index| self.color_buffer[index])
    }

    /// 单像素深度测试：`depth` 比已有值更近时写入深度和颜色
    pub(crate) fn test_and_write(&mut self, x: i64, y: i64, depth: f32, color: &Vector3<f32>) -> bool {
        let Some(index) = self.get_index(x, y) else {
            return false;
        };
        if depth < self.depth_buffer[index] {
            self.depth_buffer[index] = depth;
            self.color_buffer[index] = *color;
            true
        } else {
            false
        }
    }

    pub fn color_buffer(&self) -> &[Vector3<f32>] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// RGB8 字节，顶行在前，可直接交给图像编码器
    pub fn get_color_buffer_bytes(&self, range: ColorRange) -> Vec<u8> {
        self.color_buffer
            .par_iter()
            .flat_map_iter(|color| [range.to_u8(color.x), range.to_u8(color.y), range.to_u8(color.z)])
            .collect()
    }
}
