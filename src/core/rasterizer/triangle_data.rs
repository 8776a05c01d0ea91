use crate::geometry::interpolation::signed_area_x2;
use nalgebra::{Vector3, Vector4};

/// 待光栅化的三角形。
///
/// 每个顶点保存屏幕 x、屏幕 y、重映射深度以及透视除法前的裁剪空间 w。
/// 每个三角形新建一次，之后不再修改。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vector4<f32>; 3],
    pub colors: [Vector3<f32>; 3],
}

impl Triangle {
    pub fn new(vertices: [Vector4<f32>; 3], colors: [Vector3<f32>; 3]) -> Self {
        Self { vertices, colors }
    }

    /// 三角形的平面着色颜色
    pub fn color(&self) -> Vector3<f32> {
        self.colors[0]
    }

    pub fn w(&self) -> [f32; 3] {
        [self.vertices[0].w, self.vertices[1].w, self.vertices[2].w]
    }

    pub fn area_x2(&self) -> f32 {
        signed_area_x2(&self.vertices)
    }
}

/// 三角形扫描的像素范围（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BoundingBox {
    /// 三角形的整数包围盒，裁剪到缓冲区内，不在边缘的每一侧各扩展一个像素。
    /// 三角形完全在屏幕外时返回 None
    pub fn from_triangle(triangle: &Triangle, width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let [v0, v1, v2] = &triangle.vertices;
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).floor() as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).floor() as i64;

        let (last_x, last_y) = (width as i64 - 1, height as i64 - 1);
        if max_x < 0 || max_y < 0 || min_x > last_x || min_y > last_y {
            return None;
        }

        let mut bbox = Self {
            min_x: min_x.clamp(0, last_x),
            min_y: min_y.clamp(0, last_y),
            max_x: max_x.clamp(0, last_x),
            max_y: max_y.clamp(0, last_y),
        };

        if bbox.min_x > 0 {
            bbox.min_x -= 1;
        }
        if bbox.min_y > 0 {
            bbox.min_y -= 1;
        }
        if bbox.max_x < last_x {
            bbox.max_x += 1;
        }
        if bbox.max_y < last_y {
            bbox.max_y += 1;
        }
        Some(bbox)
    }

    pub fn for_each_pixel<F>(&self, mut callback: F)
    where
        F: FnMut(i64, i64),
    {
        for y in self.min_y..=self.max_y {
            for x in self.min_x..=self.max_x {
                callback(x, y);
            }
        }
    }
}
