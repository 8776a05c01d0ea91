use crate::core::error::{BufferKind, RasterError};
use crate::core::rasterizer::Triangle;
use crate::geometry::transform::{Viewport, transform_vertex};
use nalgebra::{Matrix4, Vector3, Vector4};

/// 把索引三元组变换为屏幕空间三角形
pub struct GeometryProcessor<'a> {
    mvp: Matrix4<f32>,
    viewport: Viewport,
    positions: &'a [Vector3<f32>],
    colors: &'a [Vector3<f32>],
}

impl<'a> GeometryProcessor<'a> {
    pub fn new(
        mvp: Matrix4<f32>,
        viewport: Viewport,
        positions: &'a [Vector3<f32>],
        colors: &'a [Vector3<f32>],
    ) -> Self {
        Self {
            mvp,
            viewport,
            positions,
            colors,
        }
    }

    /// 变换第 `triangle_index` 个三角形的三个顶点。
    /// 索引越界返回 `IndexOutOfRange`，w 不可用返回 `DivisionSingularity`。
    pub fn assemble(&self, triangle_index: usize, triple: &[usize; 3]) -> Result<Triangle, RasterError> {
        let mut vertices = [Vector4::zeros(); 3];
        let mut colors = [Vector3::zeros(); 3];
        for (vertex, &index) in triple.iter().enumerate() {
            let position = lookup(self.positions, triangle_index, BufferKind::Position, index)?;
            colors[vertex] = *lookup(self.colors, triangle_index, BufferKind::Color, index)?;
            vertices[vertex] = transform_vertex(&self.mvp, position, &self.viewport).map_err(|w| {
                RasterError::DivisionSingularity {
                    triangle: triangle_index,
                    vertex,
                    w,
                }
            })?;
        }

        Ok(Triangle::new(vertices, colors))
    }
}

fn lookup<'b>(
    values: &'b [Vector3<f32>],
    triangle: usize,
    kind: BufferKind,
    index: usize,
) -> Result<&'b Vector3<f32>, RasterError> {
    values.get(index).ok_or(RasterError::IndexOutOfRange {
        triangle,
        kind,
        index,
        len: values.len(),
    })
}
