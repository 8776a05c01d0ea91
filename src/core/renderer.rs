use crate::core::buffers::{ColBufId, GeometryBuffers, IndBufId, PosBufId, validate_indices};
use crate::core::error::RasterError;
use crate::core::frame_buffer::{ClearMask, FrameBuffer};
use crate::core::geometry_processor::GeometryProcessor;
use crate::core::rasterizer::rasterize_triangle;
use crate::core::render_config::RasterConfig;
use crate::geometry::transform::{TransformFactory, Viewport};
use log::debug;
use nalgebra::{Matrix4, Vector3};
use std::time::Instant;

/// 索引缓冲的图元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primitive {
    /// 独立三角形，每个索引三元组一个
    #[default]
    Triangle,
}

/// 单次绘制调用的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// 进入光栅化的三角形数
    pub drawn: usize,
    /// 因屏幕面积为零被跳过
    pub degenerate: usize,
    /// 因顶点 MVP 后 w 为零被跳过
    pub singular: usize,
    /// 通过深度测试的像素数
    pub pixels_written: usize,
}

/// 软件光栅化器，持有几何数据、变换矩阵和帧/深度缓冲
pub struct Renderer {
    pub frame_buffer: FrameBuffer,
    buffers: GeometryBuffers,
    model: Matrix4<f32>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    config: RasterConfig,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(width, height, RasterConfig::default())
    }

    pub fn with_config(width: usize, height: usize, config: RasterConfig) -> Self {
        Self {
            frame_buffer: FrameBuffer::new(width, height),
            buffers: GeometryBuffers::new(),
            model: TransformFactory::identity(),
            view: TransformFactory::identity(),
            projection: TransformFactory::identity(),
            config,
        }
    }

    pub fn width(&self) -> usize {
        self.frame_buffer.width()
    }

    pub fn height(&self) -> usize {
        self.frame_buffer.height()
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn load_positions(&mut self, positions: Vec<Vector3<f32>>) -> PosBufId {
        self.buffers.load_positions(positions)
    }

    pub fn load_indices(&mut self, indices: Vec<[usize; 3]>) -> IndBufId {
        self.buffers.load_indices(indices)
    }

    pub fn load_colors(&mut self, colors: Vec<Vector3<f32>>) -> ColBufId {
        self.buffers.load_colors(colors)
    }

    pub fn set_model(&mut self, model: Matrix4<f32>) {
        self.model = model;
    }

    pub fn set_view(&mut self, view: Matrix4<f32>) {
        self.view = view;
    }

    pub fn set_projection(&mut self, projection: Matrix4<f32>) {
        self.projection = projection;
    }

    pub fn clear(&mut self, mask: ClearMask) {
        self.frame_buffer.clear(mask);
    }

    /// 当前帧缓冲颜色，顶行在前
    pub fn read_frame_buffer(&self) -> &[Vector3<f32>] {
        self.frame_buffer.color_buffer()
    }

    pub fn depth_buffer(&self) -> &[f32] {
        self.frame_buffer.depth_buffer()
    }

    /// 绘制 `indices` 中的所有三角形。
    ///
    /// 先检查句柄和索引，`InvalidHandle` 或 `IndexOutOfRange` 时缓冲区保持不变。
    /// 退化三角形和含 w 为零顶点的三角形被跳过并计数。
    pub fn draw(
        &mut self,
        positions: PosBufId,
        indices: IndBufId,
        colors: ColBufId,
        primitive: Primitive,
    ) -> Result<DrawStats, RasterError> {
        let start = Instant::now();
        let position_data = self.buffers.positions(positions)?;
        let index_data = self.buffers.indices(indices)?;
        let color_data = self.buffers.colors(colors)?;
        validate_indices(index_data, position_data.len(), color_data.len())?;

        let Primitive::Triangle = primitive;

        let mvp = self.projection * self.view * self.model;
        let viewport = Viewport::new(
            self.frame_buffer.width(),
            self.frame_buffer.height(),
            self.config.z_near,
            self.config.z_far,
        );
        let processor = GeometryProcessor::new(mvp, viewport, position_data, color_data);

        let mut stats = DrawStats::default();
        for (triangle_index, triple) in index_data.iter().enumerate() {
            let result = processor
                .assemble(triangle_index, triple)
                .and_then(|triangle| {
                    rasterize_triangle(&triangle, triangle_index, &mut self.frame_buffer, &self.config)
                });

            match result {
                Ok(pixels) => {
                    stats.drawn += 1;
                    stats.pixels_written += pixels;
                }
                Err(err @ RasterError::DegenerateTriangle { .. }) => {
                    debug!("跳过: {}", err);
                    stats.degenerate += 1;
                }
                Err(err @ RasterError::DivisionSingularity { .. }) => {
                    debug!("跳过: {}", err);
                    stats.singular += 1;
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            "绘制: 共 {} 个三角形，绘制 {}，退化 {}，奇异 {}，像素 {}，耗时 {:?}",
            index_data.len(),
            stats.drawn,
            stats.degenerate,
            stats.singular,
            stats.pixels_written,
            start.elapsed()
        );
        Ok(stats)
    }
}
