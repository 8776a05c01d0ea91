//! # 软件三角形光栅化器
//!
//! 几何数据通过句柄加载，经模型/视图/投影矩阵变换后扫描转换到颜色缓冲和深度缓冲，
//! 支持透视校正插值和可选的 4x MSAA。

pub mod core;
pub mod geometry;
pub mod io;
pub mod utils;

pub use crate::core::buffers::{ColBufId, IndBufId, PosBufId};
pub use crate::core::error::{BufferKind, RasterError};
pub use crate::core::frame_buffer::{ClearMask, ColorRange, FrameBuffer};
pub use crate::core::rasterizer::{SamplePattern, Triangle};
pub use crate::core::render_config::{RasterConfig, ShadingMode};
pub use crate::core::renderer::{DrawStats, Primitive, Renderer};
