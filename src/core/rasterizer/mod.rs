//! # 三角形光栅化模块
//!
//! 包围盒扫描 + 严格边符号覆盖测试，透视校正的深度和颜色插值，按覆盖率加权的 MSAA

pub mod msaa;
pub mod pixel_processor;
pub mod triangle_data;

pub use msaa::SamplePattern;
pub use pixel_processor::rasterize_triangle;
pub use triangle_data::{BoundingBox, Triangle};
