pub mod buffers;
pub mod error;
pub mod frame_buffer;
pub mod geometry_processor;
pub mod rasterizer;
pub mod render_config;
pub mod renderer;
pub mod scene;
