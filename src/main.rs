use clap::Parser;
use log::info;
use soft_rasterizer::core::frame_buffer::ClearMask;
use soft_rasterizer::core::renderer::Renderer;
use soft_rasterizer::io::args::Args;
use soft_rasterizer::io::config_loader::TomlConfigLoader;
use soft_rasterizer::io::render_settings::RenderSettings;
use soft_rasterizer::utils::save_utils::save_render_with_settings;
use std::fs;
use std::time::Instant;

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let start_time = Instant::now();

    if let Some(path) = &args.example_config {
        TomlConfigLoader::create_example_config(path)?;
        info!("示例配置已写入 {}", path);
        return Ok(());
    }

    // --- 配置 ---
    let mut settings = match &args.config {
        Some(path) => {
            info!("加载配置文件: {}", path);
            TomlConfigLoader::load_from_file(path)?
        }
        None => RenderSettings::default(),
    };
    args.apply_to(&mut settings);
    settings.validate()?;

    fs::create_dir_all(&settings.output_dir).map_err(|e| {
        format!(
            "创建输出目录 '{}' 失败: {}",
            settings.output_dir, e
        )
    })?;

    // --- 渲染 ---
    let mut renderer =
        Renderer::with_config(settings.width, settings.height, settings.raster_config()?);
    renderer.clear(ClearMask::COLOR | ClearMask::DEPTH);

    info!(
        "渲染 {} 个网格，分辨率 {}x{}，每像素 {} 个采样，{} 着色",
        settings.meshes.len(),
        settings.width,
        settings.height,
        settings.msaa_samples,
        settings.shading.name()
    );
    let render_start = Instant::now();
    let stats = settings
        .scene()
        .draw(&mut renderer)
        .map_err(|e| format!("绘制失败: {}", e))?;
    info!(
        "绘制 {} 个三角形，退化 {} 个，奇异 {} 个，写入 {} 个像素，耗时 {:?}",
        stats.drawn,
        stats.degenerate,
        stats.singular,
        stats.pixels_written,
        render_start.elapsed()
    );

    // --- 输出 ---
    save_render_with_settings(&renderer, &settings)?;

    info!("总耗时: {:?}", start_time.elapsed());
    Ok(())
}
