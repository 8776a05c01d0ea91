use crate::core::render_config::ShadingMode;
use crate::io::render_settings::RenderSettings;
use clap::Parser;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingArg {
    Flat,
    Interpolated,
}

impl From<ShadingArg> for ShadingMode {
    fn from(arg: ShadingArg) -> Self {
        match arg {
            ShadingArg::Flat => ShadingMode::Flat,
            ShadingArg::Interpolated => ShadingMode::Interpolated,
        }
    }
}

/// 命令行参数，给出的选项覆盖 TOML 配置
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML 场景/渲染配置文件
    #[arg(short, long)]
    pub config: Option<String>,

    /// 写出示例配置文件后退出
    #[arg(long)]
    pub example_config: Option<String>,

    /// 输出图像的基础文件名 ("render" -> "render_color.png")
    #[arg(short, long)]
    pub output: Option<String>,

    /// 输出目录
    #[arg(long)]
    pub output_dir: Option<String>,

    /// 图像宽度
    #[arg(long)]
    pub width: Option<usize>,

    /// 图像高度
    #[arg(long)]
    pub height: Option<usize>,

    /// 每像素采样数: 1 或 4
    #[arg(long, value_parser = parse_msaa)]
    pub msaa: Option<u32>,

    /// 顶点颜色着色方式
    #[arg(long, value_enum)]
    pub shading: Option<ShadingArg>,

    /// 模型绕 z 轴旋转角度
    #[arg(long, allow_negative_numbers = true)]
    pub angle: Option<f32>,

    /// 是否保存深度图 (true|false)
    #[arg(long)]
    pub save_depth: Option<bool>,
}

fn parse_msaa(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(samples @ (1 | 4)) => Ok(samples),
        Ok(samples) => Err(format!("不支持 {} 个采样，只能是 1 或 4", samples)),
        Err(e) => Err(format!("无效的采样数 '{}': {}", value, e)),
    }
}

impl Args {
    pub fn apply_to(&self, settings: &mut RenderSettings) {
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            settings.output_dir = output_dir.clone();
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(msaa) = self.msaa {
            settings.msaa_samples = msaa;
        }
        if let Some(shading) = self.shading {
            settings.shading = shading.into();
        }
        if let Some(angle) = self.angle {
            settings.angle = angle;
        }
        if let Some(save_depth) = self.save_depth {
            settings.save_depth = save_depth;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let args = Args::parse_from([
            "rasterizer",
            "--width",
            "320",
            "--msaa",
            "4",
            "--shading",
            "interpolated",
            "--angle",
            "-45",
            "--save-depth",
            "false",
        ]);
        let mut settings = RenderSettings::default();
        args.apply_to(&mut settings);

        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, RenderSettings::default().height);
        assert_eq!(settings.msaa_samples, 4);
        assert_eq!(settings.shading, ShadingMode::Interpolated);
        assert_eq!(settings.angle, -45.0);
        assert!(!settings.save_depth);
    }

    #[test]
    fn save_depth_is_left_alone_unless_given() {
        let mut settings = RenderSettings {
            save_depth: false,
            ..Default::default()
        };
        Args::parse_from(["rasterizer"]).apply_to(&mut settings);
        assert!(!settings.save_depth);

        Args::parse_from(["rasterizer", "--save-depth", "true"]).apply_to(&mut settings);
        assert!(settings.save_depth);
    }

    #[test]
    fn unsupported_msaa_is_a_parse_error() {
        assert!(Args::try_parse_from(["rasterizer", "--msaa", "8"]).is_err());
    }
}
