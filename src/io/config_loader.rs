use crate::core::render_config::ShadingMode;
use crate::core::scene::SceneMesh;
use crate::io::render_settings::{RenderSettings, parse_color_range};
use log::warn;
use nalgebra::Point3;
use std::path::Path;
use toml::Value;

/// TOML 配置文件的读写
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RenderSettings, String> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            format!(
                "读取配置文件 {} 失败: {}",
                path.as_ref().display(),
                e
            )
        })?;

        Self::load_from_content(&content)
    }

    pub fn load_from_content(content: &str) -> Result<RenderSettings, String> {
        let toml_value: Value =
            toml::from_str(content).map_err(|e| format!("TOML 解析失败: {}", e))?;

        Self::parse_toml_to_settings(toml_value)
    }

    pub fn save_to_file<P: AsRef<Path>>(settings: &RenderSettings, path: P) -> Result<(), String> {
        let toml_content = Self::settings_to_toml(settings)?;
        std::fs::write(path, toml_content).map_err(|e| format!("写入配置文件失败: {}", e))
    }

    /// 把默认配置（含内置场景）写到 `path`
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), String> {
        let settings = RenderSettings::default();
        Self::save_to_file(&settings, path).map_err(|e| format!("创建示例配置失败: {}", e))
    }

    // ===== TOML -> RenderSettings =====

    fn parse_toml_to_settings(toml: Value) -> Result<RenderSettings, String> {
        let mut settings = RenderSettings::default();

        if let Some(files) = toml.get("files").and_then(|v| v.as_table()) {
            Self::parse_files_section(&mut settings, files)?;
        }

        if let Some(render) = toml.get("render").and_then(|v| v.as_table()) {
            Self::parse_render_section(&mut settings, render)?;
        }

        if let Some(camera) = toml.get("camera").and_then(|v| v.as_table()) {
            Self::parse_camera_section(&mut settings, camera)?;
        }

        // 存在 [[mesh]] 时替换内置场景
        if let Some(meshes) = toml.get("mesh") {
            settings.meshes = Self::parse_meshes(meshes)?;
        }

        Ok(settings)
    }

    fn parse_files_section(settings: &mut RenderSettings, files: &toml::Table) -> Result<(), String> {
        if let Some(output) = files.get("output").and_then(|v| v.as_str()) {
            settings.output = output.to_string();
        }
        if let Some(output_dir) = files.get("output_dir").and_then(|v| v.as_str()) {
            settings.output_dir = output_dir.to_string();
        }
        Ok(())
    }

    fn parse_render_section(settings: &mut RenderSettings, render: &toml::Table) -> Result<(), String> {
        if let Some(width) = render.get("width") {
            settings.width = Self::positive_integer(width, "render.width")?;
        }
        if let Some(height) = render.get("height") {
            settings.height = Self::positive_integer(height, "render.height")?;
        }
        if let Some(msaa_samples) = render.get("msaa_samples").and_then(|v| v.as_integer()) {
            if msaa_samples == 1 || msaa_samples == 4 {
                settings.msaa_samples = msaa_samples as u32;
            } else {
                warn!(
                    "无效的 MSAA 采样数 {}，保留 {}",
                    msaa_samples, settings.msaa_samples
                );
            }
        }
        if let Some(shading) = render.get("shading").and_then(|v| v.as_str()) {
            settings.shading = ShadingMode::parse(shading)
                .ok_or_else(|| format!("render.shading: 未知着色模式 '{}'", shading))?;
        }
        if let Some(save_depth) = render.get("save_depth").and_then(|v| v.as_bool()) {
            settings.save_depth = save_depth;
        }
        if let Some(color_range) = render.get("color_range").and_then(|v| v.as_str()) {
            settings.color_range = parse_color_range(color_range)
                .ok_or_else(|| format!("render.color_range: 未知颜色范围 '{}'", color_range))?;
        }
        if let Some(z_near) = render.get("z_near") {
            settings.z_near = Self::float(z_near, "render.z_near")?;
        }
        if let Some(z_far) = render.get("z_far") {
            settings.z_far = Self::float(z_far, "render.z_far")?;
        }
        Ok(())
    }

    fn parse_camera_section(settings: &mut RenderSettings, camera: &toml::Table) -> Result<(), String> {
        if let Some(eye) = camera.get("eye") {
            let coords = Self::float_triple(eye, "camera.eye")?;
            settings.eye = Point3::from(coords);
        }
        if let Some(fov) = camera.get("fov") {
            settings.fov = Self::float(fov, "camera.fov")?;
        }
        if let Some(angle) = camera.get("angle") {
            settings.angle = Self::float(angle, "camera.angle")?;
        }
        Ok(())
    }

    fn parse_meshes(value: &Value) -> Result<Vec<SceneMesh>, String> {
        let entries = value
            .as_array()
            .ok_or_else(|| "mesh: expected an array of tables ([[mesh]])".to_string())?;

        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mesh: SceneMesh = entry
                    .clone()
                    .try_into()
                    .map_err(|e| format!("mesh #{}: {}", i, e))?;
                if mesh.colors.len() < mesh.positions.len() {
                    warn!(
                        "mesh #{}: {} 个颜色对应 {} 个顶点",
                        i,
                        mesh.colors.len(),
                        mesh.positions.len()
                    );
                }
                Ok(mesh)
            })
            .collect()
    }

    // ===== 取值辅助函数 =====

    fn float(value: &Value, key: &str) -> Result<f32, String> {
        match value {
            Value::Float(f) => Ok(*f as f32),
            Value::Integer(i) => Ok(*i as f32),
            other => Err(format!("{}: 应为数字，实际为 {}", key, other.type_str())),
        }
    }

    fn positive_integer(value: &Value, key: &str) -> Result<usize, String> {
        match value.as_integer() {
            Some(i) if i > 0 => Ok(i as usize),
            Some(i) => Err(format!("{}: 必须为正数，实际为 {}", key, i)),
            None => Err(format!("{}: 应为整数，实际为 {}", key, value.type_str())),
        }
    }

    fn float_triple(value: &Value, key: &str) -> Result<[f32; 3], String> {
        let items = value
            .as_array()
            .filter(|items| items.len() == 3)
            .ok_or_else(|| format!("{}: 应为包含 3 个数字的数组", key))?;
        Ok([
            Self::float(&items[0], key)?,
            Self::float(&items[1], key)?,
            Self::float(&items[2], key)?,
        ])
    }

    // ===== RenderSettings -> TOML =====

    fn settings_to_toml(settings: &RenderSettings) -> Result<String, String> {
        let mut root = toml::Table::new();

        let mut files = toml::Table::new();
        files.insert("output".into(), Value::String(settings.output.clone()));
        files.insert("output_dir".into(), Value::String(settings.output_dir.clone()));
        root.insert("files".into(), Value::Table(files));

        let mut render = toml::Table::new();
        render.insert("width".into(), Value::Integer(settings.width as i64));
        render.insert("height".into(), Value::Integer(settings.height as i64));
        render.insert(
            "msaa_samples".into(),
            Value::Integer(settings.msaa_samples as i64),
        );
        render.insert("shading".into(), Value::String(settings.shading.name().into()));
        render.insert("save_depth".into(), Value::Boolean(settings.save_depth));
        render.insert(
            "color_range".into(),
            Value::String(settings.color_range_name().into()),
        );
        render.insert("z_near".into(), Value::Float(settings.z_near as f64));
        render.insert("z_far".into(), Value::Float(settings.z_far as f64));
        root.insert("render".into(), Value::Table(render));

        let mut camera = toml::Table::new();
        camera.insert(
            "eye".into(),
            Value::Array(
                settings
                    .eye
                    .coords
                    .iter()
                    .map(|c| Value::Float(*c as f64))
                    .collect(),
            ),
        );
        camera.insert("fov".into(), Value::Float(settings.fov as f64));
        camera.insert("angle".into(), Value::Float(settings.angle as f64));
        root.insert("camera".into(), Value::Table(camera));

        let meshes = settings
            .meshes
            .iter()
            .map(|mesh| Value::try_from(mesh).map_err(|e| format!("网格序列化失败: {}", e)))
            .collect::<Result<Vec<_>, _>>()?;
        root.insert("mesh".into(), Value::Array(meshes));

        toml::to_string_pretty(&root).map_err(|e| format!("配置序列化失败: {}", e))
    }
}
