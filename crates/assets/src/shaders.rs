use std::collections::BTreeMap;
use crate::AssetError;
use std::path::{Path, PathBuf};

/// Shader programs used by the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderKind {
    /// Unlit, textured.
    Textured,
    /// Directional + point light Phong shading.
    Phong,
    /// Flat emissive colour for the light marker.
    Lamp,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 3] = [ShaderKind::Textured, ShaderKind::Phong, ShaderKind::Lamp];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Textured => "textured.wgsl",
            Self::Phong => "phong.wgsl",
            Self::Lamp => "lamp.wgsl",
        }
    }

    /// Copy of the shader compiled into the binary.
    pub fn embedded_source(self) -> &'static str {
        match self {
            Self::Textured => include_str!("../../../assets/shaders/textured.wgsl"),
            Self::Phong => include_str!("../../../assets/shaders/phong.wgsl"),
            Self::Lamp => include_str!("../../../assets/shaders/lamp.wgsl"),
        }
    }
}

/// Where a loaded shader's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderOrigin {
    File(PathBuf),
    Embedded,
}

#[derive(Debug, Clone)]
struct LoadedShader {
    source: String,
    origin: ShaderOrigin,
}

/// WGSL sources for every [`ShaderKind`].
///
/// Files on disk take precedence so shaders can be edited without a rebuild.
/// A missing file, or one that fails [`check_wgsl`], falls back to the
/// embedded copy.
#[derive(Debug, Clone)]
pub struct ShaderLibrary {
    shaders: BTreeMap<ShaderKind, LoadedShader>,
}

impl ShaderLibrary {
    /// Read every shader from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let shaders = ShaderKind::ALL
            .into_iter()
            .map(|kind| (kind, Self::load_one(dir, kind)))
            .collect();
        Self { shaders }
    }

    /// Library built only from the embedded sources.
    pub fn embedded() -> Self {
        let shaders = ShaderKind::ALL
            .into_iter()
            .map(|kind| {
                (
                    kind,
                    LoadedShader {
                        source: kind.embedded_source().to_string(),
                        origin: ShaderOrigin::Embedded,
                    },
                )
            })
            .collect();
        Self { shaders }
    }

    fn load_one(dir: &Path, kind: ShaderKind) -> LoadedShader {
        let path = dir.join(kind.file_name());
        match read_source(&path) {
            Ok(source) => {
                tracing::debug!("loaded shader {}", path.display());
                LoadedShader {
                    source,
                    origin: ShaderOrigin::File(path),
                }
            }
            Err(e) => {
                tracing::warn!("{e}, using embedded copy");
                LoadedShader {
                    source: kind.embedded_source().to_string(),
                    origin: ShaderOrigin::Embedded,
                }
            }
        }
    }

    pub fn source(&self, kind: ShaderKind) -> &str {
        self.shaders
            .get(&kind)
            .map(|s| s.source.as_str())
            .unwrap_or_else(|| kind.embedded_source())
    }

    pub fn origin(&self, kind: ShaderKind) -> ShaderOrigin {
        self.shaders
            .get(&kind)
            .map(|s| s.origin.clone())
            .unwrap_or(ShaderOrigin::Embedded)
    }
}

fn read_source(path: &Path) -> Result<String, AssetError> {
    let source = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    check_wgsl(&source).map_err(|reason| AssetError::InvalidShader {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(source)
}

/// Cheap structural check run before a source is handed to the GPU: it must
/// declare both entry points and have balanced braces and parentheses.
/// Full validation still happens when the module is compiled.
pub fn check_wgsl(source: &str) -> Result<(), String> {
    if source.trim().is_empty() {
        return Err("file is empty".to_string());
    }
    for entry in ["fn vs_main", "fn fs_main"] {
        if !source.contains(entry) {
            return Err(format!("missing `{entry}`"));
        }
    }
    let mut depth = Vec::new();
    for line in source.lines() {
        let code = line.split("//").next().unwrap_or("");
        for c in code.chars() {
            match c {
                '{' | '(' => depth.push(c),
                '}' | ')' => {
                    let open = if c == '}' { '{' } else { '(' };
                    if depth.pop() != Some(open) {
                        return Err(format!("unbalanced `{c}`"));
                    }
                }
                _ => {}
            }
        }
    }
    if let Some(open) = depth.last() {
        return Err(format!("unclosed `{open}`"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_sources_have_entry_points() {
        for kind in ShaderKind::ALL {
            let src = kind.embedded_source();
            assert!(src.contains("fn vs_main"), "{kind:?} lacks vs_main");
            assert!(src.contains("fn fs_main"), "{kind:?} lacks fs_main");
        }
    }

    #[test]
    fn missing_directory_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let lib = ShaderLibrary::load(dir.path().join("nope"));
        for kind in ShaderKind::ALL {
            assert_eq!(lib.origin(kind), ShaderOrigin::Embedded);
            assert_eq!(lib.source(kind), kind.embedded_source());
        }
    }

    #[test]
    fn files_on_disk_win() {
        let dir = tempfile::tempdir().unwrap();
        let custom = "// custom\n@vertex fn vs_main() {}\n@fragment fn fs_main() {}";
        std::fs::write(dir.path().join("phong.wgsl"), custom).unwrap();
        std::fs::write(dir.path().join("lamp.wgsl"), "   \n").unwrap();

        let lib = ShaderLibrary::load(dir.path());
        assert_eq!(lib.source(ShaderKind::Phong), custom);
        assert_eq!(
            lib.origin(ShaderKind::Phong),
            ShaderOrigin::File(dir.path().join("phong.wgsl"))
        );
        // Blank file is treated like a missing one.
        assert_eq!(lib.origin(ShaderKind::Lamp), ShaderOrigin::Embedded);
        assert_eq!(lib.origin(ShaderKind::Textured), ShaderOrigin::Embedded);
    }

    #[test]
    fn garbage_file_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("phong.wgsl"), "this is not wgsl {{{").unwrap();

        let lib = ShaderLibrary::load(dir.path());
        assert_eq!(lib.origin(ShaderKind::Phong), ShaderOrigin::Embedded);
        assert_eq!(
            lib.source(ShaderKind::Phong),
            ShaderKind::Phong.embedded_source()
        );
    }

    #[test]
    fn check_wgsl_rejects_broken_sources() {
        assert!(check_wgsl("").is_err());
        assert!(check_wgsl("fn vs_main() {}").is_err());
        assert!(check_wgsl("fn vs_main() {}\nfn fs_main() {").is_err());
        assert!(check_wgsl("fn vs_main() {}\nfn fs_main() }{").is_err());
        assert!(check_wgsl("fn vs_main() {}\nfn fs_main() {} // }").is_ok());
        for kind in ShaderKind::ALL {
            assert_eq!(check_wgsl(kind.embedded_source()), Ok(()), "{kind:?}");
        }
    }

    #[test]
    fn phong_declares_both_lights() {
        let src = ShaderKind::Phong.embedded_source();
        assert!(src.contains("struct DirectionalLight"));
        assert!(src.contains("struct PointLight"));
    }
}
