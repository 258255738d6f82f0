use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BenchError, Result};

/// Kernel program text read from disk.
#[derive(Debug, Clone)]
pub struct KernelSource {
    path: PathBuf,
    text: String,
}

impl KernelSource {
    /// Reads the program at `path`, usually [`BenchConfig::kernel_path`].
    ///
    /// [`BenchConfig::kernel_path`]: crate::config::BenchConfig::kernel_path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|source| BenchError::KernelSource {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "loaded kernel source");
        Ok(Self { path, text })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BenchConfig;

    #[test]
    fn loads_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let program = "__kernel void f() {}";
        std::fs::write(dir.path().join("k.cl"), program).unwrap();
        let config = BenchConfig {
            resource_root: dir.path().to_path_buf(),
            kernel_file: PathBuf::from("k.cl"),
            ..BenchConfig::default()
        };

        let source = KernelSource::load(config.kernel_path()).unwrap();
        assert_eq!(source.text(), program);
        assert_eq!(source.path(), dir.path().join("k.cl"));
    }

    #[test]
    fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.cl");
        let err = KernelSource::load(&path).unwrap_err();
        match &err {
            BenchError::KernelSource {
                path: source_path,
                source,
            } => {
                assert_eq!(source_path, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("absent.cl"));
    }

    #[test]
    fn default_config_loads_shipped_program() {
        let path = BenchConfig::default().kernel_path();
        let source = KernelSource::load(path).unwrap();
        assert_eq!(source.text(), cl_kernel::SOURCE);
    }
}
