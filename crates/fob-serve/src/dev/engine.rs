//! Build engines: producers of one rebuild's output files.

use crate::dev::adapter::OutputFile;
use crate::error::BuildError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use walkdir::WalkDir;

/// Runs one rebuild and returns its outputs in a stable order.
#[async_trait]
pub trait BuildEngine: Send + Sync {
    async fn build(&self) -> Result<Vec<OutputFile>, BuildError>;
}

/// Engine that runs an external command and collects what it wrote.
///
/// After a successful run every regular file under `out_dir` is read and
/// returned sorted by path. The command's stdout is inherited so its own
/// progress output stays visible; stderr is captured for error reports.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
    out_dir: PathBuf,
}

impl CommandEngine {
    /// `command` is program followed by arguments. `out_dir` is resolved against `cwd`.
    ///
    /// # Errors
    ///
    /// [`BuildError::Spawn`] with an empty program name if `command` is empty.
    pub fn new(
        command: &[String],
        cwd: impl Into<PathBuf>,
        out_dir: impl AsRef<Path>,
    ) -> Result<Self, BuildError> {
        let (program, args) = command.split_first().ok_or_else(|| BuildError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty build command"),
        })?;

        let cwd = cwd.into();
        let out_dir = cwd.join(out_dir);

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            cwd,
            out_dir,
        })
    }

    /// Absolute directory the outputs are collected from.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    async fn run_command(&self) -> Result<(), BuildError> {
        tracing::debug!(program = %self.program, args = ?self.args, "running build command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| BuildError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BuildError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl BuildEngine for CommandEngine {
    async fn build(&self) -> Result<Vec<OutputFile>, BuildError> {
        self.run_command().await?;

        let out_dir = self.out_dir.clone();
        match tokio::task::spawn_blocking(move || collect_outputs(&out_dir)).await {
            Ok(result) => result,
            Err(join_err) => Err(BuildError::Read {
                path: self.out_dir.clone(),
                source: std::io::Error::other(join_err),
            }),
        }
    }
}

/// Read every regular file below `out_dir`, sorted by path.
///
/// A missing directory yields no files.
pub fn collect_outputs(out_dir: &Path) -> Result<Vec<OutputFile>, BuildError> {
    if !out_dir.exists() {
        tracing::warn!(dir = %out_dir.display(), "output directory does not exist");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(out_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let contents = std::fs::read(&path).map_err(|source| BuildError::Read {
            path: path.clone(),
            source,
        })?;
        files.push(OutputFile::new(path, contents));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let err = CommandEngine::new(&[], ".", "dist").unwrap_err();
        assert!(matches!(err, BuildError::Spawn { .. }));
    }

    #[test]
    fn test_collect_outputs_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("chunks")).unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "app").unwrap();
        std::fs::write(dir.path().join("chunks/a.js"), "a").unwrap();

        let files = collect_outputs(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("app.js"),
                PathBuf::from("chunks/a.js"),
                PathBuf::from("index.html"),
            ]
        );
        assert_eq!(&files[0].contents[..], b"app");
    }

    #[test]
    fn test_collect_outputs_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(collect_outputs(&dir.path().join("dist")).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_engine_collects_written_files() {
        let dir = TempDir::new().unwrap();
        let engine = CommandEngine::new(
            &sh("mkdir -p dist && printf 'hello world' > dist/app.js"),
            dir.path(),
            "dist",
        )
        .unwrap();

        let files = engine.build().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, dir.path().join("dist/app.js"));
        assert_eq!(&files[0].contents[..], b"hello world");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_engine_reports_failure() {
        let dir = TempDir::new().unwrap();
        let engine =
            CommandEngine::new(&sh("echo 'syntax error' >&2; exit 3"), dir.path(), "dist").unwrap();

        match engine.build().await.unwrap_err() {
            BuildError::CommandFailed { stderr, .. } => assert!(stderr.contains("syntax error")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_command_engine_missing_program() {
        let dir = TempDir::new().unwrap();
        let engine = CommandEngine::new(
            &["definitely-not-a-real-build-tool".to_string()],
            dir.path(),
            "dist",
        )
        .unwrap();

        assert!(matches!(
            engine.build().await.unwrap_err(),
            BuildError::Spawn { .. }
        ));
    }
}
