//! Wrappers over the external executables the framework drives.
//!
//! Everything a compliance run executes is an external program: the
//! cross-compiler, the golden model, and the tested model. [`Tool`] is
//! the shared runner with output capture and a hard time budget; the
//! submodules put domain conventions on top.
//!
//! ## Submodules
//!
//! - [`compiler`]: RISC-V GCC invocations for both execution sides.
//! - [`model`]: golden-model and tested-model execution.

pub mod compiler;
pub mod model;

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::common::error::{Error, Result};

/// How often a running child is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured output of one finished tool invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Exit code, or -1 when the process was terminated by a signal.
    pub status: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl RunOutput {
    /// Whether the tool exited successfully.
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// An external executable with a display name and working directory.
#[derive(Debug, Clone)]
pub struct Tool {
    executable: PathBuf,
    name: String,
    work_dir: Option<PathBuf>,
}

impl Tool {
    /// Wraps an executable given as a path or a bare command name.
    ///
    /// A path that exists on disk is taken as-is; a bare name is looked
    /// up on `PATH`. The display name defaults to the file stem.
    pub fn new(executable: impl AsRef<Path>) -> Result<Self> {
        let given = executable.as_ref();
        let executable = if given.is_file() {
            given.to_path_buf()
        } else {
            which::which(given).map_err(|_| Error::ToolNotFound {
                name: given.display().to_string(),
            })?
        };
        let name = executable
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("tool")
            .to_string();
        Ok(Self {
            executable,
            name,
            work_dir: None,
        })
    }

    /// Replaces the display name used in logs and errors.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the working directory the tool is executed from.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved executable path.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Runs the tool and errors on a non-zero exit.
    pub fn run<I, S>(&self, args: I, timeout: Duration) -> Result<RunOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.run_unchecked(args, timeout)?;
        if !output.success() {
            return Err(Error::ToolFailed {
                tool: self.name.clone(),
                code: output.status,
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        Ok(output)
    }

    /// Runs the tool, reporting the exit code instead of erroring on it.
    ///
    /// Spawn failures and timeouts are still errors.
    pub fn run_unchecked<I, S>(&self, args: I, timeout: Duration) -> Result<RunOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.executable);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.work_dir {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|source| Error::tool(&self.name, format!("failed to spawn: {source}")))?;

        // Both pipes are drained on their own threads; a child that fills
        // one pipe while we block on the other would deadlock otherwise.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + timeout;
        let status = loop {
            let wait = child
                .try_wait()
                .map_err(|source| Error::tool(&self.name, source.to_string()))?;
            match wait {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::ToolTimeout {
                        tool: self.name.clone(),
                        timeout,
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        Ok(RunOutput {
            status: status.code().unwrap_or(-1),
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        })
    }
}

fn spawn_reader<R>(mut pipe: R) -> thread::JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut bytes = Vec::new();
        match pipe.read_to_end(&mut bytes) {
            Ok(_) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => String::new(),
        }
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Locates the reference compiler under a toolchain directory.
///
/// Matches any file whose name ends with `gcc` (or `gcc.exe`), searched
/// recursively; exactly one candidate must exist.
pub fn find_gcc(toolchain_dir: &Path) -> Result<PathBuf> {
    let mut found = Vec::new();
    collect_files(toolchain_dir, &is_gcc, &mut found)?;
    unique(found, "gcc", toolchain_dir)
}

/// Locates the reference model under a toolchain directory.
///
/// Matches a file named exactly `spike` (or `spike.exe`) directly under
/// the directory; exactly one candidate must exist.
pub fn find_spike(toolchain_dir: &Path) -> Result<PathBuf> {
    let entries =
        std::fs::read_dir(toolchain_dir).map_err(|source| Error::io(toolchain_dir, source))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::io(toolchain_dir, source))?;
        let path = entry.path();
        let is_match = path
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name == "spike" || name == "spike.exe");
        if is_match && path.is_file() {
            found.push(path);
        }
    }
    unique(found, "spike", toolchain_dir)
}

fn is_gcc(name: &str) -> bool {
    name.ends_with("gcc") || name.ends_with("gcc.exe")
}

fn unique(mut found: Vec<PathBuf>, what: &str, dir: &Path) -> Result<PathBuf> {
    found.sort();
    match found.len() {
        0 => Err(Error::ToolNotFound {
            name: format!("{what} under {}", dir.display()),
        }),
        1 => Ok(found.remove(0)),
        _ => Err(Error::tool(
            what,
            format!(
                "multiple candidates found: {}",
                found
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )),
    }
}

fn collect_files(
    dir: &Path,
    matches: &impl Fn(&str) -> bool,
    found: &mut Vec<PathBuf>,
) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|source| Error::io(dir, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| Error::io(dir, source))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, matches, found)?;
        } else if path
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(matches)
        {
            found.push(path);
        }
    }
    Ok(())
}
