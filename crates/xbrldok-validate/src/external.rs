//! External XBRL processor (Arelle command line)
//!
//! The engine is run as `<command> [args..] --file <instance> --validate`.
//! Its combined output is classified line by line:
//!
//! | Prefix                     | Bucket   |
//! |----------------------------|----------|
//! | `[error]`, `[fatal]`       | errors   |
//! | `[warning]`, `[message:`   | warnings |
//! | `[info]`                   | info     |
//!
//! A run passes when the process exits zero and no error lines were seen.

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{Result, ValidateError};
use crate::validator::{Expected, InstanceValidator, ValidationReport};

/// Command looked up on `PATH` when none is configured
pub const DEFAULT_COMMAND: &str = "arelleCmdLine";

/// How long the engine may run before it is killed
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Validator backed by an external XBRL processor
#[derive(Debug, Clone)]
pub struct ExternalValidator {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for ExternalValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalValidator {
    /// Validator running `arelleCmdLine` with the default deadline
    pub fn new() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different executable, by name or path
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Arguments placed before `--file`
    ///
    /// Useful when the engine is started through an interpreter, e.g.
    /// `python3 -m arelle.CntlrCmdLine`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve the configured command to an executable path
    pub fn locate(&self) -> Option<PathBuf> {
        locate_command(&self.command)
    }

    fn spawn_error(&self, source: std::io::Error) -> ValidateError {
        ValidateError::Spawn {
            command: self.command.clone(),
            source,
        }
    }

    /// Run the engine to completion or until the deadline passes
    fn run(&self, program: &Path, instance: &Path) -> Result<(ExitStatus, String)> {
        let mut child = Command::new(program)
            .args(&self.args)
            .arg("--file")
            .arg(instance)
            .arg("--validate")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Drain both pipes while waiting so a chatty engine cannot block on a full pipe
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait().map_err(|e| self.spawn_error(e))? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(
                        "Validator {} exceeded {}s, killed",
                        self.command,
                        self.timeout.as_secs()
                    );
                    return Err(ValidateError::Timeout {
                        command: self.command.clone(),
                        limit: self.timeout,
                    });
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        let mut output = collect(stdout);
        let errors = collect(stderr);
        if !errors.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&errors);
        }
        Ok((status, output))
    }
}

impl InstanceValidator for ExternalValidator {
    fn name(&self) -> &'static str {
        "arelle"
    }

    fn is_available(&self) -> bool {
        self.locate().is_some()
    }

    fn validate(&self, path: &Path, _expected: &Expected) -> Result<ValidationReport> {
        let program = self.locate().ok_or_else(|| {
            ValidateError::Unavailable(format!("'{}' not found on PATH", self.command))
        })?;
        let instance = path.canonicalize().map_err(|source| ValidateError::Io {
            path: path.display().to_string(),
            source,
        })?;

        debug!(
            "Running {} --file {} --validate",
            program.display(),
            instance.display()
        );
        let (status, output) = self.run(&program, &instance)?;

        let mut report = ValidationReport::new(self.name(), &instance);
        report.exit_code = status.code();
        classify_output(&output, &mut report);
        report.passed = status.success() && report.errors.is_empty();
        report.output = output;

        info!(
            "{}: {} ({} errors, {} warnings)",
            self.name(),
            report.status(),
            report.errors.len(),
            report.warnings.len()
        );
        Ok(report)
    }
}

/// Sort engine output lines into the report's message buckets
pub fn classify_output(output: &str, report: &mut ValidationReport) {
    for line in output.lines().map(str::trim) {
        if line.starts_with("[error]") || line.starts_with("[fatal]") {
            report.errors.push(line.to_string());
        } else if line.starts_with("[warning]") || line.starts_with("[message:") {
            report.warnings.push(line.to_string());
        } else if line.starts_with("[info]") {
            report.info.push(line.to_string());
        }
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = reader.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Find `command` on `PATH`, or check it directly when it contains a separator
fn locate_command(command: &str) -> Option<PathBuf> {
    let direct = Path::new(command);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(command);
        if is_executable(&candidate) {
            return Some(candidate);
        }
        let exe = candidate.with_extension(env::consts::EXE_EXTENSION);
        (!env::consts::EXE_EXTENSION.is_empty() && is_executable(&exe)).then_some(exe)
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
