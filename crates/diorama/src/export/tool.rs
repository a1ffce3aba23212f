//! External tool invocation.
//!
//! Backends drive command line programs. A [`ToolSpec`] describes how to call
//! one: the program and argument templates. Templates may contain these
//! placeholders, filled from [`Placeholders`]:
//!
//! | Placeholder   | Value                                        |
//! |---------------|----------------------------------------------|
//! | `{workspace}` | workspace source path                        |
//! | `{overlay}`   | layout overlay path                          |
//! | `{output}`    | directory (or file) the tool writes to       |
//! | `{input}`     | intermediate file or directory to render     |
//! | `{format}`    | converter export format                      |
//! | `{layout}`    | PlantUML layout engine                       |
//! | `{view}`      | requested view key                           |
//! | `{session}`   | scratch directory of a long-lived session    |
//!
//! `overlay_args` are appended only when `{overlay}` has a value and
//! `layout_args` only when `{layout}` has one.

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::{debug, trace};

use crate::error::RenderError;

/// How to invoke one external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    program: String,
    args: Vec<String>,
    overlay_args: Vec<String>,
    layout_args: Vec<String>,
    probe_args: Vec<String>,
}

impl ToolSpec {
    /// Creates a spec that runs `program` without arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            overlay_args: Vec::new(),
            layout_args: Vec::new(),
            probe_args: vec!["--version".to_string()],
        }
    }

    /// The native Structurizr renderer, a headless browser wrapper that
    /// exports every view of a workspace as SVG.
    pub fn structurizr() -> Self {
        Self::new("structurizr-renderer")
            .with_args(strings(&[
                "--workspace",
                "{workspace}",
                "--format",
                "svg",
                "--output",
                "{output}",
                "--session",
                "{session}",
            ]))
            .with_overlay_args(strings(&["--layout", "{overlay}"]))
    }

    /// The Structurizr CLI `export` command.
    pub fn converter() -> Self {
        Self::new("structurizr-cli")
            .with_args(strings(&[
                "export",
                "-workspace",
                "{workspace}",
                "-format",
                "{format}",
                "-output",
                "{output}",
            ]))
            .with_probe_args(strings(&["version"]))
    }

    /// PlantUML rendering a directory of sources to SVG.
    pub fn plantuml() -> Self {
        Self::new("plantuml")
            .with_args(strings(&["-tsvg", "-o", "{output}", "{input}"]))
            .with_layout_args(strings(&["-Playout={layout}"]))
    }

    /// The Mermaid CLI rendering one source file.
    pub fn mermaid() -> Self {
        Self::new("mmdc").with_args(strings(&["-i", "{input}", "-o", "{output}"]))
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_overlay_args(mut self, args: Vec<String>) -> Self {
        self.overlay_args = args;
        self
    }

    pub fn with_layout_args(mut self, args: Vec<String>) -> Self {
        self.layout_args = args;
        self
    }

    pub fn with_probe_args(mut self, args: Vec<String>) -> Self {
        self.probe_args = args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn overlay_args(&self) -> &[String] {
        &self.overlay_args
    }

    pub fn layout_args(&self) -> &[String] {
        &self.layout_args
    }

    pub fn probe_args(&self) -> &[String] {
        &self.probe_args
    }

    /// Expands the argument templates.
    pub fn command_args(&self, placeholders: &Placeholders) -> Vec<OsString> {
        let mut templates: Vec<&String> = self.args.iter().collect();
        if placeholders.contains("overlay") {
            templates.extend(&self.overlay_args);
        }
        if placeholders.contains("layout") {
            templates.extend(&self.layout_args);
        }

        templates
            .into_iter()
            .map(|template| placeholders.expand(template))
            .collect()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Values substituted into argument templates.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    values: Vec<(&'static str, OsString)>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a placeholder, replacing an earlier value of the same name.
    pub fn with(mut self, name: &'static str, value: impl AsRef<OsStr>) -> Self {
        let value = value.as_ref().to_os_string();
        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|(key, _)| *key == name)
    }

    /// Substitutes placeholders in one template.
    ///
    /// A template that is exactly one placeholder keeps the value as an
    /// `OsString`, so non UTF-8 paths pass through unchanged.
    fn expand(&self, template: &str) -> OsString {
        let whole = template
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'));
        if let Some((_, value)) = whole.and_then(|name| self.values.iter().find(|(key, _)| *key == name)) {
            return value.clone();
        }

        let mut expanded = template.to_string();
        for (name, value) in &self.values {
            expanded = expanded.replace(&format!("{{{name}}}"), &value.to_string_lossy());
        }
        expanded.into()
    }
}

/// An external program found on this machine.
#[derive(Debug, Clone)]
pub struct Tool {
    spec: ToolSpec,
    path: PathBuf,
}

impl Tool {
    /// Looks up the program of `spec` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ToolNotFound`] when the program does not exist.
    pub fn locate(spec: &ToolSpec) -> Result<Self, RenderError> {
        let path = which::which(spec.program()).map_err(|source| RenderError::ToolNotFound {
            program: spec.program().to_string(),
            source,
        })?;
        trace!(program = spec.program(), path:? = path; "Tool located");

        Ok(Self {
            spec: spec.clone(),
            path,
        })
    }

    /// Returns the resolved executable path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs the version probe and returns the first line of its output.
    pub fn version(&self) -> Result<String, RenderError> {
        let args: Vec<OsString> = self.spec.probe_args().iter().map(OsString::from).collect();
        let stdout = self.execute(&args, None)?;
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Runs the tool with its argument templates expanded.
    ///
    /// Returns the captured standard output.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Spawn`] when the program cannot be started and
    /// [`RenderError::ToolFailed`] with its standard error when it exits
    /// unsuccessfully.
    pub fn run(
        &self,
        placeholders: &Placeholders,
        working_dir: Option<&Path>,
    ) -> Result<String, RenderError> {
        let args = self.spec.command_args(placeholders);
        self.execute(&args, working_dir)
    }

    fn execute(&self, args: &[OsString], working_dir: Option<&Path>) -> Result<String, RenderError> {
        let program = self.spec.program();
        debug!(program, args:? = args; "Running tool");

        let mut cmd = Command::new(&self.path);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|source| RenderError::Spawn {
            program: program.to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(RenderError::ToolFailed {
                program: program.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_placeholders() {
        let spec = ToolSpec::converter();
        let placeholders = Placeholders::new()
            .with("workspace", "/docs/workspace.dsl")
            .with("format", "mermaid")
            .with("output", "/tmp/stage");

        assert_eq!(
            spec.command_args(&placeholders),
            [
                "export",
                "-workspace",
                "/docs/workspace.dsl",
                "-format",
                "mermaid",
                "-output",
                "/tmp/stage"
            ]
        );
    }

    #[test]
    fn test_conditional_args() {
        let spec = ToolSpec::plantuml();
        let base = Placeholders::new().with("output", "/out").with("input", "/in");
        assert_eq!(spec.command_args(&base).len(), 4);

        let with_layout = base.with("layout", "smetana");
        let args = spec.command_args(&with_layout);
        assert_eq!(args.last().unwrap(), "-Playout=smetana");

        let structurizr = ToolSpec::structurizr();
        let args = structurizr.command_args(&Placeholders::new().with("overlay", "/w.json"));
        assert_eq!(&args[args.len() - 2..], ["--layout", "/w.json"]);
    }

    #[test]
    fn test_unknown_placeholder_is_kept() {
        let spec = ToolSpec::new("tool").with_args(strings(&["{nothing}", "x{view}y"]));
        let args = spec.command_args(&Placeholders::new().with("view", "Ctx"));
        assert_eq!(args, ["{nothing}", "xCtxy"]);
    }

    #[test]
    fn test_placeholder_replaced() {
        let placeholders = Placeholders::new().with("view", "A").with("view", "B");
        assert_eq!(placeholders.expand("{view}"), "B");
    }

    #[test]
    fn test_missing_program() {
        let err = Tool::locate(&ToolSpec::new("diorama-test-no-such-program")).unwrap_err();
        assert!(matches!(err, RenderError::ToolNotFound { .. }));
        assert!(err.to_string().contains("diorama-test-no-such-program"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_stdout() {
        let spec = ToolSpec::new("sh").with_args(strings(&["-c", "echo rendered {view}"]));
        let tool = Tool::locate(&spec).unwrap();

        let stdout = tool
            .run(&Placeholders::new().with("view", "Context"), None)
            .unwrap();
        assert_eq!(stdout.trim(), "rendered Context");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_failure_carries_stderr() {
        let spec = ToolSpec::new("sh").with_args(strings(&["-c", "echo broken model >&2; exit 3"]));
        let tool = Tool::locate(&spec).unwrap();

        let err = tool.run(&Placeholders::new(), None).unwrap_err();
        match err {
            RenderError::ToolFailed { program, stderr, .. } => {
                assert_eq!(program, "sh");
                assert_eq!(stderr, "broken model");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_version_probe_first_line() {
        let spec = ToolSpec::new("sh").with_probe_args(strings(&["-c", "printf '2.4.1\\nbuild 7\\n'"]));
        let tool = Tool::locate(&spec).unwrap();
        assert_eq!(tool.version().unwrap(), "2.4.1");
    }
}
