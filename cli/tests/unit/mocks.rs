//! Shared fake ports for unit tests.
//!
//! Shell, host, prompter and reporter are in-memory recorders; the
//! filesystem and templates are the real adapters, pointed at a tempdir.

#![allow(dead_code, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anyhow::Result;
use siteforge_cli::application::ports::{
    HostSystem, ProgressReporter, Prompter, ShellRunner,
};
use siteforge_cli::application::services::installer::HostPorts;
use siteforge_cli::infra::fs::OsFs;
use siteforge_cli::infra::templates::EmbeddedTemplates;

use crate::helpers::exit_status;

// ── Shell ─────────────────────────────────────────────────────────────────────

/// Records every command line; commands containing a registered pattern
/// exit with the registered code.
#[derive(Default)]
pub struct RecordingShell {
    calls: RefCell<Vec<(String, Option<PathBuf>)>>,
    failures: Vec<(String, i32)>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, pattern: &str, code: i32) -> Self {
        self.failures.push((pattern.to_string(), code));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn calls(&self) -> Vec<(String, Option<PathBuf>)> {
        self.calls.borrow().clone()
    }
}

impl ShellRunner for RecordingShell {
    fn run(&self, command_line: &str, cwd: Option<&Path>) -> Result<ExitStatus> {
        self.calls
            .borrow_mut()
            .push((command_line.to_string(), cwd.map(Path::to_path_buf)));
        let code = self
            .failures
            .iter()
            .find(|(pattern, _)| command_line.contains(pattern.as_str()))
            .map_or(0, |(_, code)| *code);
        Ok(exit_status(code))
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

pub struct FakeHost {
    pub privileged: bool,
    pub groups: Vec<String>,
    pub writable: bool,
    pub programs: Vec<String>,
    /// Group reported for paths that were never changed.
    pub default_group: String,
    owners: RefCell<HashMap<PathBuf, String>>,
    group_changes: RefCell<Vec<(PathBuf, String)>>,
}

impl FakeHost {
    pub fn unprivileged() -> Self {
        Self {
            privileged: false,
            groups: vec!["joe".into(), "www-data".into()],
            writable: true,
            programs: Vec::new(),
            default_group: "joe".into(),
            owners: RefCell::default(),
            group_changes: RefCell::default(),
        }
    }

    pub fn root() -> Self {
        Self {
            privileged: true,
            groups: vec!["root".into()],
            default_group: "www-data".into(),
            ..Self::unprivileged()
        }
    }

    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        self.groups = groups.iter().map(ToString::to_string).collect();
        self
    }

    pub fn with_default_group(mut self, group: &str) -> Self {
        self.default_group = group.to_string();
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn group_changes(&self) -> Vec<(PathBuf, String)> {
        self.group_changes.borrow().clone()
    }
}

impl HostSystem for FakeHost {
    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn group_of(&self, path: &Path) -> Result<String> {
        Ok(self
            .owners
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| self.default_group.clone()))
    }

    fn set_group(&self, path: &Path, group: &str) -> Result<()> {
        self.owners
            .borrow_mut()
            .insert(path.to_path_buf(), group.to_string());
        self.group_changes
            .borrow_mut()
            .push((path.to_path_buf(), group.to_string()));
        Ok(())
    }

    fn current_groups(&self) -> Result<Vec<String>> {
        Ok(self.groups.clone())
    }

    fn can_write(&self, _: &Path) -> bool {
        self.writable
    }

    fn has_program(&self, program: &str) -> bool {
        self.programs.iter().any(|p| p == program)
    }
}

// ── Prompter ──────────────────────────────────────────────────────────────────

/// Replays scripted keys. Line questions take scripted answers, falling
/// back to the offered default once the script runs out.
#[derive(Default)]
pub struct ScriptedPrompter {
    keys: RefCell<VecDeque<char>>,
    inputs: RefCell<VecDeque<String>>,
    shown: RefCell<Vec<String>>,
    answers: RefCell<Vec<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(keys: &str) -> Self {
        let p = Self::default();
        p.keys.borrow_mut().extend(keys.chars());
        p
    }

    pub fn push_input(&self, answer: &str) {
        self.inputs.borrow_mut().push_back(answer.to_string());
    }

    /// Confirmation messages, in order.
    pub fn shown(&self) -> Vec<String> {
        self.shown.borrow().clone()
    }

    pub fn answers(&self) -> Vec<String> {
        self.answers.borrow().clone()
    }

    /// Prompts of line, choice and toggle questions, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn remaining_keys(&self) -> usize {
        self.keys.borrow().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn show(&self, message: &str) -> Result<()> {
        self.shown.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn read_key(&self) -> Result<char> {
        self.keys
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted key left"))
    }

    fn answer(&self, text: &str) -> Result<()> {
        self.answers.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(self
            .inputs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| default.to_string()))
    }

    fn select(&self, prompt: &str, _: &[&str], default: usize) -> Result<usize> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(default)
    }

    fn toggle(&self, prompt: &str, default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        Ok(default)
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    steps: RefCell<Vec<String>>,
    successes: RefCell<Vec<String>>,
    warnings: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn steps(&self) -> Vec<String> {
        self.steps.borrow().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

// ── Bundle ────────────────────────────────────────────────────────────────────

/// Owns one of each port so a test can hand out [`HostPorts`] and inspect
/// the recorders afterwards.
pub struct Harness {
    pub shell: RecordingShell,
    pub host: FakeHost,
    pub fs: OsFs,
    pub prompter: ScriptedPrompter,
    pub templates: EmbeddedTemplates,
    pub reporter: RecordingReporter,
}

impl Harness {
    pub fn new(host: FakeHost) -> Self {
        Self {
            shell: RecordingShell::new(),
            host,
            fs: OsFs,
            prompter: ScriptedPrompter::new(),
            templates: EmbeddedTemplates::new().expect("embedded templates"),
            reporter: RecordingReporter::default(),
        }
    }

    pub fn with_keys(mut self, keys: &str) -> Self {
        self.prompter = ScriptedPrompter::with_keys(keys);
        self
    }

    pub fn with_shell(mut self, shell: RecordingShell) -> Self {
        self.shell = shell;
        self
    }

    pub fn ports(&self) -> HostPorts<'_> {
        HostPorts {
            shell: &self.shell,
            host: &self.host,
            fs: &self.fs,
            prompter: &self.prompter,
            templates: &self.templates,
            reporter: &self.reporter,
        }
    }
}
