//! Test utilities for driving builds without a real toolchain.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use shellpack_core::{
    Invocation, ToolError, ToolOutput, ToolRunner, relative_files, to_posix_path,
};
use tempfile::TempDir;

use crate::{StageState, StatusSink};

/// First line of every archive written by [`FakeRunner`].
const FAKE_ZIP_HEADER: &str = "FAKEZIP";

/// Scripted [`ToolRunner`].
///
/// Every tool is available unless removed with [`FakeRunner::without_tool`].
/// Known tools simulate their side effects on disk: `zip` writes a listing
/// of the tree it was run in and keeps a copy of each member's content,
/// `msgfmt` and the GLib compilers write their
/// targets, `tsc` writes one `.js` file per `.ts` source.
#[derive(Debug)]
pub struct FakeRunner {
    missing: HashSet<String>,
    failing: HashMap<String, ToolOutput>,
    reload_reply: String,
    calls: Mutex<Vec<Invocation>>,
    /// Member contents of the last archive, keyed by member path.
    archived: Mutex<BTreeMap<String, String>>,
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            missing: HashSet::new(),
            failing: HashMap::new(),
            reload_reply: "bs true \"\"\n".to_string(),
            calls: Mutex::new(Vec::new()),
            archived: Mutex::new(BTreeMap::new()),
        }
    }

    /// Pretend `program` is not installed.
    pub fn without_tool(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Make every run of `program` exit with `exit_code`.
    pub fn failing(mut self, program: &str, exit_code: i32, stderr: &str) -> Self {
        self.failing
            .insert(program.to_string(), ToolOutput::failure(exit_code, stderr));
        self
    }

    /// Standard output of the reload call.
    pub fn with_reload_reply(mut self, reply: &str) -> Self {
        self.reload_reply = reply.to_string();
        self
    }

    /// Every invocation so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every invocation rendered as a command line.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Content of `member` as it was when the last archive was written.
    pub fn archived_file(&self, member: &str) -> Option<String> {
        self.archived
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(member)
            .cloned()
    }

    /// Whether a tool with this file name was run.
    pub fn ran(&self, tool: &str) -> bool {
        self.calls().iter().any(|c| tool_name(&c.program) == tool)
    }

    fn simulate(&self, inv: &Invocation) -> io::Result<ToolOutput> {
        let args = inv.args_lossy();
        match tool_name(&inv.program).as_str() {
            "zip" => {
                let archive = args.get(1).map(PathBuf::from).unwrap_or_default();
                let mut listing = vec![FAKE_ZIP_HEADER.to_string()];
                let mut archived = BTreeMap::new();
                for rel in relative_files(&inv.work_dir)? {
                    let content = fs::read(inv.work_dir.join(&rel))?;
                    let member = to_posix_path(&rel);
                    archived.insert(member.clone(), String::from_utf8_lossy(&content).into_owned());
                    listing.push(member);
                }
                fs::write(archive, listing.join("\n") + "\n")?;
                *self.archived.lock().unwrap_or_else(PoisonError::into_inner) = archived;
            }
            "msgfmt" => {
                let source = fs::read_to_string(&args[0])?;
                write_file(Path::new(&args[2]), &format!("MO {source}"))?;
            }
            "tsc" => compile_typescript(&inv.work_dir, &args)?,
            "npx" if args.first().is_some_and(|a| a == "tsc") => {
                compile_typescript(&inv.work_dir, &args)?
            }
            "node" => {
                write_file(&inv.work_dir.join("dist/extension.js"), "// bundled\n")?;
            }
            "npm" | "pnpm" | "yarn" => fs::create_dir_all(inv.work_dir.join("node_modules"))?,
            "glib-compile-resources" => {
                if let Some(target) = value_of(&args, "--target") {
                    write_file(Path::new(target), "GRESOURCE\n")?;
                }
            }
            "glib-compile-schemas" => {
                write_file(&Path::new(&args[0]).join("gschemas.compiled"), "GVARIANT\n")?;
            }
            "busctl" => {
                return Ok(ToolOutput {
                    exit_code: 0,
                    stdout: self.reload_reply.clone(),
                    stderr: String::new(),
                });
            }
            _ => {}
        }
        Ok(ToolOutput::success())
    }
}

impl ToolRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation.clone());

        if !self.tool_available(&invocation.program) {
            return Err(ToolError::NotFound {
                tool: invocation.program.clone(),
            });
        }
        if let Some(output) = self.failing.get(&invocation.program) {
            return Ok(output.clone());
        }

        self.simulate(invocation)
            .map_err(|source| ToolError::Spawn {
                tool: invocation.program.clone(),
                source,
            })
    }

    fn tool_available(&self, program: &str) -> bool {
        if Path::new(program).components().count() > 1 {
            Path::new(program).is_file()
        } else {
            !self.missing.contains(program)
        }
    }
}

fn tool_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn value_of<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn compile_typescript(root: &Path, args: &[String]) -> io::Result<()> {
    let out_dir = value_of(args, "--outDir")
        .map(PathBuf::from)
        .unwrap_or_else(|| root.join("dist"));
    let src = root.join("src");
    for rel in relative_files(&src)? {
        let name = rel.to_string_lossy();
        if name.ends_with(".ts") && !name.ends_with(".d.ts") {
            let source = fs::read_to_string(src.join(&rel))?;
            write_file(
                &out_dir.join(rel.with_extension("js")),
                &format!("// compiled\n{source}"),
            )?;
        }
    }
    Ok(())
}

/// Member paths of an archive written by [`FakeRunner`], or `None` when the
/// file is missing or was not written by it.
pub fn read_archive(path: &Path) -> Option<Vec<String>> {
    let content = fs::read_to_string(path).ok()?;
    let mut lines = content.lines();
    if lines.next() != Some(FAKE_ZIP_HEADER) {
        return None;
    }
    Some(lines.map(str::to_string).collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Started(String, String),
    Updated(String, String),
    Finished(String, StageState, String),
}

/// [`StatusSink`] that records every status line.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Status lines as `start|update|done|skipped|failed <stage>: <message>`.
    pub fn lines(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| match event {
                Event::Started(stage, msg) => format!("start {stage}: {msg}"),
                Event::Updated(stage, msg) => format!("update {stage}: {msg}"),
                Event::Finished(stage, state, msg) => format!("{state} {stage}: {msg}"),
            })
            .collect()
    }

    /// Resolved stages with their final state, in order.
    pub fn finished(&self) -> Vec<(String, StageState)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Finished(stage, state, _) => Some((stage, state)),
                _ => None,
            })
            .collect()
    }
}

impl StatusSink for RecordingSink {
    fn started(&self, stage: &str, message: &str) {
        self.push(Event::Started(stage.to_string(), message.to_string()));
    }

    fn updated(&self, stage: &str, message: &str) {
        self.push(Event::Updated(stage.to_string(), message.to_string()));
    }

    fn finished(&self, stage: &str, state: StageState, message: &str) {
        self.push(Event::Finished(
            stage.to_string(),
            state,
            message.to_string(),
        ));
    }
}

/// A throwaway extension project.
///
/// Starts as a plain JavaScript extension `clock@example.com` at version
/// 1.0.0 with `src/extension.js` and `src/stylesheet.css`.
pub struct Fixture {
    temp: TempDir,
}

impl Fixture {
    pub const ID: &'static str = "clock@example.com";

    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let fixture = Self { temp };
        fixture
            .write(
                "metadata.json",
                r#"{
  "uuid": "clock@example.com",
  "name": "Clock",
  "description": "Shows a clock",
  "shell-version": ["46"]
}
"#,
            )
            .write("package.json", "{\n  \"name\": \"clock\",\n  \"version\": \"1.0.0\"\n}\n")
            .write("src/extension.js", "export default class Clock {}\n")
            .write("src/stylesheet.css", ".clock {}\n");
        fixture
    }

    /// A TypeScript project: `tsconfig.json`, `src/extension.ts`,
    /// `src/prefs.ts` and `src/stylesheet.css`.
    pub fn typed() -> Self {
        let fixture = Self::new();
        fixture.remove("src/extension.js");
        fixture
            .write("tsconfig.json", "{}\n")
            .write("src/extension.ts", "export default class Clock {}\n")
            .write("src/prefs.ts", "export default class Prefs {}\n");
        fixture
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> &Self {
        write_file(&self.path(rel), content).expect("failed to write fixture file");
        self
    }

    pub fn mkdir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.path(rel)).expect("failed to create fixture dir");
        self
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).expect("failed to remove fixture file");
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("failed to read fixture file")
    }

    /// Files under `rel`, relative to it, `/`-separated and sorted.
    pub fn files(&self, rel: &str) -> Vec<String> {
        relative_files(&self.path(rel))
            .map(|files| files.iter().map(|p| to_posix_path(p)).collect())
            .unwrap_or_default()
    }

    /// Path of the archive for `version`.
    pub fn archive(&self, version: &str) -> PathBuf {
        self.path(&format!(
            "build/{}.shell-extension-v{version}.zip",
            Self::ID
        ))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
