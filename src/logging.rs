//! Structured logging for chart rendering runs.
//!
//! Every record is one JSON line carrying the run id, a sequence number,
//! level, domain and free-form data fields. Records go to stderr so stdout
//! stays usable for rendered output; when `LOG_DIR` is set they are also
//! appended to `<LOG_DIR>/<run_id>/events.jsonl`.

use chrono::Utc;
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Load,    // Document fetch and parse
    Build,   // Dataset assembly
    Render,  // Backend drawing, page output
    System,  // Startup, shutdown
    Profile, // Timing
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Load => "load",
            Domain::Build => "build",
            Domain::Render => "render",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS: comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    events: Option<Mutex<BufWriter<File>>>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let events = std::env::var("LOG_DIR")
            .ok()
            .and_then(|base| open_events(Path::new(&base), &run_id));
        RunContext { run_id, events }
    })
}

/// `<base>/<run_id>/events.jsonl`, created fresh. `None` if it can't be.
fn open_events(base: &Path, run_id: &str) -> Option<Mutex<BufWriter<File>>> {
    let run_dir = base.join(run_id);
    if let Err(err) = create_dir_all(&run_dir) {
        eprintln!("[log] failed to create run dir: {}", err);
        return None;
    }
    match File::create(run_dir.join("events.jsonl")) {
        Ok(file) => Some(Mutex::new(BufWriter::new(file))),
        Err(err) => {
            eprintln!("[log] failed to create events log: {}", err);
            None
        }
    }
}

fn write_line(writer: &Mutex<BufWriter<File>>, line: &str) {
    if let Ok(mut w) = writer.lock() {
        let _ = writeln!(w, "{}", line);
        let _ = w.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    let line = format_record(level, domain.as_str(), event, fields);
    let ctx = ensure_run_context();
    if let Some(events) = &ctx.events {
        write_line(events, &line);
    }
    eprintln!("{}", line);
}

fn format_record(level: Level, component: &str, event: &str, mut fields: Map<String, Value>) -> String {
    let ctx = ensure_run_context();
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));

    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(ctx.run_id.clone()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));
    Value::Object(entry).to_string()
}

// =============================================================================
// Domain-Specific Logging Helpers
// =============================================================================

/// A document arrived and parsed as JSON.
pub fn log_fetch(source: &str, bytes: usize, sha256: &str) {
    log(
        Level::Info,
        Domain::Load,
        "fetched",
        obj(&[
            ("source", v_str(source)),
            ("bytes", json!(bytes)),
            ("sha256", v_str(sha256)),
        ]),
    );
}

/// Data that renders but is probably not what the producer meant.
pub fn log_schema_warning(solver: &str, reason: &str, expected: usize, actual: usize) {
    log(
        Level::Warn,
        Domain::Build,
        "misaligned_series",
        obj(&[
            ("solver", v_str(solver)),
            ("reason", v_str(reason)),
            ("expected", json!(expected)),
            ("actual", json!(actual)),
        ]),
    );
}

pub fn log_render(backend: &str, canvas_id: &str, labels: usize, datasets: usize) {
    log(
        Level::Info,
        Domain::Render,
        "rendered",
        obj(&[
            ("backend", v_str(backend)),
            ("canvas_id", v_str(canvas_id)),
            ("labels", json!(labels)),
            ("datasets", json!(datasets)),
        ]),
    );
}

pub fn log_failure(domain: Domain, kind: &str, msg: &str) {
    log(
        Level::Error,
        domain,
        "failed",
        obj(&[("kind", v_str(kind)), ("msg", v_str(msg))]),
    );
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Profiling scope that emits structured timing on drop.
pub struct ProfileScope {
    label: &'static str,
    context: Map<String, Value>,
    started: Instant,
}

impl ProfileScope {
    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        Self {
            label,
            context: obj(fields),
            started: Instant::now(),
        }
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let mut fields = std::mem::take(&mut self.context);
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(elapsed_ms));
        log(Level::Trace, Domain::Profile, "profile", fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_obj_helper() {
        let m = obj(&[("key", v_str("value")), ("num", v_num(42.0))]);
        assert_eq!(m.get("key").unwrap(), "value");
        assert_eq!(m.get("num").unwrap(), 42.0);
    }

    #[test]
    fn test_record_shape() {
        let line = format_record(
            Level::Warn,
            "build",
            "misaligned_series",
            obj(&[("msg", v_str("short series")), ("solver", v_str("cbc"))]),
        );
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["lvl"], "WARN");
        assert_eq!(v["component"], "build");
        assert_eq!(v["msg"], "short series");
        assert_eq!(v["data"]["solver"], "cbc");
        assert!(v["data"].get("msg").is_none());
    }

    #[test]
    fn test_events_file_gets_one_record_per_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let events = open_events(dir.path(), "r-test").unwrap();
        let first = format_record(
            Level::Info,
            "load",
            "fetched",
            obj(&[("source", v_str("instances.json")), ("bytes", json!(42))]),
        );
        let second = format_record(
            Level::Error,
            "render",
            "failed",
            obj(&[("kind", v_str("element_not_found")), ("msg", v_str("no canvas"))]),
        );
        write_line(&events, &first);
        write_line(&events, &second);

        let path = dir.path().join("r-test").join("events.jsonl");
        let text = std::fs::read_to_string(path).unwrap();
        let records: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["event"], "fetched");
        assert_eq!(records[0]["data"]["bytes"], 42);
        assert_eq!(records[1]["lvl"], "ERROR");
        assert_eq!(records[1]["msg"], "no canvas");
        assert_eq!(records[0]["run_id"], records[1]["run_id"]);
        assert!(records[1]["seq"].as_u64() > records[0]["seq"].as_u64());
    }

    #[test]
    fn test_events_dir_unwritable_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        assert!(open_events(&blocker, "r-test").is_none());
    }

    #[test]
    fn test_seq_increments() {
        let s1 = next_seq();
        let s2 = next_seq();
        assert!(s2 > s1);
    }
}
