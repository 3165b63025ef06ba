//! Purpose: `tango-config` diagnostic CLI over the entry registry and status translation.
//! Role: Binary crate root; parses args, runs one command, emits JSON or text on stdout.
//! Invariants: Errors are emitted as JSON on stderr; exit code comes from `to_exit_code`.
//! Invariants: Stores are seeded from a JSON file and never written back.
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value as JsonValue, json};
use tracing_subscriber::EnvFilter;

use tango_config::core::entry::ConfigKey;
use tango_config::core::error::{Error, ErrorKind, to_exit_code};
use tango_config::core::memory::MemoryConfig;
use tango_config::core::status::classify;
use tango_config::core::store::{get, read_key, set, to_string, write_key};
use tango_config::core::value::{Value, ValueType};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

#[derive(Parser)]
#[command(
    name = "tango-config",
    version,
    about = "Inspect Tango configuration entries and status codes",
    long_about = None,
    after_help = r#"EXAMPLES
  $ tango-config entries
  $ tango-config classify -- -3
  $ tango-config get --seed device.json config_depth_mode
  $ tango-config get --seed device.json custom_key --type double
  $ tango-config set --seed device.json config_enable_depth false

NOTES
  - Seed files are flat JSON objects of entry name to scalar value.
  - Nothing is persisted; `set` prints the store after the write.
  - Set RUST_LOG=debug to trace native call failures."#
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "List the built-in configuration entries")]
    Entries {
        #[arg(long, help = "Emit JSON instead of a table")]
        json: bool,
    },
    #[command(about = "Translate a native status code into its category and message")]
    Classify {
        #[arg(allow_negative_numbers = true)]
        code: i32,
    },
    #[command(about = "Read one entry from a seeded store")]
    Get {
        #[command(flatten)]
        seed: SeedArgs,
        name: String,
        #[arg(long = "type", help = "Value type; required for names outside the registry")]
        value_type: Option<String>,
    },
    #[command(about = "Write one entry to a seeded store and print the resulting store")]
    Set {
        #[command(flatten)]
        seed: SeedArgs,
        name: String,
        value: String,
        #[arg(long = "type", help = "Value type; required for names outside the registry")]
        value_type: Option<String>,
    },
    #[command(about = "Print the seeded store as the native to_string would")]
    Dump {
        #[command(flatten)]
        seed: SeedArgs,
    },
    #[command(about = "Read every readable built-in entry and report failures")]
    Check {
        #[command(flatten)]
        seed: SeedArgs,
    },
}

#[derive(Args)]
struct SeedArgs {
    #[arg(long, value_hint = ValueHint::FilePath, help = "JSON object used to seed the store")]
    seed: Option<PathBuf>,
}

impl SeedArgs {
    fn load(&self) -> Result<MemoryConfig, Error> {
        match &self.seed {
            Some(path) => load_seed(path),
            None => Ok(MemoryConfig::new()),
        }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                return Ok(RunOutcome::ok());
            }
            _ => {
                let message = err.to_string();
                let summary = message.lines().next().unwrap_or("invalid arguments");
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(summary.trim_start_matches("error: ").to_string()));
            }
        },
    };

    match cli.command {
        Command::Entries { json } => {
            cmd_entries(json);
            Ok(RunOutcome::ok())
        }
        Command::Classify { code } => {
            let classified = classify(code);
            emit_json(json!({
                "code": code,
                "category": classified.category,
                "message": classified.message,
            }));
            Ok(RunOutcome::ok())
        }
        Command::Get {
            seed,
            name,
            value_type,
        } => {
            let store = seed.load()?;
            let value = cmd_get(&store, &name, value_type.as_deref())?;
            emit_json(json!({
                "name": name,
                "type": value.value_type(),
                "value": value,
            }));
            Ok(RunOutcome::ok())
        }
        Command::Set {
            seed,
            name,
            value,
            value_type,
        } => {
            let mut store = seed.load()?;
            cmd_set(&mut store, &name, &value, value_type.as_deref())?;
            print!("{}", to_string(&store)?);
            Ok(RunOutcome::ok())
        }
        Command::Dump { seed } => {
            let store = seed.load()?;
            print!("{}", to_string(&store)?);
            Ok(RunOutcome::ok())
        }
        Command::Check { seed } => {
            let store = seed.load()?;
            Ok(cmd_check(&store))
        }
    }
}

fn cmd_entries(as_json: bool) {
    if as_json {
        let entries = ConfigKey::ALL
            .iter()
            .map(|key| key.lookup())
            .collect::<Vec<_>>();
        emit_json(json!({ "entries": entries }));
        return;
    }
    let width = ConfigKey::ALL
        .iter()
        .map(|key| key.name().len())
        .max()
        .unwrap_or(0);
    for key in ConfigKey::ALL {
        let info = key.lookup();
        println!(
            "{:<width$}  {:<6}  {}",
            info.name,
            info.value_type.as_str(),
            info.permission.short()
        );
    }
}

fn parse_value_type(input: Option<&str>) -> Result<Option<ValueType>, Error> {
    input
        .map(|raw| {
            ValueType::parse(raw).ok_or_else(|| {
                Error::new(ErrorKind::Usage).with_message(format!(
                    "unknown type '{raw}' (expected bool, int32, int64, double, string)"
                ))
            })
        })
        .transpose()
}

/// Resolves the type to use for `name`: the registry's for built-in keys, else `--type`.
fn resolve(name: &str, requested: Option<&str>) -> Result<(Option<ConfigKey>, ValueType), Error> {
    let requested = parse_value_type(requested)?;
    match (ConfigKey::from_name(name), requested) {
        (Some(key), Some(ty)) if ty != key.lookup().value_type => {
            Err(Error::new(ErrorKind::Usage).with_message(format!(
                "'{name}' is {}, not {ty}",
                key.lookup().value_type
            )))
        }
        (Some(key), _) => Ok((Some(key), key.lookup().value_type)),
        (None, Some(ty)) => Ok((None, ty)),
        (None, None) => Err(Error::new(ErrorKind::NotFound)
            .with_message(format!("'{name}' is not a built-in entry; pass --type"))),
    }
}

fn cmd_get(store: &MemoryConfig, name: &str, requested: Option<&str>) -> Result<Value, Error> {
    let (key, ty) = resolve(name, requested)?;
    if let Some(key) = key {
        return Ok(read_key(store, key)?);
    }
    let value = match ty {
        ValueType::Bool => Value::Bool(get(store, name)?),
        ValueType::Int32 => Value::Int32(get(store, name)?),
        ValueType::Int64 => Value::Int64(get(store, name)?),
        ValueType::Double => Value::Double(get(store, name)?),
        ValueType::String => Value::String(get(store, name)?),
    };
    Ok(value)
}

fn cmd_set(
    store: &mut MemoryConfig,
    name: &str,
    raw: &str,
    requested: Option<&str>,
) -> Result<(), Error> {
    let (key, ty) = resolve(name, requested)?;
    let value = Value::parse_as(ty, raw).ok_or_else(|| {
        Error::new(ErrorKind::Usage).with_message(format!("'{raw}' is not a valid {ty}"))
    })?;
    if let Some(key) = key {
        return Ok(write_key(store, key, &value)?);
    }
    match &value {
        Value::Bool(value) => set(store, name, value)?,
        Value::Int32(value) => set(store, name, value)?,
        Value::Int64(value) => set(store, name, value)?,
        Value::Double(value) => set(store, name, value)?,
        Value::String(value) => set(store, name, value.as_str())?,
    }
    Ok(())
}

fn cmd_check(store: &MemoryConfig) -> RunOutcome {
    let mut failures = 0;
    let mut entries = Vec::new();
    for key in ConfigKey::ALL {
        let info = key.lookup();
        if !info.permission.is_readable() {
            continue;
        }
        let mut entry = Map::new();
        entry.insert("name".to_string(), json!(info.name));
        match read_key(store, *key) {
            Ok(value) => {
                entry.insert("ok".to_string(), json!(true));
                entry.insert("value".to_string(), json!(value));
            }
            Err(err) => {
                failures += 1;
                entry.insert("ok".to_string(), json!(false));
                entry.insert("code".to_string(), json!(err.code()));
                entry.insert("message".to_string(), json!(err.to_string()));
            }
        }
        entries.push(JsonValue::Object(entry));
    }
    emit_json(json!({ "entries": entries, "failures": failures }));
    if failures == 0 {
        RunOutcome::ok()
    } else {
        RunOutcome::with_code(to_exit_code(ErrorKind::Status))
    }
}

fn load_seed(path: &Path) -> Result<MemoryConfig, Error> {
    let text = fs::read_to_string(path).map_err(|err| {
        let kind = if err.kind() == io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            ErrorKind::Io
        };
        Error::new(kind)
            .with_message(format!("failed to read seed {}", path.display()))
            .with_source(err)
    })?;
    let json: JsonValue = serde_json::from_str(&text).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("seed {} is not valid JSON", path.display()))
            .with_source(err)
    })?;
    MemoryConfig::from_json(&json)
}

fn emit_json(value: JsonValue) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_json(err: &Error) -> JsonValue {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("unknown error")),
    );
    if let Some(status) = err.status() {
        inner.insert("code".to_string(), json!(status.code()));
        inner.insert("category".to_string(), json!(status.category().name()));
        inner.insert("detail".to_string(), json!(status.classified_message()));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), JsonValue::Object(inner));
    JsonValue::Object(outer)
}
