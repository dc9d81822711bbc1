// src/main.rs

//! A small command-line front end for the `rejson` client.
//!
//! Paths given on the command line are JSON Pointers and go through the
//! translator before being sent.

use anyhow::{Context, Result, bail};
use rejson::config::Config;
use rejson::{JsonClient, Path, SetCondition, pointer_to_native};
use std::env;
use tracing::{debug, error};
use tracing_subscriber::filter::EnvFilter;

const USAGE: &str = "\
Usage: rejson [--config <file>] [--host <host>] [--port <port>] <command> [args...]

Commands:
  translate <pointer>                  Print the native path for a JSON Pointer
  get <key> [pointer...]               Print the document or the given paths
  set <key> <pointer> <json> [nx|xx]   Store a JSON value
  del <key> [pointer]                  Delete a path (the whole key by default)
  type <key> [pointer]                 Print the JSON type at a path
  arrlen <key> <pointer>               Print the length of an array";

#[tokio::main]
async fn main() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let mut args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--version") {
        println!("rejson version {VERSION}");
        return Ok(());
    }
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let config_path = take_flag(&mut args, "--config")?;
    let mut config = match config_path {
        Some(path) => match Config::from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load configuration from \"{path}\": {e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    if let Some(host) = take_flag(&mut args, "--host")? {
        config.host = host;
    }
    if let Some(port_str) = take_flag(&mut args, "--port")? {
        config.port = port_str
            .parse()
            .with_context(|| format!("Invalid port number: {port_str}"))?;
    }
    config.validate()?;

    // RUST_LOG wins over the configured level.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(e) = run(&config, &args).await {
        error!("{e:#}");
        eprintln!("(error) {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(config: &Config, args: &[String]) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        bail!("missing command\n\n{USAGE}");
    };

    // Translation is purely local and needs no server.
    if command == "translate" {
        let [pointer] = rest else {
            bail!("usage: translate <pointer>");
        };
        println!("{}", pointer_to_native(Some(pointer.as_str()))?);
        return Ok(());
    }

    let client = JsonClient::new(config.to_pool_config());
    debug!(
        "Running '{}' against {}:{}",
        command, config.host, config.port
    );

    match (command.as_str(), rest) {
        ("get", [key, pointers @ ..]) => {
            let paths = pointers
                .iter()
                .map(|p| parse_pointer(p))
                .collect::<Result<Vec<_>>>()?;
            match client.get_value(key, &paths).await? {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => println!("(nil)"),
            }
        }
        ("set", [key, pointer, json, condition @ ..]) => {
            let path = parse_pointer(pointer)?;
            let value: serde_json::Value =
                serde_json::from_str(json).context("value is not valid JSON")?;
            let condition = match condition {
                [] => SetCondition::None,
                [c] => c.parse()?,
                _ => bail!("set takes at most one condition"),
            };
            if client.set_at(key, &path, &value, condition).await? {
                println!("OK");
            } else {
                println!("(nil)");
            }
        }
        ("del", [key]) => println!("(integer) {}", client.del(key).await?),
        ("del", [key, pointer]) => {
            let path = parse_pointer(pointer)?;
            println!("(integer) {}", client.del_at(key, &path).await?);
        }
        ("type", [key]) => print_type(client.json_type(key).await?),
        ("type", [key, pointer]) => {
            let path = parse_pointer(pointer)?;
            print_type(client.json_type_at(key, &path).await?);
        }
        ("arrlen", [key, pointer]) => {
            let path = parse_pointer(pointer)?;
            match client.arr_len(key, &path).await? {
                Some(len) => println!("(integer) {len}"),
                None => println!("(nil)"),
            }
        }
        (other, _) => bail!("unknown command or wrong arguments: '{other}'\n\n{USAGE}"),
    }
    Ok(())
}

fn parse_pointer(pointer: &str) -> Result<Path> {
    Path::from_json_pointer(Some(pointer))
        .with_context(|| format!("cannot translate pointer '{pointer}'"))
}

fn print_type(ty: Option<rejson::JsonValueType>) {
    match ty {
        Some(ty) => println!("{ty}"),
        None => println!("(nil)"),
    }
}

/// Removes `flag` and its value from `args`, returning the value.
fn take_flag(args: &mut Vec<String>, flag: &str) -> Result<Option<String>> {
    let Some(index) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    if index + 1 >= args.len() {
        bail!("{flag} flag requires a value");
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Ok(Some(value))
}
