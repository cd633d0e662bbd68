//! warpgen: register a WARP device and emit tunnel client configuration
//!
//! # Usage
//!
//! ```bash
//! # Register a WireGuard device, print mihomo YAML to stdout
//! warpgen wireguard
//!
//! # Register a MASQUE device, write YAML to a file
//! warpgen masque -o config.yaml --name my-device
//!
//! # WireGuard INI profile instead of YAML
//! warpgen wireguard --format ini
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use warpgen::api::ApiSettings;
use warpgen::profile::SynthOptions;
use warpgen::provision::{provision_masque, provision_wireguard};

/// Selected tunnel type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TunnelKind {
    Wireguard,
    Masque,
}

/// Selected output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Yaml,
    Ini,
}

/// Command-line arguments
struct Args {
    tunnel: TunnelKind,
    output: Option<PathBuf>,
    jwt: Option<String>,
    name: Option<String>,
    listen: Option<String>,
    port: Option<u16>,
    dns: Option<Vec<String>>,
    format: OutputFormat,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);

        let tunnel = match args.next().as_deref() {
            Some("wireguard") => TunnelKind::Wireguard,
            Some("masque") => TunnelKind::Masque,
            Some("-h" | "--help") => {
                print_help();
                std::process::exit(0);
            }
            Some("-v" | "--version") => {
                println!("warpgen v{}", warpgen::VERSION);
                std::process::exit(0);
            }
            other => {
                if let Some(arg) = other {
                    eprintln!("Unknown subcommand: {arg}");
                }
                print_help();
                std::process::exit(1);
            }
        };

        let mut output = None;
        let mut jwt = None;
        let mut name = None;
        let mut listen = None;
        let mut port = None;
        let mut dns = None;
        let mut format = OutputFormat::Yaml;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-o" | "--output" => output = args.next().map(PathBuf::from),
                "--jwt" => jwt = args.next(),
                "--name" => name = args.next(),
                "--listen" => listen = args.next(),
                "--port" => {
                    port = args.next().as_deref().and_then(parse_listener_port);
                    if port.is_none() {
                        eprintln!("--port expects a number between 1 and 65535");
                        std::process::exit(1);
                    }
                }
                "--dns" => {
                    dns = args.next().map(|list| {
                        list.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(str::to_string)
                            .collect()
                    });
                }
                "--format" => {
                    format = match args.next().as_deref() {
                        Some("yaml") => OutputFormat::Yaml,
                        Some("ini") => OutputFormat::Ini,
                        _ => {
                            eprintln!("--format expects 'yaml' or 'ini'");
                            std::process::exit(1);
                        }
                    };
                }
                "-h" | "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {arg}");
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        if format == OutputFormat::Ini && tunnel != TunnelKind::Wireguard {
            eprintln!("--format ini is only available for the wireguard subcommand");
            std::process::exit(1);
        }
        if name.is_some() && tunnel != TunnelKind::Masque {
            eprintln!("--name is only available for the masque subcommand");
            std::process::exit(1);
        }

        Self {
            tunnel,
            output,
            jwt,
            name,
            listen,
            port,
            dns,
            format,
        }
    }
}

fn print_help() {
    println!(
        r#"warpgen v{}

Register a WARP device and emit tunnel client configuration.

USAGE:
    warpgen wireguard [OPTIONS]
    warpgen masque [OPTIONS]

OPTIONS:
    -o, --output <PATH>    Write the config to a file [default: stdout]
    --jwt <TOKEN>          Zero Trust JWT for enterprise registration
    --name <NAME>          Device display name (masque only)
    --listen <ADDR>        SOCKS listener bind address [default: 127.0.0.1]
    --port <PORT>          SOCKS listener port [default: 1080]
    --dns <A,B,...>        DNS servers [default: 1.1.1.1,1.0.0.1]
    --format <yaml|ini>    Output format (wireguard only) [default: yaml]
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT:
    WARPGEN_LOG            Log filter (trace, debug, info, warn, error)
"#,
        warpgen::VERSION
    );
}

/// Parse a SOCKS listener port; 0 is not a bindable choice here
fn parse_listener_port(value: &str) -> Option<u16> {
    value.parse().ok().filter(|port| *port != 0)
}

/// Initialize logging on stderr, keeping stdout free for the config output
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("WARPGEN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let settings = ApiSettings::default();

    let mut options = SynthOptions::default();
    if let Some(listen) = args.listen {
        options.listen = listen;
    }
    if let Some(port) = args.port {
        options.port = port;
    }
    if let Some(dns) = args.dns {
        options.dns = dns;
    }

    let rendered = match args.tunnel {
        TunnelKind::Wireguard => {
            info!("registering new WireGuard device...");
            let configs = provision_wireguard(&settings, &options, args.jwt.as_deref()).await?;
            match args.format {
                OutputFormat::Yaml => configs.yaml,
                OutputFormat::Ini => configs.ini,
            }
        }
        TunnelKind::Masque => {
            info!("registering new MASQUE device...");
            let configs = provision_masque(
                &settings,
                &options,
                args.jwt.as_deref(),
                args.name.as_deref(),
            )
            .await?;
            configs.yaml
        }
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, &rendered)
                .with_context(|| format!("failed to write config to {}", path.display()))?;
            info!("config saved to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    info!("registration successful");
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging();

    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
