use std::net::SocketAddr;
use std::time::Duration;

const HELP: &str = "\
jvc - JVC projector control

USAGE:
  jvc [OPTIONS] <COMMAND>

COMMANDS:
  status                   Show power, input, gamma, source and model
  on [--wait]              Power on (--wait: until warm-up finishes)
  off [--wait]             Power off (--wait: until cool-down finishes)
  cmd <name> [hex]         Send a command by name, with an optional payload
  commands                 List every known command
  emulator                 Run a projector emulator until Ctrl-C

OPTIONS:
  -h, --help               Prints help information
  --log-level <level>      Log filter when RUST_LOG is unset (default: warn)
  --host <spec>            Projector host[:port], tcp://... or sddp://
  --port <port>            Default port (default: 20554)
  --password <password>    Projector password
  --timeout <seconds>      Network timeout (default: 2)

EMULATOR OPTIONS:
  --bind <addr>            Listen address (default: 0.0.0.0:20554)
  --model <name>           Emulated model (default: DLA-NZ8)
  --warmup <seconds>       Warm-up and cool-down time (default: 10)

Client settings default to the JVC_PROJECTOR_HOST, JVC_PROJECTOR_PORT,
JVC_PROJECTOR_PASSWORD and JVC_PROJECTOR_TIMEOUT environment variables.
";

#[derive(Debug)]
pub enum Subcommand {
    Status,
    On { wait: bool },
    Off { wait: bool },
    Cmd { name: String, payload: Option<String> },
    Commands,
    Emulator {
        bind: Option<SocketAddr>,
        model: Option<String>,
        warmup: Option<Duration>,
    },
}

#[derive(Debug)]
pub struct AppArgs {
    pub log_level: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub password: Option<String>,
    pub timeout: Option<Duration>,
    pub command: Subcommand,
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let seconds: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("{e}"))
}

pub fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let subcommand: Option<String> = pargs.subcommand()?;

    let log_level = pargs
        .opt_value_from_str("--log-level")?
        .unwrap_or_else(|| "warn".to_string());
    let host = pargs.opt_value_from_str("--host")?;
    let port = pargs.opt_value_from_str("--port")?;
    let password = pargs.opt_value_from_str("--password")?;
    let timeout = pargs.opt_value_from_fn("--timeout", parse_seconds)?;

    let command = match subcommand.as_deref() {
        Some("status") => Subcommand::Status,
        Some("on") => Subcommand::On {
            wait: pargs.contains("--wait"),
        },
        Some("off") => Subcommand::Off {
            wait: pargs.contains("--wait"),
        },
        Some("cmd") => Subcommand::Cmd {
            name: pargs.free_from_str()?,
            payload: pargs.opt_free_from_str()?,
        },
        Some("commands") => Subcommand::Commands,
        Some("emulator") => Subcommand::Emulator {
            bind: pargs.opt_value_from_str("--bind")?,
            model: pargs.opt_value_from_str("--model")?,
            warmup: pargs.opt_value_from_fn("--warmup", parse_seconds)?,
        },
        Some(other) => {
            eprintln!("Unknown command: {other}\n\n{HELP}");
            std::process::exit(2);
        }
        None => {
            print!("{HELP}");
            std::process::exit(2);
        }
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {remaining:?}.");
    }

    Ok(AppArgs {
        log_level,
        host,
        port,
        password,
        timeout,
        command,
    })
}
