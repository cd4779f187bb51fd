//! Machine file verifier.
//!
//! Usage:
//!   machinefile --path machine.lic --license KEY [--fingerprint FP]
//!
//! The issuer's public key is read from `--public-key` or `KEYGEN_PUBLIC_KEY`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use machinefile_cli::{default_fingerprint, execute, Invocation};
use machinefile_license::MachineFileError;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "machinefile")]
#[command(about = "Verify and decrypt a machine file license certificate")]
struct Args {
    /// Path to machine file
    #[arg(short, long)]
    path: PathBuf,

    /// License key
    #[arg(short, long)]
    license: String,

    /// Machine fingerprint (defaults to a hash of this machine's identifier)
    #[arg(short, long)]
    fingerprint: Option<String>,

    /// Hex-encoded Ed25519 public key of the certificate issuer
    #[arg(short = 'k', long, env = "KEYGEN_PUBLIC_KEY", hide_env_values = true)]
    public_key: String,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let fingerprint = args.fingerprint.unwrap_or_else(|| {
        debug!("no fingerprint given, using machine default");
        default_fingerprint()
    });

    let invocation = Invocation {
        path: &args.path,
        license_key: &args.license,
        fingerprint: &fingerprint,
        public_key_hex: &args.public_key,
    };

    let mut stdout = std::io::stdout().lock();
    match execute(&invocation, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<MachineFileError>()
                .map_or(1, MachineFileError::exit_code);
            eprintln!("[error] {err}");
            ExitCode::from(code)
        }
    }
}
