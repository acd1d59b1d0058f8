use std::{env, io, process::exit};

use chrono::Utc;
use tracing::{error, info};

use gps_sim::{
    cli::{self, Args, Command},
    lazy_init_tracing,
    model::{DeadReckoning, Stationary, TimeDelta},
    transmit::{Transmitter, UdpTransport},
    TGResult,
};

fn main() {
    lazy_init_tracing();

    let args = match cli::parse(env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print!("{}", cli::USAGE);
            return;
        }
        Err(err) => {
            eprintln!("gps-sim: {err}\n");
            eprint!("{}", cli::USAGE);
            exit(2)
        }
    };

    exit(handle_result(run(&args)))
}

/// Exit code for a finished run. Errors are reported once, through the stderr subscriber.
fn handle_result(res: TGResult<()>) -> i32 {
    match res {
        Ok(()) => 0,
        Err(err) => {
            error!("An error occurred: {}", err);
            1
        }
    }
}

fn run(args: &Args) -> TGResult<()> {
    let start = args.initial_fix(Utc::now())?;
    let transport = UdpTransport::connect(&args.host, args.port)?;
    let interval = TimeDelta::from_millis(args.interval_ms);
    let console = io::stdout().lock();

    let sent = if args.underway {
        Transmitter::new(DeadReckoning::new(start)?, transport, console, interval)
            .run(args.count)?
    } else {
        Transmitter::new(Stationary::new(start)?, transport, console, interval).run(args.count)?
    };
    info!("sent {} sentences", sent);
    Ok(())
}
