use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cmd::MonitorArgs;
use crate::exit::{client_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .map_err(|err| CliError::new(INTERNAL, format!("install signal handler: {err}")))?;
    }

    let mut client = args.link.connect()?;

    // The stop flag is only observed between messages; a quiet link keeps
    // the read blocked until the next frame arrives.
    let mut seen = 0usize;
    client
        .run(|message| {
            print_message(message, format);
            seen += 1;

            let count_reached = args.count.is_some_and(|count| seen >= count);
            if stop.load(Ordering::SeqCst) || count_reached {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .map_err(|err| client_error("session", err))?;

    Ok(SUCCESS)
}
