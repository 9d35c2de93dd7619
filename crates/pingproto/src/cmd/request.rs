use pingproto_messages::common::GeneralRequest;
use pingproto_messages::Message;
use tracing::debug;

use crate::cmd::RequestArgs;
use crate::exit::{client_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: RequestArgs, format: OutputFormat) -> CliResult<i32> {
    let mut client = args.link.connect()?;

    client
        .send(&Message::GeneralRequest(GeneralRequest::new(
            args.message_id,
        )))
        .map_err(|err| client_error("send request", err))?;

    let mut skipped = 0u32;
    loop {
        let message = client
            .read_message()
            .map_err(|err| client_error("read reply", err))?;

        match &message {
            Message::NotAcknowledged(nack) if nack.nacked_id == args.message_id => {
                print_message(&message, format);
                return Ok(FAILURE);
            }
            _ if message.message_id() == args.message_id => {
                print_message(&message, format);
                return Ok(SUCCESS);
            }
            _ => {
                debug!(
                    message_id = message.message_id(),
                    name = message.name(),
                    "skipping unrelated message"
                );
                skipped += 1;
                if skipped > args.max_skips {
                    return Err(CliError::new(
                        FAILURE,
                        format!(
                            "no reply for message {} within {} frames",
                            args.message_id, args.max_skips
                        ),
                    ));
                }
            }
        }
    }
}
