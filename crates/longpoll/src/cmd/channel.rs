use longpoll_session::channel;

use crate::cmd::ChannelArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_channel, OutputFormat};

pub fn run(args: ChannelArgs, format: OutputFormat) -> CliResult<i32> {
    let id = channel(args.user, &args.service, args.id)
        .map_err(|err| session_error("channel", err))?;

    print_channel(&id, format);
    Ok(SUCCESS)
}
