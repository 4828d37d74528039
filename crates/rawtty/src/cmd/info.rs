use crate::cmd::{open_line, InfoArgs};
use crate::exit::{line_error, CliResult, SUCCESS};
use crate::output::{print_settings, OutputFormat};

pub fn run(args: InfoArgs, format: OutputFormat) -> CliResult<i32> {
    let line = open_line(&args.path, &args.line)?;
    let settings = line
        .settings()
        .map_err(|err| line_error("reading attributes failed", err))?;
    line.close();

    print_settings(&args.path, &settings, format);
    Ok(SUCCESS)
}
