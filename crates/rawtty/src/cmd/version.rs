use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("rawtty {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: rawtty");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("RAWTTY_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("chunk_size: {}", rawtty_line::CHUNK_SIZE);
    println!(
        "default_line: {} baud, min_bytes={}, timeout_ds={}",
        rawtty_line::BaudRate::DEFAULT,
        rawtty_line::ReadTiming::DEFAULT.min_bytes,
        rawtty_line::ReadTiming::DEFAULT.timeout_deciseconds
    );

    Ok(SUCCESS)
}
