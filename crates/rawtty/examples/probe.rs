//! Send two commands to a device and print each reply.
//!
//! Run with: `cargo run --example probe -- /dev/ttyUSB0`

use rawtty::line::{LineError, SerialLine};

fn main() -> Result<(), LineError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    let line = SerialLine::open(&path)?;
    println!("opened {path}");

    for command in ["Kx", "E"] {
        let written = line.write(command)?;
        let reply = line.read();
        println!(
            "{command:?} ({written} bytes) -> {:?}",
            String::from_utf8_lossy(&reply)
        );
    }

    line.close();
    Ok(())
}
