//! Example signal relay CLI.
//!
//! # Usage
//!
//! ```bash
//! signal <color> <flavor> [radio...]
//! ```
//!
//! # Example
//!
//! ```bash
//! HOOKCHAIN_LOG=debug signal purple grape alpha beta
//! ```

use example::{Radio, WE_GET_SIGNAL, radio_class};
use hookchain::prelude::*;
use hookchain::hookchain_tracing::TracingConfig;

fn main() {
    let _ = dotenvy::dotenv();
    TracingConfig::from_env().init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: <color> <flavor> [radio...]");
        eprintln!("Example: purple grape alpha beta");
        std::process::exit(1);
    }

    let class = radio_class().unwrap_or_else(|e| {
        eprintln!("Error: cannot build radio hooks: {e}");
        std::process::exit(1);
    });

    let names: Vec<&str> = if args.len() > 3 {
        args[3..].iter().map(String::as_str).collect()
    } else {
        vec!["radio"]
    };
    let radios: Vec<Radio> = names.iter().map(|name| Radio::new(&class, *name)).collect();

    // The first radio also announces itself.
    if let Some(first) = radios.first() {
        let announced = first.hooks().add_callback(
            WE_GET_SIGNAL,
            Callable::<Radio>::nullary(|call| {
                if let Some(radio) = call.receiver() {
                    tracing::info!(radio = radio.name(), "main screen turn on");
                }
                Ok(Value::Null)
            }),
        );
        if let Err(e) = announced {
            eprintln!("Error: {e}");
        }
    }

    for radio in &radios {
        if let Err(e) = radio.receive(&args[1], &args[2]) {
            eprintln!("Error: {}: {e}", radio.name());
            continue;
        }
        for line in radio.log() {
            tracing::info!(radio = radio.name(), "{line}");
        }
    }
}
