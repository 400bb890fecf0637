use clap::Parser;
use std::io;
use std::process;

use tarot_kit::args::ServeArgs;
use tarot_kit::logging::setup_logging;
use tarot_kit::server::{start_server, ServerConfig};

fn main() {
    setup_logging();
    let config = ServerConfig::from(ServeArgs::parse());
    let listen_addr = config.listen_addr.clone();

    if let Err(e) = start_server(config) {
        match e.kind() {
            io::ErrorKind::AddrInUse => log::error!(
                "Address {} is already in use. Please try a different port.",
                listen_addr
            ),
            _ => log::error!("Server error: {}", e),
        }
        process::exit(1);
    }
}
