use log::{debug, info, warn};
use std::io::{self, BufRead, BufReader};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::file_serving::handlers::{bad_request, handle_file_request};
use crate::{log_request, log_response};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub document_root: PathBuf,
}

pub struct Server {
    listener: TcpListener,
    document_root: Arc<PathBuf>,
    shutdown: Arc<AtomicBool>,
}

/// Stops a running [`Server`] from another thread.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Requests shutdown. Returns `false` if one was already requested.
    pub fn shutdown(&self) -> bool {
        if self.flag.swap(true, Ordering::SeqCst) {
            return false;
        }
        // The accept loop only notices the flag once a connection arrives
        let _ = TcpStream::connect(self.addr);
        true
    }
}

impl Server {
    pub fn bind(config: &ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        Ok(Server {
            listener,
            document_root: Arc::new(config.document_root.clone()),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> io::Result<ShutdownHandle> {
        let mut addr = self.local_addr()?;
        if addr.ip().is_unspecified() {
            let loopback = match addr {
                SocketAddr::V4(_) => [127, 0, 0, 1].into(),
                SocketAddr::V6(_) => std::net::Ipv6Addr::LOCALHOST.into(),
            };
            addr.set_ip(loopback);
        }
        Ok(ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
            addr,
        })
    }

    /// Accepts connections until shut down, then waits for in-flight ones.
    ///
    /// Open connections have their read side closed first, so idle clients
    /// cannot hold the shutdown.
    pub fn run(self) -> io::Result<()> {
        let mut workers: Vec<(JoinHandle<()>, TcpStream)> = Vec::new();

        for stream in self.listener.incoming() {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let watch = match stream.try_clone() {
                Ok(watch) => watch,
                Err(e) => {
                    warn!("Failed to track connection: {}", e);
                    continue;
                }
            };
            let root = Arc::clone(&self.document_root);
            let worker = thread::spawn(move || {
                if let Err(e) = handle_connection(stream, &root) {
                    crate::log_error!(e, "Error handling connection");
                }
            });
            workers.push((worker, watch));
            workers.retain(|(w, _)| !w.is_finished());
        }

        info!("Closing {} open connection(s)", workers.len());
        for (_, watch) in &workers {
            // Unblocks a worker waiting on a request; responses still go out
            let _ = watch.shutdown(Shutdown::Read);
        }
        for (worker, _) in workers {
            let _ = worker.join();
        }
        Ok(())
    }
}

fn handle_connection(client: TcpStream, document_root: &Path) -> io::Result<()> {
    let started = Instant::now();
    let mut buf_reader = BufReader::new(&client);

    let mut raw_line = Vec::new();
    if buf_reader.read_until(b'\n', &mut raw_line)? == 0 {
        debug!("Connection closed before a request line");
        return Ok(());
    }

    let mut line = Vec::new();
    loop {
        line.clear();
        if buf_reader.read_until(b'\n', &mut line)? == 0
            || line.iter().all(u8::is_ascii_whitespace)
        {
            break;
        }
        debug!("Header line: {}", String::from_utf8_lossy(&line).trim());
    }

    let (status, size) = match String::from_utf8(raw_line) {
        Ok(request_line) => {
            log_request!(request_line);
            handle_file_request(client.try_clone()?, document_root, &request_line)?
        }
        Err(e) => {
            warn!("Request line is not valid UTF-8: {}", e);
            let mut client = &client;
            bad_request(&mut client)?
        }
    };
    log_response!(status, started.elapsed(), size);
    Ok(())
}

/// Binds, installs the Ctrl+C handler and serves until interrupted.
pub fn start_server(config: ServerConfig) -> io::Result<()> {
    let server = Server::bind(&config)?;
    let handle = server.shutdown_handle()?;

    ctrlc::set_handler(move || {
        if handle.shutdown() {
            info!("Shutting down the server...");
        } else {
            warn!("Forced exit");
            std::process::exit(1);
        }
    })
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    info!("Static web server is running on http://{}", server.local_addr()?);
    info!("Serving files from: {}", config.document_root.display());
    info!("Press Ctrl+C to stop the server");

    server.run()?;
    info!("Server closed.");
    Ok(())
}
