use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tracing::{info, warn};
use warp::Filter;

use crate::config::ServerConfig;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Port {port} is already in use. Try a different port or stop the existing server.")]
    PortInUse { port: u16 },
    #[error("error starting server: {0}")]
    Io(#[from] io::Error),
}

/// Static file routes for `root`, with the two hardening headers added to
/// every response.
pub fn routes(
    root: PathBuf,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone + Send + Sync + 'static
{
    warp::fs::dir(root)
        .with(warp::reply::with::header("X-Content-Type-Options", "nosniff"))
        .with(warp::reply::with::header("X-Frame-Options", "DENY"))
        .with(warp::log::custom(|request| {
            let remote = request
                .remote_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|| "-".to_string());
            info!(
                "[{}] {} {} {}",
                remote,
                request.method(),
                request.path(),
                request.status().as_u16()
            );
        }))
}

pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServeError> {
    let addr = SocketAddr::new(config.host, config.port);
    TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == io::ErrorKind::AddrInUse {
            ServeError::PortInUse { port: config.port }
        } else {
            ServeError::Io(e)
        }
    })
}

/// Serves `root` until Ctrl+C.
pub async fn serve(root: PathBuf, config: &ServerConfig) -> Result<(), ServeError> {
    let listener = bind(config).await?;
    let url = format!("http://localhost:{}", config.port);

    println!("Development server");
    println!("Serving at {}", url);
    println!("Serving files from: {}", root.display());
    println!("\nPress Ctrl+C to stop the server");

    if config.open_browser {
        let delay = Duration::from_millis(config.browser_delay_ms);
        let url = url.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = open::that(&url) {
                warn!(url = %url, error = %e, "could not open browser");
            }
        });
    }

    let server = warp::serve(routes(root)).run_incoming(TcpListenerStream::new(listener));
    tokio::select! {
        _ = server => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            println!("\nServer stopped.");
        }
    }
    Ok(())
}
