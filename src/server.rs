use std::future::{Future, IntoFuture};
use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Serve until SIGINT/SIGTERM, then give in-flight requests `grace` to finish
pub async fn serve(listener: TcpListener, router: Router, grace: Duration) -> io::Result<()> {
    serve_with_shutdown(listener, router, grace, shutdown_signal()).await
}

/// Serve until `signal` resolves. Once it does the listener stops accepting
/// and open connections get `grace` to drain before the server is dropped.
pub async fn serve_with_shutdown<S>(
    listener: TcpListener,
    router: Router,
    grace: Duration,
    signal: S,
) -> io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let (tx, mut rx) = watch::channel(false);

    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        signal.await;
        tracing::info!("shutdown signal received, draining connections");
        let _ = tx.send(true);
    })
    .into_future();

    tokio::select! {
        result = server => result,
        _ = async {
            // Sender dropped without signalling means the server already exited
            let stopping = rx.wait_for(|stopping| *stopping).await.is_ok();
            if stopping {
                tokio::time::sleep(grace).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            tracing::warn!(grace_secs = grace.as_secs(), "grace period elapsed, dropping open connections");
            Ok(())
        }
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn stops_when_signal_fires() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let router = Router::new().route("/", get(|| async { "ok" }));
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve_with_shutdown(listener, router, Duration::from_millis(200), async move {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;

        assert!(matches!(result, Ok(Ok(Ok(())))));
    }

    #[tokio::test]
    async fn grace_period_bounds_slow_requests() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        );
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve_with_shutdown(listener, router, Duration::from_millis(100), async move {
            let _ = rx.await;
        }));

        // Park a request inside the slow handler before signalling
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        tokio::io::AsyncWriteExt::write_all(&mut stream, b"GET /slow HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;

        assert!(matches!(result, Ok(Ok(Ok(())))));
    }
}
