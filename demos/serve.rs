use deferred_writer::headers::ContentLength;
use deferred_writer::response::{DeferredStatusWriter, Http11Sink};
use deferred_writer::{ResponseSink, StatusCode};
use std::io::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing_subscriber::EnvFilter;

static FRAME_SIZE: usize = 1024;
static MAX_HEAD_SIZE: usize = 16 * 1024;
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Encodes `message` and may decide the request failed after all.
fn encode(rw: &mut dyn ResponseSink, message: &str) -> Result<()> {
    let body = format!("{{\"message\":\"{}\"}}\n", message);

    if message == "boom" {
        rw.commit_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
    rw.headers().set("content-type", "application/json");
    rw.headers().set_typed(&ContentLength::new(body.len() as u64));
    rw.write_body(body.as_bytes())?;
    Ok(())
}

/// Routes `path` to a status, then lets the encoder produce the body.
fn respond(path: &str) -> Result<Vec<u8>> {
    let mut sink = Http11Sink::new(Vec::new());
    let mut rw = DeferredStatusWriter::new(&mut sink);

    let message = match path.trim_start_matches('/') {
        "" => {
            rw.set_status(StatusCode::OK);
            "hello"
        }
        "boom" => {
            rw.set_status(StatusCode::OK);
            "boom"
        }
        _ => {
            rw.set_status(StatusCode::NOT_FOUND);
            "not found"
        }
    };

    encode(&mut rw, message)?;
    sink.finish()
}

async fn read_head(stream: &mut TcpStream) -> Result<Vec<u8>> {
    let mut head = Vec::with_capacity(FRAME_SIZE);
    let mut buffer = [0u8; 1024];

    loop {
        let n = stream.read(&mut buffer).await?;
        if n == 0 {
            break;
        }

        head.extend_from_slice(&buffer[..n]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") || head.len() > MAX_HEAD_SIZE {
            break;
        }
    }

    Ok(head)
}

async fn process_socket(mut stream: TcpStream) -> Result<()> {
    let head = read_head(&mut stream).await?;
    let request_line = String::from_utf8_lossy(&head);
    let path = request_line
        .lines()
        .next()
        .and_then(|line| line.split(' ').nth(1))
        .unwrap_or("/")
        .to_string();

    tracing::debug!(%path, "request received");
    let response = respond(&path)?;
    stream.write_all(&response).await?;
    stream.shutdown().await
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deferred_writer=debug,serve=debug".into()),
        )
        .init();

    let addr = std::env::var("DEFERRED_WRITER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %listener.local_addr()?, "listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        tokio::spawn(async move {
            if let Err(error) = process_socket(stream).await {
                tracing::warn!(%peer, %error, "connection failed");
            }
            tracing::debug!(%peer, "connection closed");
        });
    }
}
