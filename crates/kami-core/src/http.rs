use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    consts::{user_agent, CONNECT_TIMEOUT, IDLE_TIMEOUT, REQUEST_TIMEOUT},
    error::{Error, Result},
};

/// Shared HTTP client. Every request carries the installer's `User-Agent`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_read_timeout(IDLE_TIMEOUT)
    }

    /// Client that gives up when a connection stays silent for `read_timeout`,
    /// whether it is waiting for the headers or for the next body chunk.
    pub fn with_read_timeout(read_timeout: Duration) -> Result<Self> {
        let inner = Client::builder()
            .user_agent(user_agent())
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(read_timeout)
            .build()
            .map_err(Error::ClientBuild)?;

        Ok(Self { inner })
    }

    /// Sends a GET request and checks the status.
    ///
    /// `404` becomes [`Error::NotFound`], every other non-success status a
    /// [`Error::Network`].
    pub(crate) async fn send(&self, url: &str, deadline: bool) -> Result<Response> {
        debug!(url, "GET");

        let mut request = self.inner.get(url);
        if deadline {
            request = request.timeout(REQUEST_TIMEOUT);
        }

        let response = request.send().await.map_err(|source| network_error(url, source))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                resource: url.to_owned(),
            });
        }

        response.error_for_status().map_err(|source| Error::Network {
            url: url.to_owned(),
            source,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self
            .send(url, true)
            .await?
            .text()
            .await
            .map_err(|source| network_error(url, source))?;

        decode_json(url, &body)
    }
}

pub(crate) fn network_error(url: &str, source: reqwest::Error) -> Error {
    if source.is_timeout() {
        Error::Timeout {
            url: url.to_owned(),
        }
    } else {
        Error::Network {
            url: url.to_owned(),
            source,
        }
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(body);

    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| Error::Decode {
        url: url.to_owned(),
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

/// Minimal HTTP/1.1 server on a local port for exercising the real client.
#[cfg(test)]
pub(crate) mod test_server {
    use std::sync::Arc;

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    pub(crate) enum Reply {
        Status(u16, &'static str),
        Body(Vec<u8>),
        /// Accepts the request and never answers.
        Stall,
    }

    /// Serves `routes` until the test runtime shuts down and returns the base
    /// URL. Unknown paths get a 404.
    pub(crate) async fn serve(routes: Vec<(&'static str, Reply)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(respond(socket, Arc::clone(&routes)));
            }
        });

        format!("http://{addr}")
    }

    async fn respond(mut socket: TcpStream, routes: Arc<Vec<(&'static str, Reply)>>) {
        let path = read_request_path(&mut socket).await;
        let reply = routes
            .iter()
            .find(|(route, _)| *route == path)
            .map(|(_, reply)| reply);

        match reply {
            Some(Reply::Stall) => std::future::pending::<()>().await,
            Some(Reply::Status(status, body)) => {
                write_response(&mut socket, *status, body.as_bytes()).await;
            }
            Some(Reply::Body(body)) => write_response(&mut socket, 200, body).await,
            None => write_response(&mut socket, 404, b"").await,
        }
    }

    async fn read_request_path(socket: &mut TcpStream) -> String {
        let mut request = Vec::new();
        let mut buffer = [0; 1024];

        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = socket.read(&mut buffer).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..read]);
        }

        String::from_utf8_lossy(&request)
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_owned()
    }

    async fn write_response(socket: &mut TcpStream, status: u16, body: &[u8]) {
        let head = format!(
            "HTTP/1.1 {status} Test\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        );

        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body).await.unwrap();
        socket.shutdown().await.unwrap();
    }
}
