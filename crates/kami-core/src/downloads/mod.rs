use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use futures_util::stream::{Stream, StreamExt, TryStreamExt};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

use crate::{
    consts::IDLE_TIMEOUT,
    error::{Error, Result},
    http::{network_error, HttpClient},
};

pub mod progress;

pub use progress::{NoProgress, ProgressSink};

/// Path the body is written to before it is renamed onto `path`.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".part");
    path.with_file_name(name)
}

/// Streams `url` into `path`, reporting every chunk to `progress`.
///
/// The body lands in [`partial_path`] first and is only renamed onto `path`
/// once it was fully written, so an interrupted download never looks like a
/// finished one. Returns the number of bytes written.
pub async fn download_file(
    client: &HttpClient,
    url: &str,
    path: &Path,
    progress: &dyn ProgressSink,
) -> Result<u64> {
    let response = client.send(url, false).await?;
    let expected = response.content_length();

    let stream = response
        .bytes_stream()
        .map_err(|source| network_error(url, source));

    write_stream(stream, url, expected, path, progress).await
}

pub(crate) async fn write_stream<S, B>(
    stream: S,
    url: &str,
    expected: Option<u64>,
    path: &Path,
    progress: &dyn ProgressSink,
) -> Result<u64>
where
    S: Stream<Item = Result<B>>,
    B: AsRef<[u8]>,
{
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(Error::io(dir))?;
    }

    let partial = partial_path(path);

    let result = copy_to_partial(stream, url, expected, &partial, progress).await;
    progress.finish();

    match result {
        Ok(written) => {
            tokio::fs::rename(&partial, path)
                .await
                .map_err(Error::io(path))?;

            debug!("Downloaded successfully {}", path.to_string_lossy());

            Ok(written)
        }
        Err(err) => {
            error!("Error occurred during downloading {url}\nError: {err}");

            if let Err(remove) = tokio::fs::remove_file(&partial).await {
                warn!(
                    "Could not remove partial download {}: {remove}",
                    partial.to_string_lossy()
                );
            }

            Err(err)
        }
    }
}

async fn copy_to_partial<S, B>(
    stream: S,
    url: &str,
    expected: Option<u64>,
    partial: &Path,
    progress: &dyn ProgressSink,
) -> Result<u64>
where
    S: Stream<Item = Result<B>>,
    B: AsRef<[u8]>,
{
    let mut file = tokio::fs::File::create(partial)
        .await
        .map_err(Error::io(partial))?;

    progress.begin(expected);

    let mut stream = std::pin::pin!(stream);
    let mut written = 0u64;

    loop {
        let next = tokio::time::timeout(IDLE_TIMEOUT, stream.next())
            .await
            .map_err(|_| Error::Timeout {
                url: url.to_owned(),
            })?;

        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk?;
        let chunk = chunk.as_ref();

        file.write_all(chunk).await.map_err(Error::io(partial))?;

        written += chunk.len() as u64;
        progress.advance(chunk.len() as u64);
    }

    file.flush().await.map_err(Error::io(partial))?;

    if let Some(expected) = expected.filter(|&expected| expected != written) {
        return Err(Error::Truncated {
            url: url.to_owned(),
            expected,
            received: written,
        });
    }

    Ok(written)
}
