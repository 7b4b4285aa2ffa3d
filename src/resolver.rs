//! Turns an image reference into its bytes plus [`ImageInfo`].
//!
//! Both sources push their bytes through a [`HeaderProbe`] in blocks of
//! [`BLOCK_SIZE`], which learns the pixel dimensions as soon as the buffered
//! prefix holds the image header.

use crate::error::ImageError;
use crate::image_info::ImageInfo;
use image::ImageReader;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::fs::File;
use std::io::Cursor;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use std::time::Instant;
use tracing::Instrument;
use tracing::Level;
use tracing::debug;
use tracing::field::Empty;
use tracing::span;

pub const BLOCK_SIZE: usize = 1024;

/// Dimensions must be readable from this many leading bytes.
pub const PROBE_LIMIT: usize = 1024 * 1024;

/// Bytes of an image together with what is known about it.
#[derive(Clone, Debug)]
pub struct ResolvedImage {
    pub bytes: Vec<u8>,
    pub info: ImageInfo,
}

#[derive(Debug, Default)]
enum ProbeState {
    #[default]
    Pending,
    Parsed,
    /// The header is invalid and more bytes will not change that
    Failed(image::ImageError),
    /// No known format in the probed prefix
    Unrecognised,
}

/// Buffers incoming bytes and reports dimensions once the header has arrived.
///
/// The header is re-parsed each time the buffer has doubled since the last
/// attempt, so a body that never yields a header costs linear time. Probing
/// stops for good at [`PROBE_LIMIT`] bytes or on an error more data cannot fix.
#[derive(Debug, Default)]
pub struct HeaderProbe {
    buffer: Vec<u8>,
    info: ImageInfo,
    state: ProbeState,
    next_probe_at: usize,
}

impl HeaderProbe {
    #[must_use]
    pub fn new(size_bytes: Option<u64>) -> Self {
        HeaderProbe {
            info: ImageInfo {
                size_bytes,
                ..ImageInfo::default()
            },
            ..HeaderProbe::default()
        }
    }

    /// Append a block. Returns true once the dimensions are known.
    pub fn feed(&mut self, block: &[u8]) -> bool {
        self.buffer.extend_from_slice(block);
        let len = self.buffer.len();
        if matches!(self.state, ProbeState::Pending)
            && (len >= self.next_probe_at || len >= PROBE_LIMIT)
        {
            self.probe(len >= PROBE_LIMIT);
        }
        matches!(self.state, ProbeState::Parsed)
    }

    fn probe(&mut self, last_attempt: bool) {
        let window = &self.buffer[..self.buffer.len().min(PROBE_LIMIT)];
        match read_dimensions(window) {
            Ok(dimensions) => {
                self.info.set_dimensions(dimensions);
                self.state = ProbeState::Parsed;
                debug!(
                    width = dimensions.0,
                    height = dimensions.1,
                    buffered = self.buffer.len(),
                    "Image header parsed"
                );
            }
            Err(Some(source)) if last_attempt || !more_bytes_may_help(&source) => {
                debug!(buffered = self.buffer.len(), "Image header invalid: {}", source);
                self.state = ProbeState::Failed(source);
            }
            Err(None) if last_attempt => self.state = ProbeState::Unrecognised,
            Err(_) => {}
        }
        self.next_probe_at = self.buffer.len().saturating_mul(2);
    }

    #[must_use]
    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Close the probe after the last block.
    ///
    /// A size that was never announced is taken from the buffered length.
    ///
    /// # Errors
    ///
    /// Returns an error if the probed prefix never yielded dimensions.
    pub fn finish(mut self, origin: &str) -> Result<ResolvedImage, ImageError> {
        if matches!(self.state, ProbeState::Pending) {
            self.probe(true);
        }
        match self.state {
            ProbeState::Parsed => {}
            ProbeState::Failed(source) => {
                return Err(ImageError::Decode {
                    origin: origin.to_string(),
                    source,
                });
            }
            ProbeState::Pending | ProbeState::Unrecognised => {
                return Err(ImageError::Truncated {
                    origin: origin.to_string(),
                });
            }
        }
        if self.info.size_bytes.is_none() {
            self.info.size_bytes = Some(self.buffer.len() as u64);
        }
        Ok(ResolvedImage {
            bytes: self.buffer,
            info: self.info,
        })
    }
}

/// Truncated headers surface as I/O or decoding errors; anything else is final.
fn more_bytes_may_help(error: &image::ImageError) -> bool {
    matches!(
        error,
        image::ImageError::IoError(_) | image::ImageError::Decoding(_)
    )
}

/// Dimensions from an image header. `Err(None)` when the format could not even be guessed.
fn read_dimensions(data: &[u8]) -> Result<(u32, u32), Option<image::ImageError>> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|_| None)?;
    if reader.format().is_none() {
        return Err(None);
    }
    reader.into_dimensions().map_err(Some)
}

/// Fetches images over HTTP.
#[derive(Clone, Debug)]
pub struct RemoteResolver {
    client: Client,
}

impl RemoteResolver {
    /// The client has no timeout: a slow server stalls only the message that linked it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> eyre::Result<Self> {
        let git_rev = option_env!("GIT_REVISION").unwrap_or("unknown");
        let user_agent = format!(
            "{} v{} (rev {})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            git_rev
        );
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(RemoteResolver { client })
    }

    /// Download `url`, learning its dimensions from the first blocks and buffering the rest.
    ///
    /// # Errors
    ///
    /// - [`ImageError::Fetch`] for transport failures and HTTP error statuses
    /// - [`ImageError::NotAnImage`] when the content type does not mention "image"
    /// - [`ImageError::Decode`] / [`ImageError::Truncated`] when no header could be read
    pub async fn resolve(&self, url: &str) -> Result<ResolvedImage, ImageError> {
        let span = span!(
            Level::DEBUG,
            "fetch_image",
            url,
            response_status = Empty,
            content_length = Empty,
        );
        let started = Instant::now();
        let fetch_error = |source| ImageError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .instrument(span.clone())
            .await
            .map_err(fetch_error)?;
        span.record("response_status", response.status().as_u16());
        let mut response = response.error_for_status().map_err(fetch_error)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("image") {
            return Err(ImageError::NotAnImage {
                url: url.to_string(),
                content_type,
            });
        }

        let content_length = response.content_length();
        if let Some(len) = content_length {
            span.record("content_length", len);
        }

        let mut probe = HeaderProbe::new(content_length);
        while let Some(chunk) = response
            .chunk()
            .instrument(span.clone())
            .await
            .map_err(fetch_error)?
        {
            for block in chunk.chunks(BLOCK_SIZE) {
                probe.feed(block);
            }
        }

        let elapsed = Duration::from_millis(
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        span.in_scope(|| {
            debug!(
                bytes = probe.buffered(),
                elapsed = %humantime::format_duration(elapsed),
                "Fetched image"
            );
        });
        probe.finish(url)
    }
}

/// Read a local image file, taking its size from the file system.
///
/// # Errors
///
/// Returns [`ImageError::Io`] if the file cannot be read, or a decode error
/// if its header cannot be parsed.
pub fn resolve_local(path: &Path) -> Result<ResolvedImage, ImageError> {
    let io_error = |source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(io_error)?;
    let size = file.metadata().map_err(io_error)?.len();

    let mut probe = HeaderProbe::new(Some(size));
    let mut block = [0u8; BLOCK_SIZE];
    loop {
        let read = file.read(&mut block).map_err(io_error)?;
        if read == 0 {
            break;
        }
        probe.feed(&block[..read]);
    }
    probe.finish(&path.display().to_string())
}
