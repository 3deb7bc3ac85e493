//! Draining one subprocess output stream into the update channel.

use crate::model::{RunEpoch, RunUpdate, StreamKind};
use std::io::{ErrorKind, Read};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Bytes requested per read call.
pub const CHUNK_SIZE: usize = 1024;

/// Read `reader` to end-of-stream, sending every non-empty chunk as a
/// [`RunUpdate::Output`], then a [`RunUpdate::StreamClosed`].
///
/// A read error ends the stream the same way end-of-file does. Returns the
/// number of bytes forwarded.
pub fn drain<R: Read>(
    mut reader: R,
    stream: StreamKind,
    epoch: RunEpoch,
    updates: &Sender<RunUpdate>,
) -> usize {
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut total = 0;

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                total += n;
                super::send(
                    updates,
                    RunUpdate::Output {
                        epoch,
                        bytes: buffer[..n].to_vec(),
                    },
                );
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(%epoch, %stream, error = %e, "Read error, closing stream");
                break;
            }
        }
    }

    debug!(%epoch, %stream, bytes = total, "Stream closed");
    super::send(updates, RunUpdate::StreamClosed { epoch, stream });
    total
}

/// Drain `reader` on its own thread.
pub fn spawn_reader<R>(
    reader: R,
    stream: StreamKind,
    epoch: RunEpoch,
    updates: Sender<RunUpdate>,
) -> JoinHandle<usize>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || drain(reader, stream, epoch, &updates))
}
