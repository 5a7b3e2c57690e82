use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::{FrameReceiver, StreamInterface, TransportConfig};

/// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
#[cfg(target_os = "linux")]
const MAX_PATH_LEN: usize = 108;
#[cfg(not(target_os = "linux"))]
const MAX_PATH_LEN: usize = 104;

/// Connect to a co-processor bridge listening on a Unix domain socket.
///
/// Returns the receiving and sending halves over the same connection, with
/// the configured timeouts applied.
pub fn connect(
    path: impl AsRef<Path>,
    config: &TransportConfig,
) -> Result<(FrameReceiver<UnixStream>, StreamInterface<UnixStream>)> {
    let path = path.as_ref();

    let path_bytes = path.as_os_str().len();
    if path_bytes >= MAX_PATH_LEN {
        return Err(TransportError::PathTooLong {
            path: path.to_path_buf(),
            len: path_bytes,
            max: MAX_PATH_LEN,
        });
    }

    let stream = UnixStream::connect(path).map_err(|e| TransportError::Connect {
        path: path.to_path_buf(),
        source: e,
    })?;
    stream.set_read_timeout(config.read_timeout)?;
    stream.set_write_timeout(config.write_timeout)?;
    let reader = stream.try_clone()?;
    debug!(?path, "connected to co-processor bridge");

    Ok((
        FrameReceiver::with_config(reader, config),
        StreamInterface::with_config(stream, config),
    ))
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::os::unix::net::UnixListener;
    use std::path::PathBuf;
    use std::thread;

    use super::*;
    use crate::traits::SpinelInterface;

    fn unique_socket_path(tag: &str) -> PathBuf {
        PathBuf::from(format!("/tmp/ncpspinel-{tag}-{}.sock", std::process::id()))
    }

    #[test]
    fn connect_rejects_long_path() {
        let long = "/tmp/".to_string() + &"x".repeat(200);
        let Err(err) = connect(&long, &TransportConfig::default()) else {
            panic!("long path should be rejected");
        };
        assert!(matches!(err, TransportError::PathTooLong { .. }));
    }

    #[test]
    fn connect_missing_socket_fails() {
        let Err(err) = connect(unique_socket_path("missing"), &TransportConfig::default()) else {
            panic!("missing socket should not connect");
        };
        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[test]
    fn frames_flow_both_ways() {
        let path = unique_socket_path("roundtrip");
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 6];
            stream.read_exact(&mut request).unwrap();
            stream.write_all(&[0x04, 0x00, 0x81, 0x06, 0x42, 0x01]).unwrap();
            request
        });

        let (mut receiver, mut interface) = connect(&path, &TransportConfig::default()).unwrap();
        interface.send_frame(&[0x81, 0x03, 0x42, 0x01]).unwrap();
        let reply = receiver.read_frame().unwrap();

        assert_eq!(reply.as_ref(), &[0x81, 0x06, 0x42, 0x01]);
        assert_eq!(
            server.join().unwrap(),
            [0x04, 0x00, 0x81, 0x03, 0x42, 0x01]
        );
        let _ = std::fs::remove_file(&path);
    }
}
