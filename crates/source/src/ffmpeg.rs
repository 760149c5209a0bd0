//! `ffmpeg` sidecar source.
//!
//! ffmpeg decodes whatever the source is (v4l2/avfoundation device, file,
//! URL), scales it to the configured capture size and writes packed `bgr24`
//! frames to stdout. Every frame is exactly `width * height * 3` bytes, so
//! reading is a plain `read_exact` per frame.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::thread;

use log::{debug, info, warn};

use crate::core::{FrameError, RasterFrame};
use crate::types::{
    ChannelOrder, SourceRef, CHANNELS, DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH,
};
use crate::{FrameSource, SourceError};

/// Channel order ffmpeg is asked to emit. Kept in the capture device's native
/// order; the frame adapter converts after downscaling.
const CAPTURE_ORDER: ChannelOrder = ChannelOrder::Bgr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// ffmpeg executable.
    pub ffmpeg: PathBuf,
    pub capture_width: u32,
    pub capture_height: u32,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            capture_width: DEFAULT_CAPTURE_WIDTH,
            capture_height: DEFAULT_CAPTURE_HEIGHT,
        }
    }
}

impl SourceOptions {
    /// Bytes in one raw frame.
    pub fn frame_len(&self) -> usize {
        self.capture_width as usize * self.capture_height as usize * CHANNELS
    }
}

/// Input-side ffmpeg arguments for a source.
fn input_args(source: &SourceRef) -> Result<Vec<OsString>, SourceError> {
    let args: Vec<String> = match source {
        SourceRef::DevicePath(path) => vec!["-i".into(), path.clone()],
        SourceRef::DeviceIndex(index) => device_input_args(*index)?,
    };
    Ok(args.into_iter().map(OsString::from).collect())
}

#[cfg(target_os = "linux")]
fn device_input_args(index: i32) -> Result<Vec<String>, SourceError> {
    Ok(vec![
        "-f".into(),
        "v4l2".into(),
        "-i".into(),
        format!("/dev/video{index}"),
    ])
}

#[cfg(target_os = "macos")]
fn device_input_args(index: i32) -> Result<Vec<String>, SourceError> {
    Ok(vec![
        "-f".into(),
        "avfoundation".into(),
        "-framerate".into(),
        "30".into(),
        "-i".into(),
        index.to_string(),
    ])
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn device_input_args(_index: i32) -> Result<Vec<String>, SourceError> {
    Err(SourceError::Unsupported)
}

/// Full ffmpeg argument list for reading `source` as raw frames on stdout.
pub fn ffmpeg_args(
    source: &SourceRef,
    opts: &SourceOptions,
) -> Result<Vec<OsString>, SourceError> {
    let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-nostdin"]
        .iter()
        .map(OsString::from)
        .collect();
    args.extend(input_args(source)?);
    for arg in [
        "-an".to_string(),
        "-vf".to_string(),
        format!("scale={}:{}", opts.capture_width, opts.capture_height),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        CAPTURE_ORDER.as_str().to_string(),
        "-".to_string(),
    ] {
        args.push(OsString::from(arg));
    }
    Ok(args)
}

pub struct FfmpegSource {
    child: Child,
    stdout: ChildStdout,
    width: usize,
    height: usize,
    frame_len: usize,
    /// First frame, read during `open` to prove the source works.
    pending: Option<RasterFrame>,
    exhausted: bool,
}

impl FfmpegSource {
    /// Start ffmpeg and wait for the first complete frame.
    pub fn open(source: &SourceRef, opts: &SourceOptions) -> Result<Self, SourceError> {
        let args = ffmpeg_args(source, opts)?;
        let program = opts.ffmpeg.display().to_string();
        debug!("spawning {program} {args:?}");

        let mut child = Command::new(&opts.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SourceError::Spawn {
                program: program.clone(),
                source,
            })?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SourceError::Unavailable {
                target: source.to_string(),
                detail: format!("{program} pipes were not captured"),
            });
        };

        let mut this = Self {
            child,
            stdout,
            width: opts.capture_width as usize,
            height: opts.capture_height as usize,
            frame_len: opts.frame_len(),
            pending: None,
            exhausted: false,
        };

        match this.read_frame() {
            Ok(frame) => {
                this.pending = Some(frame);
                spawn_stderr_drain(stderr);
                info!(
                    "opened {source} via {program} at {}x{}",
                    this.width, this.height
                );
                Ok(this)
            }
            Err(err) => {
                let _ = this.child.kill();
                let status = this.child.wait().ok();
                let mut detail = String::new();
                let _ = BufReader::new(stderr).read_to_string(&mut detail);
                let detail = match (detail.trim(), status) {
                    ("", Some(status)) => format!("{program} exited with {status} ({err})"),
                    ("", None) => err.to_string(),
                    (text, _) => text.to_string(),
                };
                Err(SourceError::Unavailable {
                    target: source.to_string(),
                    detail,
                })
            }
        }
    }

    fn read_frame(&mut self) -> std::io::Result<RasterFrame> {
        let mut data = vec![0u8; self.frame_len];
        self.stdout.read_exact(&mut data)?;
        RasterFrame::new(self.width, self.height, CAPTURE_ORDER, data)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e))
    }
}

impl FrameSource for FfmpegSource {
    fn next_frame(&mut self) -> Result<RasterFrame, FrameError> {
        if let Some(frame) = self.pending.take() {
            return Ok(frame);
        }
        if self.exhausted {
            return Err(FrameError::EmptyFrame);
        }
        match self.read_frame() {
            Ok(frame) => Ok(frame),
            Err(err) => {
                if err.kind() == ErrorKind::UnexpectedEof {
                    info!("video stream ended");
                } else {
                    warn!("frame read failed: {err}");
                }
                self.exhausted = true;
                Err(FrameError::EmptyFrame)
            }
        }
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_stderr_drain(stderr: ChildStderr) {
    let spawned = thread::Builder::new()
        .name("ffmpeg-stderr".into())
        .spawn(move || {
            for line in BufReader::new(stderr).lines() {
                match line {
                    Ok(line) if !line.trim().is_empty() => warn!("ffmpeg: {line}"),
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        });
    if let Err(err) = spawned {
        warn!("could not start ffmpeg stderr reader: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_as_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn path_source_reads_raw_bgr_at_capture_size() {
        let opts = SourceOptions {
            capture_width: 320,
            capture_height: 240,
            ..SourceOptions::default()
        };
        let args = args_as_strings(
            ffmpeg_args(&SourceRef::DevicePath("clip.mp4".into()), &opts).unwrap(),
        );
        let joined = args.join(" ");
        assert!(joined.contains("-i clip.mp4"));
        assert!(joined.contains("-vf scale=320:240"));
        assert!(joined.contains("-f rawvideo -pix_fmt bgr24"));
        assert_eq!(args.last().map(String::as_str), Some("-"));
        assert_eq!(opts.frame_len(), 320 * 240 * 3);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn device_index_maps_to_v4l2_node() {
        let args = args_as_strings(
            ffmpeg_args(&SourceRef::DeviceIndex(2), &SourceOptions::default()).unwrap(),
        );
        assert!(args.join(" ").contains("-f v4l2 -i /dev/video2"));

        let args = args_as_strings(
            ffmpeg_args(&SourceRef::DeviceIndex(-1), &SourceOptions::default()).unwrap(),
        );
        assert!(args.join(" ").contains("-i /dev/video-1"));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let opts = SourceOptions {
            ffmpeg: PathBuf::from("/nonexistent/halfcam-ffmpeg"),
            ..SourceOptions::default()
        };
        let err = FfmpegSource::open(&SourceRef::DevicePath("x".into()), &opts)
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn process_that_exits_early_is_unavailable() {
        // `false` ignores its arguments and exits without writing a frame.
        let opts = SourceOptions {
            ffmpeg: PathBuf::from("false"),
            capture_width: 4,
            capture_height: 4,
        };
        let err = FfmpegSource::open(&SourceRef::DevicePath("x".into()), &opts)
            .err()
            .unwrap();
        match err {
            SourceError::Unavailable { target, .. } => assert_eq!(target, "x"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
