use anyhow::{anyhow, Context};
use log::{debug, warn};
use std::io::{ErrorKind, Read};
use std::process::{Child, ChildStdout, Command, Stdio};
use targetcore::interface::Frame;
use targetcore::orchestrator::FrameSource;
use targetcore::prelude::{StageError, StageResult};

/// Reads raw RGB frames from an `ffmpeg` child process.
///
/// ffmpeg does the decoding and scaling, so every frame arrives at the
/// session size.
pub struct FfmpegCapture {
    child: Child,
    stdout: ChildStdout,
    width: usize,
    height: usize,
    label: String,
    live: bool,
}

impl FfmpegCapture {
    /// Opens `/dev/video{index}` through video4linux2.
    pub fn device(index: u32, width: usize, height: usize) -> anyhow::Result<Self> {
        let uri = format!("/dev/video{}", index);
        let mut cmd = base_command();
        cmd.arg("-f").arg("video4linux2").arg("-i").arg(&uri);
        Self::spawn(cmd, uri, width, height)
    }

    /// Opens a network stream URL (MJPEG over HTTP, RTSP, ...).
    pub fn stream(url: &str, width: usize, height: usize) -> anyhow::Result<Self> {
        let mut cmd = base_command();
        if url.starts_with("rtsp://") {
            cmd.arg("-rtsp_transport").arg("tcp");
        }
        cmd.arg("-fflags")
            .arg("nobuffer")
            .arg("-flags")
            .arg("low_delay")
            .arg("-i")
            .arg(url);
        Self::spawn(cmd, url.to_string(), width, height)
    }

    fn spawn(mut cmd: Command, label: String, width: usize, height: usize) -> anyhow::Result<Self> {
        cmd.arg("-an")
            .arg("-vf")
            .arg(format!("scale={}:{}", width, height))
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("-f")
            .arg("rawvideo")
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        debug!("spawning {:?}", cmd);
        let mut child = cmd.spawn().context("spawning ffmpeg")?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("failed to capture ffmpeg stdout"))?;

        Ok(Self {
            child,
            stdout,
            width,
            height,
            label,
            live: true,
        })
    }
}

fn base_command() -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-hide_banner").arg("-loglevel").arg("error");
    cmd
}

impl FrameSource for FfmpegCapture {
    fn next_frame(&mut self) -> StageResult<Option<Frame>> {
        let mut buffer = vec![0u8; self.width * self.height * 3];
        match self.stdout.read_exact(&mut buffer) {
            Ok(()) => Frame::from_rgb(self.width, self.height, buffer).map(Some),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                self.live = false;
                Ok(None)
            }
            Err(err) => {
                self.live = false;
                Err(StageError::SourceUnavailable(format!(
                    "reading {}: {}",
                    self.label, err
                )))
            }
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn describe(&self) -> String {
        format!("ffmpeg capture {} ({}x{})", self.label, self.width, self.height)
    }
}

impl Drop for FfmpegCapture {
    fn drop(&mut self) {
        if let Err(err) = self.child.kill() {
            if err.kind() != ErrorKind::InvalidInput {
                warn!("stopping ffmpeg for {}: {}", self.label, err);
            }
        }
        let _ = self.child.wait();
    }
}
