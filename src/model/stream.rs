use std::time::Instant;

/// One event from the live-stream reader task.
#[derive(Debug)]
pub enum StreamEvent {
    /// A complete frame arrived. Frames are counted and sized, not decoded.
    Frame { len: usize },
    /// The stream broke: attach rejected, transport error, or a runaway part.
    Failed { detail: String },
    /// The server closed the stream.
    Ended,
}

/// Counters for the currently attached stream. Reset on every attach.
#[derive(Clone, Debug)]
pub struct StreamStats {
    pub frames: u64,
    pub bytes: u64,
    pub last_frame_len: usize,
    pub attached_at: Instant,
}

impl StreamStats {
    pub fn new() -> Self {
        Self {
            frames: 0,
            bytes: 0,
            last_frame_len: 0,
            attached_at: Instant::now(),
        }
    }

    pub fn record_frame(&mut self, len: usize) {
        self.frames += 1;
        self.bytes += len as u64;
        self.last_frame_len = len;
    }

    /// Average frames per second since attach.
    pub fn fps(&self) -> f64 {
        let secs = self.attached_at.elapsed().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.frames as f64 / secs
    }
}
