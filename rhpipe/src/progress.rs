use std::io::{self, Write};
use std::time::Instant;

/// Tracks emulated frames against the frames the core actually rendered.
pub struct ProgressTracker {
    total_frames: usize,
    written: usize,
    duped: usize,
    start_time: Instant,
    last_update: Instant,
    verbose: bool,
}

impl ProgressTracker {
    pub fn new(total_frames: usize, verbose: bool) -> Self {
        let now = Instant::now();
        ProgressTracker {
            total_frames,
            written: 0,
            duped: 0,
            start_time: now,
            last_update: now,
            verbose,
        }
    }

    pub fn frame_written(&mut self) {
        self.written += 1;
    }

    /// The core ran a frame without rendering a new one.
    pub fn frame_duped(&mut self) {
        self.duped += 1;
    }

    pub fn update(&mut self, completed_frames: usize) {
        let now = Instant::now();

        // Only update progress every 100ms to avoid spam
        if now.duration_since(self.last_update).as_millis() < 100
            && completed_frames < self.total_frames
        {
            return;
        }

        self.last_update = now;

        let elapsed = now.duration_since(self.start_time).as_secs_f64();
        let progress = completed_frames as f64 / self.total_frames.max(1) as f64;
        let fps = if elapsed > 0.0 { completed_frames as f64 / elapsed } else { 0.0 };
        let eta = if fps > 0.0 {
            self.total_frames.saturating_sub(completed_frames) as f64 / fps
        } else {
            0.0
        };

        if self.verbose {
            eprint!(
                "\rFrame {} of {} ({}%) {:.2} fps, {} dupes, eta {:.0}s",
                completed_frames,
                self.total_frames,
                (progress * 100.0) as u32,
                fps,
                self.duped,
                eta
            );

            let _ = io::stderr().flush();
        }
    }

    pub fn finish(&mut self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let ran = self.written + self.duped;
        let fps = if elapsed > 0.0 { ran as f64 / elapsed } else { 0.0 };

        eprintln!(
            "\rRan {} frames in {:.2}s ({:.2} fps), wrote {} ({} dupes)",
            ran, elapsed, fps, self.written, self.duped
        );
    }
}
