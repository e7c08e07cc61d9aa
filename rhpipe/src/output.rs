use retrohost::{
    format::PixelFormat,
    frame::{rgb1555_to_rgb565, VideoFrame},
};
use std::fs::File;
use std::io::{self, BufWriter, Write};

pub struct OutputWriter {
    writer: Box<dyn Write>,
    container_format: Option<String>,
    frames_written: usize,
}

impl OutputWriter {
    pub fn new(outfile: &str, container: Option<&String>) -> io::Result<Self> {
        let writer: Box<dyn Write> = match outfile {
            "-" => Box::new(BufWriter::with_capacity(1024 * 1024, io::stdout())),
            "--" => Box::new(io::sink()),
            path => Box::new(BufWriter::with_capacity(1024 * 1024, File::create(path)?)),
        };

        Ok(OutputWriter {
            writer,
            container_format: container.cloned(),
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn write_frame(&mut self, frame: &VideoFrame) -> io::Result<()> {
        match self.container_format.as_deref() {
            Some("ppm") => self.write_ppm_frame(frame)?,
            Some(container) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Unsupported container format: {}", container),
                ));
            }
            None => self.write_raw_frame(frame)?,
        }
        self.frames_written += 1;
        Ok(())
    }

    /// One binary PPM image per frame, concatenated.
    fn write_ppm_frame(&mut self, frame: &VideoFrame) -> io::Result<()> {
        write!(self.writer, "P6\n{} {}\n255\n", frame.width(), frame.height())?;

        let mut line = Vec::with_capacity(frame.width() as usize * 3);
        for y in 0..frame.height() as usize {
            line.clear();
            let row = frame.row(y);
            match frame.format() {
                PixelFormat::Xrgb8888 => {
                    for px in row.chunks_exact(4) {
                        let px = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                        line.extend_from_slice(&[(px >> 16) as u8, (px >> 8) as u8, px as u8]);
                    }
                }
                PixelFormat::Rgb565 | PixelFormat::Rgb1555 => {
                    for px in row.chunks_exact(2) {
                        let mut px = u16::from_ne_bytes([px[0], px[1]]);
                        if frame.format() == PixelFormat::Rgb1555 {
                            px = rgb1555_to_rgb565(px);
                        }
                        line.extend_from_slice(&rgb565_to_rgb24(px));
                    }
                }
            }
            self.writer.write_all(&line)?;
        }
        Ok(())
    }

    fn write_raw_frame(&mut self, frame: &VideoFrame) -> io::Result<()> {
        for y in 0..frame.height() as usize {
            self.writer.write_all(frame.row(y))?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn rgb565_to_rgb24(px: u16) -> [u8; 3] {
    let r = ((px >> 11) & 0x1f) as u8;
    let g = ((px >> 5) & 0x3f) as u8;
    let b = (px & 0x1f) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}
