use env_logger::{Env, Target};
use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Writes log records to a file, mirroring them to stdout when it is a terminal
struct LogSink<W: Write> {
    file: File,
    mirror: Option<W>,
}

impl<W: Write> Write for LogSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        if let Some(out) = self.mirror.as_mut() {
            out.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if let Some(out) = self.mirror.as_mut() {
            out.flush()?;
        }
        Ok(())
    }
}

/// Initialize logging; `RUST_LOG` overrides the default `info` level
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let stdout = io::stdout();
        let mirror = stdout.is_terminal().then_some(stdout);
        builder.target(Target::Pipe(Box::new(LogSink { file, mirror })));
    }

    builder.init();
    Ok(())
}
