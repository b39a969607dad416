/// Splits written output into lines and hands each one to a callback.
pub struct LineWriter<F: FnMut(&str)> {
    buf: Vec<u8>,
    f: F,
}

impl<F: FnMut(&str)> LineWriter<F> {
    pub fn new(f: F) -> Self {
        Self { buf: vec![], f }
    }
}

impl<F: FnMut(&str)> std::io::Write for LineWriter<F> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(buf);
        while let Some(i) = self.buf.iter().position(|b| *b == b'\n') {
            let line = self.buf.drain(..=i).collect::<Vec<_>>();
            (self.f)(String::from_utf8_lossy(&line[..i]).trim_end_matches('\r'));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.buf.is_empty() {
            let line = std::mem::take(&mut self.buf);
            (self.f)(&String::from_utf8_lossy(&line));
        }
        Ok(())
    }
}

/// Installs the logger, sending each formatted line to `sink`. Does nothing if a logger is already installed.
pub fn init(sink: impl FnMut(&str) + Send + 'static) {
    if env_logger::Builder::from_default_env()
        .filter(Some("ark_auto_bosses"), log::LevelFilter::Info)
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(LineWriter::new(sink))))
        .try_init()
        .is_err()
    {
        log::warn!("logger was already initialized");
    }
}
