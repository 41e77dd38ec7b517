use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use csv::QuoteStyle;
use flate2::{write::GzEncoder, Compression};

use crate::writer::MatsimWriterError;

/// helper function to "mkdir -p path" - make all directories along a path
pub fn create_dirs<P>(path: P) -> Result<(), MatsimWriterError>
where
    P: AsRef<Path>,
{
    let dirspath = path.as_ref();
    if dirspath.as_os_str().is_empty() || dirspath.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dirspath).map_err(|e| {
        let msg = format!(
            "error building output directory '{}': {e}",
            dirspath.to_str().unwrap_or_default()
        );
        MatsimWriterError::InvalidUserInput(msg)
    })
}

/// destination of an output file, gzip compressed or plain.
pub enum OutputSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputSink {
    /// creates (or truncates) the file at `path`.
    pub fn create(path: &Path, compress: bool) -> Result<Self, MatsimWriterError> {
        let file = File::create(path).map_err(|e| MatsimWriterError::WriteError {
            path: path.to_owned(),
            message: format!("unable to create file: {e}"),
        })?;
        let buffer = BufWriter::new(file);
        if compress {
            Ok(OutputSink::Gzip(GzEncoder::new(buffer, Compression::default())))
        } else {
            Ok(OutputSink::Plain(buffer))
        }
    }

    /// flushes buffered content and writes the gzip trailer when compressing.
    pub fn finish(self, path: &Path) -> Result<(), MatsimWriterError> {
        let to_error = |e: std::io::Error| MatsimWriterError::WriteError {
            path: path.to_owned(),
            message: format!("unable to finish file: {e}"),
        };
        let mut buffer = match self {
            OutputSink::Plain(buffer) => buffer,
            OutputSink::Gzip(encoder) => encoder.finish().map_err(to_error)?,
        };
        buffer.flush().map_err(to_error)
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            OutputSink::Plain(w) => w.write(buf),
            OutputSink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            OutputSink::Plain(w) => w.flush(),
            OutputSink::Gzip(w) => w.flush(),
        }
    }
}

/// csv writer over an [OutputSink] that keeps track of the file it writes to.
pub struct CsvOutput {
    path: PathBuf,
    writer: csv::Writer<OutputSink>,
}

impl CsvOutput {
    pub fn create(path: &Path, delimiter: u8, compress: bool) -> Result<Self, MatsimWriterError> {
        let sink = OutputSink::create(path, compress)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(sink);
        Ok(Self {
            path: path.to_owned(),
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_record<I, T>(&mut self, record: I) -> Result<(), MatsimWriterError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(record).map_err(|e| {
            MatsimWriterError::CsvWriteError(format!(
                "Failed to write to {}: {e}",
                self.path.display()
            ))
        })
    }

    pub fn finish(self) -> Result<(), MatsimWriterError> {
        let CsvOutput { path, writer } = self;
        let sink = writer.into_inner().map_err(|e| {
            MatsimWriterError::CsvWriteError(format!("Failed to flush {}: {e}", path.display()))
        })?;
        sink.finish(&path)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;

    #[test]
    fn test_gzip_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt.gz");
        let mut sink = OutputSink::create(&path, true).unwrap();
        sink.write_all(b"hello").unwrap();
        sink.finish(&path).unwrap();

        let mut decoded = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn test_create_dirs_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        create_dirs(&nested).unwrap();
        assert!(nested.is_dir());
        create_dirs(&nested).unwrap();
    }

    #[test]
    fn test_tab_separated_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geometry.csv");
        let mut csv = CsvOutput::create(&path, b'\t', false).unwrap();
        csv.write_record(["LINK_ID", "GEOMETRY"]).unwrap();
        csv.write_record(["1", "LINESTRING(1 2,3 4)"]).unwrap();
        csv.finish().unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "LINK_ID\tGEOMETRY\n1\tLINESTRING(1 2,3 4)\n");
    }
}
