use std::io::{BufRead, BufReader, BufWriter, Write};

/// Open `input` for buffered reading; `stdin` reads the standard input and
/// a `.gz` extension decompresses transparently.
///
/// ```
/// use std::io::BufRead;
/// let reader = gffpep::reader("tests/extract/genes.gff");
/// assert_eq!(reader.lines().collect::<Vec<_>>().len(), 7);
/// ```
pub fn reader(input: &str) -> Box<dyn BufRead> {
    if input == "stdin" {
        return Box::new(BufReader::new(std::io::stdin()));
    }

    let path = std::path::Path::new(input);
    let file = match std::fs::File::open(path) {
        Err(why) => panic!("could not open {}: {}", path.display(), why),
        Ok(file) => file,
    };

    if path.extension() == Some(std::ffi::OsStr::new("gz")) {
        Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    }
}

/// Open `output` for buffered writing; `stdout` writes to the screen.
pub fn writer(output: &str) -> Box<dyn Write> {
    if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        Box::new(BufWriter::new(std::fs::File::create(output).unwrap()))
    }
}
