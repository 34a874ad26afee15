use crate::Error;
use rustc_hash::FxHashMap;
use std::io::{BufRead, BufReader, Read};

const BOM: &[u8] = &[0xef, 0xbb, 0xbf];

/// Drops the spaces and tabs following a delimiter or a line break
///
/// Runs before the csv tokenizer so that `a, "b, c"` is read as a quoted field,
/// while the content of quoted fields is left untouched.
struct LeadingSpaceTrimmer<R> {
    inner: R,
    field_start: bool,
    quoted: bool,
    in_quotes: bool,
}

impl<R: Read> LeadingSpaceTrimmer<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            field_start: true,
            quoted: false,
            in_quotes: false,
        }
    }

    /// Is the byte kept
    fn keep(&mut self, b: u8) -> bool {
        if self.field_start {
            match b {
                b' ' | b'\t' => return false,
                b'"' => {
                    self.field_start = false;
                    self.quoted = true;
                    self.in_quotes = true;
                    return true;
                }
                _ => {
                    self.field_start = false;
                    self.quoted = false;
                }
            }
        } else if self.quoted && b == b'"' {
            // `""` inside a quoted field toggles twice
            self.in_quotes = !self.in_quotes;
            return true;
        }
        if !self.in_quotes && matches!(b, b',' | b'\n' | b'\r') {
            self.field_start = true;
        }
        true
    }
}

impl<R: Read> Read for LeadingSpaceTrimmer<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }
            let mut kept = 0;
            for i in 0..n {
                let b = buf[i];
                if self.keep(b) {
                    buf[kept] = b;
                    kept += 1;
                }
            }
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

/// Streams the rows of one GTFS file
///
/// The first row is the header. Every following row is exposed as a [Record],
/// read lazily one at a time with [RecordReader::next_record].
///
/// ```
/// let data = "stop_id,stop_name\nS1, \"Main St, North\"\n";
/// let mut reader = gtfs_feed::RecordReader::new(data.as_bytes(), "stops.txt")?;
/// let record = reader.next_record()?.expect("one row");
/// assert_eq!(Some("Main St, North"), record.get("stop_name"));
/// assert_eq!(2, record.line());
/// # Ok::<(), gtfs_feed::Error>(())
/// ```
pub struct RecordReader<R: Read> {
    reader: csv::Reader<LeadingSpaceTrimmer<BufReader<R>>>,
    file_name: String,
    headers: Vec<String>,
    columns: FxHashMap<String, usize>,
    row: csv::StringRecord,
    line: u64,
}

impl<R: Read> RecordReader<R> {
    /// Wraps a byte stream and reads its header row
    pub fn new(stream: R, file_name: &str) -> Result<Self, Error> {
        let mut buffered = BufReader::new(stream);
        let has_bom = buffered
            .fill_buf()
            .map_err(|e| Error::NamedFileIO {
                file_name: file_name.to_owned(),
                source: Box::new(e),
            })?
            .starts_with(BOM);
        if has_bom {
            buffered.consume(BOM.len());
        }

        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(LeadingSpaceTrimmer::new(buffered));

        let mut result = Self {
            reader,
            file_name: file_name.to_owned(),
            headers: Vec::new(),
            columns: FxHashMap::default(),
            row: csv::StringRecord::new(),
            line: 0,
        };
        if result.read_row()? {
            result.headers = result
                .row
                .iter()
                .map(str::to_owned)
                .collect();
            result.columns = result
                .headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), i))
                .collect();
        }
        Ok(result)
    }

    /// Column names, in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Name of the file being read
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Line of the last row read, the header being line 1
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Reads the next data row, `None` at the end of the stream
    pub fn next_record(&mut self) -> Result<Option<Record<'_>>, Error> {
        if self.headers.is_empty() || !self.read_row()? {
            return Ok(None);
        }
        Ok(Some(Record {
            columns: &self.columns,
            values: &self.row,
            line: self.line,
        }))
    }

    fn read_row(&mut self) -> Result<bool, Error> {
        self.line += 1;
        self.reader
            .read_record(&mut self.row)
            .map_err(|e| Error::Csv {
                file_name: self.file_name.clone(),
                line: self.line,
                source: e,
            })
    }
}

/// One data row of a GTFS file, addressed by column name
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a FxHashMap<String, usize>,
    values: &'a csv::StringRecord,
    line: u64,
}

impl<'a> Record<'a> {
    /// Raw value of a column, without the whitespace following its delimiter
    ///
    /// `None` if the header has no such column, `Some("")` if the row is too short to hold it.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = *self.columns.get(column)?;
        Some(self.values.get(index).unwrap_or(""))
    }

    /// Line of this record in its file
    pub fn line(&self) -> u64 {
        self.line
    }
}
