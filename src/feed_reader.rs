use crate::builders::{self, CalendarDate};
use crate::error::RecordError;
use crate::feed::Feed;
use crate::objects::Shape;
use crate::record_reader::{Record, RecordReader};
use crate::source::{ArchiveSource, DirectorySource, FeedSource};
use crate::Error;
use chrono::Utc;
use log::{debug, info};
use std::fmt;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// The files of a feed, in the order they are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedFile {
    /// `agency.txt`
    Agency,
    /// `stops.txt`
    Stops,
    /// `shapes.txt`
    Shapes,
    /// `routes.txt`
    Routes,
    /// `calendar.txt`
    Calendar,
    /// `calendar_dates.txt`
    CalendarDates,
    /// `trips.txt`
    Trips,
    /// `stop_times.txt`
    StopTimes,
    /// `fare_attributes.txt`
    FareAttributes,
    /// `fare_rules.txt`
    FareRules,
    /// `frequencies.txt`
    Frequencies,
    /// `transfers.txt`
    Transfers,
    /// `feed_info.txt`
    FeedInfo,
}

impl FeedFile {
    /// Every file, each one only referencing files read before it
    pub const LOAD_ORDER: [FeedFile; 13] = [
        FeedFile::Agency,
        FeedFile::Stops,
        FeedFile::Shapes,
        FeedFile::Routes,
        FeedFile::Calendar,
        FeedFile::CalendarDates,
        FeedFile::Trips,
        FeedFile::StopTimes,
        FeedFile::FareAttributes,
        FeedFile::FareRules,
        FeedFile::Frequencies,
        FeedFile::Transfers,
        FeedFile::FeedInfo,
    ];

    /// Name of the file in the feed
    pub fn file_name(self) -> &'static str {
        match self {
            FeedFile::Agency => "agency.txt",
            FeedFile::Stops => "stops.txt",
            FeedFile::Shapes => "shapes.txt",
            FeedFile::Routes => "routes.txt",
            FeedFile::Calendar => "calendar.txt",
            FeedFile::CalendarDates => "calendar_dates.txt",
            FeedFile::Trips => "trips.txt",
            FeedFile::StopTimes => "stop_times.txt",
            FeedFile::FareAttributes => "fare_attributes.txt",
            FeedFile::FareRules => "fare_rules.txt",
            FeedFile::Frequencies => "frequencies.txt",
            FeedFile::Transfers => "transfers.txt",
            FeedFile::FeedInfo => "feed_info.txt",
        }
    }

    /// Is the feed invalid without this file
    pub fn is_required(self) -> bool {
        matches!(
            self,
            FeedFile::Agency
                | FeedFile::Stops
                | FeedFile::Routes
                | FeedFile::Trips
                | FeedFile::StopTimes
        )
    }
}

impl fmt::Display for FeedFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Allows to parameterize how the feed is read
///
/// ```no_run
/// let feed = gtfs_feed::FeedReader::default()
///     .read_stop_times(false) // Won’t read the stop times to save time and memory
///     .read_from_path("fixtures/basic")?;
/// assert_eq!(0, feed.get_trip("trip1")?.stop_times.len());
/// # Ok::<(), gtfs_feed::Error>(())
/// ```
#[derive(Derivative, Debug, Clone)]
#[derivative(Default)]
pub struct FeedReader {
    /// [crate::StopTime] are very large and not always needed. This allows to skip reading them
    #[derivative(Default(value = "true"))]
    pub read_stop_times: bool,
    /// Should `shapes.txt` be read. When it is not, every [crate::Trip::shape] is `None`
    #[derivative(Default(value = "true"))]
    pub read_shapes: bool,
}

impl FeedReader {
    /// Configures the reader to read or not the stop times (default: true)
    ///
    /// This can be useful to save time and memory with large datasets when the timetable are not needed
    /// Returns Self and can be chained
    pub fn read_stop_times(mut self, read_stop_times: bool) -> Self {
        self.read_stop_times = read_stop_times;
        self
    }

    /// Configures the reader to read or not the shapes (default: true)
    ///
    /// When shapes are not read, the `shape_id` of trips is not checked
    pub fn read_shapes(mut self, read_shapes: bool) -> Self {
        self.read_shapes = read_shapes;
        self
    }

    /// Reads the GTFS from a local zip archive or local directory
    pub fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Feed, Error> {
        let p = path.as_ref();
        info!("reading GTFS from {}", p.display());
        let metadata = std::fs::metadata(p).map_err(|e| Error::SourceUnavailable {
            path: p.display().to_string(),
            source: e,
        })?;
        if metadata.is_dir() {
            self.read_from_source(DirectorySource::new(p))
        } else {
            self.read_from_source(ArchiveSource::from_path(p)?)
        }
    }

    /// Reads a zip archive from any object implementing [std::io::Read] and [std::io::Seek]
    ///
    /// Mostly an helper to read an archive held in memory
    pub fn read_from_reader<T: Read + Seek>(&self, reader: T) -> Result<Feed, Error> {
        info!("reading GTFS archive");
        self.read_from_source(ArchiveSource::new(BufReader::new(reader)))
    }

    /// Reads the GTFS from any [FeedSource]
    ///
    /// The source is dropped once the feed is read, whether it succeeded or not.
    pub fn read_from_source<S: FeedSource>(&self, source: S) -> Result<Feed, Error> {
        let feed = Ingestion::new(self, source).run()?;
        let stats = feed.stats();
        info!(
            "GTFS read in {} ms: {} stops, {} routes, {} trips, {} stop times",
            feed.read_duration, stats.stops, stats.routes, stats.trips, stats.stop_times
        );
        Ok(feed)
    }

    fn skips(&self, file: FeedFile) -> bool {
        match file {
            FeedFile::StopTimes => !self.read_stop_times,
            FeedFile::Shapes => !self.read_shapes,
            _ => false,
        }
    }
}

/// Reads a feed from a directory or a zip archive with the default [FeedReader]
///
/// ```no_run
/// let feed = gtfs_feed::parse("fixtures/basic")?;
/// println!("{}", feed.stats());
/// # Ok::<(), gtfs_feed::Error>(())
/// ```
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Feed, Error> {
    FeedReader::default().read_from_path(path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IngestState {
    Pending,
    Loading(FeedFile),
    Normalizing,
    Done,
    Failed,
}

/// One pass over a source, filling a [Feed] file after file
struct Ingestion<'r, S> {
    reader: &'r FeedReader,
    source: S,
    feed: Feed,
    state: IngestState,
}

impl<'r, S: FeedSource> Ingestion<'r, S> {
    fn new(reader: &'r FeedReader, source: S) -> Self {
        Self {
            reader,
            source,
            feed: Feed::new(),
            state: IngestState::Pending,
        }
    }

    fn transition(&mut self, state: IngestState) {
        debug!("ingestion {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    // the partially filled feed is dropped with self on error
    fn run(mut self) -> Result<Feed, Error> {
        let start = Utc::now();
        for file in FeedFile::LOAD_ORDER {
            if self.reader.skips(file) {
                debug!("{} not read", file);
                continue;
            }
            self.transition(IngestState::Loading(file));
            if let Err(e) = self.load(file) {
                self.transition(IngestState::Failed);
                return Err(e);
            }
        }

        self.transition(IngestState::Normalizing);
        self.feed.normalize();
        self.feed.sha256 = self.source.sha256();
        self.feed.read_duration = Utc::now().signed_duration_since(start).num_milliseconds();
        self.transition(IngestState::Done);
        Ok(self.feed)
    }

    fn load(&mut self, file: FeedFile) -> Result<(), Error> {
        let file_name = file.file_name();
        let stream = match self.source.open(file_name)? {
            Some(stream) => stream,
            None if file.is_required() => {
                return Err(Error::RequiredFileMissing(file_name.to_owned()))
            }
            None => {
                debug!("optional file {} is absent", file_name);
                return Ok(());
            }
        };

        let feed = &mut self.feed;
        let read_shapes = self.reader.read_shapes;
        let mut records = RecordReader::new(stream, file_name)?;
        let mut count = 0usize;
        while let Some(r) = records.next_record()? {
            apply(file, &r, feed, read_shapes).map_err(|kind| Error::Record {
                file_name: file_name.to_owned(),
                line: r.line(),
                kind,
            })?;
            count += 1;
        }
        debug!("{} records read from {}", count, file_name);
        Ok(())
    }
}

/// Builds the entity of one record and stores it in the feed
fn apply(file: FeedFile, r: &Record, feed: &mut Feed, read_shapes: bool) -> Result<(), RecordError> {
    match file {
        FeedFile::Agency => {
            feed.agencies.insert_if_absent(builders::agency(r)?);
        }
        FeedFile::Stops => {
            feed.stops.insert_if_absent(builders::stop(r)?);
        }
        FeedFile::Shapes => {
            let (shape_id, point) = builders::shape_point(r)?;
            feed.shapes
                .upsert_with(&shape_id, || Shape::new(&shape_id))
                .points
                .push(point);
        }
        FeedFile::Routes => {
            let route = builders::route(r, &feed.agencies)?;
            feed.routes.insert_if_absent(route);
        }
        FeedFile::Calendar => {
            feed.services
                .insert_if_absent(builders::service_from_calendar(r)?);
        }
        FeedFile::CalendarDates => match builders::calendar_date(r, &feed.services)? {
            CalendarDate::Existing(service, exception) => {
                feed.services[service].exceptions.push(exception)
            }
            CalendarDate::New(service) => {
                feed.services.insert_if_absent(service);
            }
        },
        FeedFile::Trips => {
            let shapes = if read_shapes {
                Some(&feed.shapes)
            } else {
                None
            };
            let trip = builders::trip(r, &feed.routes, &feed.services, shapes)?;
            feed.trips.insert_if_absent(trip);
        }
        FeedFile::StopTimes => {
            let (trip, stop_time) = builders::stop_time(r, &feed.trips, &feed.stops)?;
            feed.trips[trip].stop_times.push(stop_time);
        }
        FeedFile::FareAttributes => {
            feed.fare_attributes
                .insert_if_absent(builders::fare_attribute(r)?);
        }
        FeedFile::FareRules => {
            let (fare, rule) = builders::fare_rule(r, &feed.fare_attributes, &feed.routes)?;
            feed.fare_attributes[fare].rules.push(rule);
        }
        FeedFile::Frequencies => {
            let (trip, frequency) = builders::frequency(r, &feed.trips)?;
            feed.trips[trip].frequencies.push(frequency);
        }
        FeedFile::Transfers => {
            let transfer = builders::transfer(r, &feed.stops)?;
            feed.transfers.push(transfer);
        }
        FeedFile::FeedInfo => feed.feed_info.push(builders::feed_info(r)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_order_reads_references_first() {
        let position = |f| FeedFile::LOAD_ORDER.iter().position(|&o| o == f).unwrap();
        assert!(position(FeedFile::Shapes) < position(FeedFile::Trips));
        assert!(position(FeedFile::Calendar) < position(FeedFile::CalendarDates));
        assert!(position(FeedFile::Trips) < position(FeedFile::StopTimes));
        assert!(position(FeedFile::FareAttributes) < position(FeedFile::FareRules));
        assert_eq!(
            5,
            FeedFile::LOAD_ORDER
                .iter()
                .filter(|f| f.is_required())
                .count()
        );
    }

    #[test]
    fn default_reader_reads_everything() {
        let reader = FeedReader::default();
        assert!(FeedFile::LOAD_ORDER.iter().all(|&f| !reader.skips(f)));
        let reader = reader.read_stop_times(false).read_shapes(false);
        assert!(reader.skips(FeedFile::StopTimes));
        assert!(reader.skips(FeedFile::Shapes));
        assert!(!reader.skips(FeedFile::Trips));
    }
}
