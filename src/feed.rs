use crate::objects::*;
use crate::table::Table;
use crate::{Error, FeedReader};
use std::fmt;

/// Data structure with all the GTFS objects
///
/// Relationships are resolved: a [Trip] holds handles to its [Route], [Service] and [Shape],
/// which are looked up in the corresponding table:
/// ```no_run
/// let feed = gtfs_feed::parse("fixtures/basic")?;
/// let trip = feed.get_trip("trip1")?;
/// println!("{} runs on {}", trip, feed.routes[trip.route]);
/// # Ok::<(), gtfs_feed::Error>(())
/// ```
///
/// The [StopTime] are accessible from the [Trip], the [ShapePoint] from the [Shape]
/// and the [FareAttributeRule] from the [FareAttribute].
#[derive(Debug, Default)]
pub struct Feed {
    /// Time needed to read and parse the feed in milliseconds
    pub read_duration: i64,
    /// hex encoded sha256 of the archive, `None` when read from a directory
    pub sha256: Option<String>,
    /// All agencies by `agency_id`
    pub agencies: Table<Agency>,
    /// All stops by `stop_id`
    pub stops: Table<Stop>,
    /// All routes by `route_id`
    pub routes: Table<Route>,
    /// All services by `service_id`, from `calendar.txt` and `calendar_dates.txt`
    pub services: Table<Service>,
    /// All shapes by `shape_id`
    pub shapes: Table<Shape>,
    /// All trips by `trip_id`
    pub trips: Table<Trip>,
    /// All fare attributes by `fare_id`
    pub fare_attributes: Table<FareAttribute>,
    /// All transfers. There is no identifier
    pub transfers: Vec<Transfer>,
    /// All feed information. There is no identifier
    pub feed_info: Vec<FeedInfo>,
}

/// Number of objects of each kind in a [Feed]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedStats {
    /// Number of agencies
    pub agencies: usize,
    /// Number of stops
    pub stops: usize,
    /// Number of routes
    pub routes: usize,
    /// Number of services
    pub services: usize,
    /// Number of shapes
    pub shapes: usize,
    /// Number of trips
    pub trips: usize,
    /// Number of stop times, over all trips
    pub stop_times: usize,
    /// Number of fare attributes
    pub fare_attributes: usize,
    /// Number of transfers
    pub transfers: usize,
}

impl fmt::Display for FeedStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "GTFS data:")?;
        writeln!(f, "  Agencies: {}", self.agencies)?;
        writeln!(f, "  Stops: {}", self.stops)?;
        writeln!(f, "  Routes: {}", self.routes)?;
        writeln!(f, "  Services: {}", self.services)?;
        writeln!(f, "  Shapes: {}", self.shapes)?;
        writeln!(f, "  Trips: {}", self.trips)?;
        writeln!(f, "  Stop times: {}", self.stop_times)?;
        writeln!(f, "  Fare attributes: {}", self.fare_attributes)?;
        write!(f, "  Transfers: {}", self.transfers)
    }
}

impl Feed {
    /// An empty feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the GTFS from a local zip archive or local directory
    ///
    /// See [crate::FeedReader] to configure the reading.
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Feed, Error> {
        FeedReader::default().read_from_path(path)
    }

    /// Reads a zip archive from any object implementing [std::io::Read] and [std::io::Seek]
    pub fn from_reader<T: std::io::Read + std::io::Seek>(reader: T) -> Result<Feed, Error> {
        FeedReader::default().read_from_reader(reader)
    }

    /// Counts the objects of each kind
    pub fn stats(&self) -> FeedStats {
        FeedStats {
            agencies: self.agencies.len(),
            stops: self.stops.len(),
            routes: self.routes.len(),
            services: self.services.len(),
            shapes: self.shapes.len(),
            trips: self.trips.len(),
            stop_times: self.trips.iter().map(|t| t.stop_times.len()).sum(),
            fare_attributes: self.fare_attributes.len(),
            transfers: self.transfers.len(),
        }
    }

    /// Gets an [Agency] by its `agency_id`
    pub fn get_agency<'a>(&'a self, id: &str) -> Result<&'a Agency, Error> {
        lookup(&self.agencies, id, ObjectType::Agency)
    }

    /// Gets a [Stop] by its `stop_id`
    pub fn get_stop<'a>(&'a self, id: &str) -> Result<&'a Stop, Error> {
        lookup(&self.stops, id, ObjectType::Stop)
    }

    /// Gets a [Route] by its `route_id`
    pub fn get_route<'a>(&'a self, id: &str) -> Result<&'a Route, Error> {
        lookup(&self.routes, id, ObjectType::Route)
    }

    /// Gets a [Service] by its `service_id`
    pub fn get_service<'a>(&'a self, id: &str) -> Result<&'a Service, Error> {
        lookup(&self.services, id, ObjectType::Service)
    }

    /// Gets a [Shape] by its `shape_id`
    pub fn get_shape<'a>(&'a self, id: &str) -> Result<&'a Shape, Error> {
        lookup(&self.shapes, id, ObjectType::Shape)
    }

    /// Gets a [Trip] by its `trip_id`
    pub fn get_trip<'a>(&'a self, id: &str) -> Result<&'a Trip, Error> {
        lookup(&self.trips, id, ObjectType::Trip)
    }

    /// Gets a [FareAttribute] by its `fare_id`
    pub fn get_fare_attribute<'a>(&'a self, id: &str) -> Result<&'a FareAttribute, Error> {
        lookup(&self.fare_attributes, id, ObjectType::Fare)
    }

    /// Sorts the stop times of every trip and the points of every shape by sequence
    ///
    /// The sort is stable: equal sequence numbers keep their file order.
    pub(crate) fn normalize(&mut self) {
        for trip in self.trips.iter_mut() {
            trip.stop_times.sort_by_key(|st| st.stop_sequence);
        }
        for shape in self.shapes.iter_mut() {
            shape.points.sort_by_key(|p| p.sequence);
        }
    }
}

fn lookup<'a, T>(table: &'a Table<T>, id: &str, object_type: ObjectType) -> Result<&'a T, Error> {
    table.get(id).ok_or_else(|| Error::ReferenceError {
        object_type,
        id: id.to_owned(),
    })
}
