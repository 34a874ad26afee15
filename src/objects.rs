pub use crate::enums::*;
use chrono::{Datelike, NaiveDate, Weekday};
use id_arena::Id;

use std::fmt;

/// Objects that have an identifier implement this trait
///
/// Those identifier are technical and should not be shown to travellers
pub trait Identifier {
    /// Identifier of the object
    fn id(&self) -> &str;
}

/// Trait to introspect what is the object’s type (stop, route…)
pub trait Type {
    /// What is the type of the object
    fn object_type(&self) -> ObjectType;
}

/// A calendar day, as written `YYYYMMDD` in the GTFS files
///
/// The default value (all zeros) is used for services only known through `calendar_dates.txt`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    // field order matters for the derived ordering
    /// Year, e.g. 2017
    pub year: u16,
    /// Month, 1 to 12
    pub month: u8,
    /// Day of the month, 1 to 31
    pub day: u8,
}

impl Date {
    /// Builds a date from its year, month and day
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Calendar date, `None` for the zero date or impossible days like February 30th
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
    }
}

/// Fails for years outside `0..=65535`
impl TryFrom<NaiveDate> for Date {
    type Error = std::num::TryFromIntError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        Ok(Self {
            year: u16::try_from(date.year())?,
            month: u8::try_from(date.month())?,
            day: u8::try_from(date.day())?,
        })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// An agency operating transit services. See <https://gtfs.org/reference/static/#agencytxt>
#[derive(Debug, Default, Clone)]
pub struct Agency {
    /// Unique technical identifier, may be empty when the feed has a single agency
    pub id: String,
    /// Full name of the transit agency
    pub name: String,
    /// URL of the transit agency
    pub url: String,
    /// Timezone where the transit agency is located
    pub timezone: String,
    /// Primary language used by this transit agency
    pub lang: Option<String>,
    /// A voice telephone number for the specified agency
    pub phone: Option<String>,
    /// URL of a web page where a rider can purchase tickets
    pub fare_url: Option<String>,
}

impl Type for Agency {
    fn object_type(&self) -> ObjectType {
        ObjectType::Agency
    }
}

impl Identifier for Agency {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A stop or a station. See <https://gtfs.org/reference/static/#stopstxt>
#[derive(Debug, Default, Clone)]
pub struct Stop {
    /// Unique technical identifier
    pub id: String,
    /// Short text or a number that identifies the location for riders
    pub code: Option<String>,
    /// Name of the location
    pub name: String,
    /// Description of the location
    pub description: Option<String>,
    /// Latitude (WGS 84)
    pub latitude: f32,
    /// Longitude (WGS 84)
    pub longitude: f32,
    /// Fare zone of the stop, matched by [FareAttributeRule] zone ids
    pub zone_id: Option<String>,
    /// URL of a web page about the location
    pub url: Option<String>,
    /// Stop point or station
    pub location_type: LocationType,
    /// Identifier of the station containing this stop, not resolved
    pub parent_station: Option<String>,
    /// Timezone of the location
    pub timezone: Option<String>,
    /// Indicates whether wheelchair boardings are possible from the location
    pub wheelchair_boarding: Availability,
}

impl Type for Stop {
    fn object_type(&self) -> ObjectType {
        ObjectType::Stop
    }
}

impl Identifier for Stop {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A commercial line. See <https://gtfs.org/reference/static/#routestxt>
#[derive(Debug, Default, Clone)]
pub struct Route {
    /// Unique technical identifier
    pub id: String,
    /// Operating agency, if the route names one
    pub agency: Option<Id<Agency>>,
    /// Short name of a route, e.g. `32`
    pub short_name: String,
    /// Full name of a route
    pub long_name: String,
    /// Description of a route
    pub desc: Option<String>,
    /// Type of transportation used on a route
    pub route_type: RouteType,
    /// URL of a web page about the particular route
    pub url: Option<String>,
    /// Route color, as written in the feed (`RRGGBB`)
    pub color: Option<String>,
    /// Legible color for text drawn against [Route::color]
    pub text_color: Option<String>,
}

impl Type for Route {
    fn object_type(&self) -> ObjectType {
        ObjectType::Route
    }
}

impl Identifier for Route {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.long_name.is_empty() {
            write!(f, "{}", self.long_name)
        } else {
            write!(f, "{}", self.short_name)
        }
    }
}

/// A date on which a [Service] is added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceException {
    /// Day of the exception
    pub date: Date,
    /// Is the service added or removed that day
    pub exception_type: Exception,
}

/// Days on which vehicles run, from `calendar.txt` and `calendar_dates.txt`
#[derive(Debug, Default, Clone)]
pub struct Service {
    /// Unique technical identifier, the `service_id`
    pub id: String,
    /// Does the service run on each weekday, Monday first
    pub days: [bool; 7],
    /// First day of the service
    pub start_date: Date,
    /// Last day of the service (included)
    pub end_date: Date,
    /// Explicit additions and removals, in file order
    pub exceptions: Vec<ServiceException>,
}

impl Type for Service {
    fn object_type(&self) -> ObjectType {
        ObjectType::Service
    }
}

impl Identifier for Service {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", self.start_date, self.end_date)
    }
}

impl Service {
    /// Does the weekly pattern include this day of the week
    pub fn valid_weekday(&self, weekday: Weekday) -> bool {
        self.days[weekday.num_days_from_monday() as usize]
    }

    /// First exception registered for a date
    pub fn exception_on(&self, date: Date) -> Option<Exception> {
        self.exceptions
            .iter()
            .find(|e| e.date == date)
            .map(|e| e.exception_type)
    }

    /// Does the service run on a given date
    ///
    /// An [Exception::Added] date always runs. Otherwise the date must be within
    /// the date range, on an active weekday, and not [Exception::Deleted].
    pub fn is_active_on(&self, date: Date) -> bool {
        match self.exception_on(date) {
            Some(Exception::Added) => true,
            Some(Exception::Deleted) => false,
            None => {
                self.start_date <= date
                    && date <= self.end_date
                    && date
                        .to_naive_date()
                        .map_or(false, |d| self.valid_weekday(d.weekday()))
            }
        }
    }
}

/// A point of a [Shape]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ShapePoint {
    /// Latitude (WGS 84)
    pub latitude: f32,
    /// Longitude (WGS 84)
    pub longitude: f32,
    /// Position of the point in the shape
    pub sequence: u32,
    /// Distance traveled from the first point
    pub dist_traveled: f32,
}

impl fmt::Display for ShapePoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.8},{:.8}", self.latitude, self.longitude)
    }
}

/// The path travelled by a vehicle. See <https://gtfs.org/reference/static/#shapestxt>
#[derive(Debug, Default, Clone)]
pub struct Shape {
    /// Unique technical identifier
    pub id: String,
    /// Points of the shape, sorted by [ShapePoint::sequence] once the feed is read
    pub points: Vec<ShapePoint>,
}

impl Shape {
    /// An empty shape
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            points: Vec::new(),
        }
    }
}

impl Type for Shape {
    fn object_type(&self) -> ObjectType {
        ObjectType::Shape
    }
}

impl Identifier for Shape {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", point)?;
        }
        Ok(())
    }
}

/// A vehicle stopping at a [Stop] during a [Trip]. See <https://gtfs.org/reference/static/#stop_timestxt>
#[derive(Debug, Clone)]
pub struct StopTime {
    /// Arrival time, kept as written (`HH:MM:SS`, hours may exceed 23)
    pub arrival_time: String,
    /// Departure time, kept as written
    pub departure_time: String,
    /// The stop served
    pub stop: Id<Stop>,
    /// Order of the stop within the trip
    pub stop_sequence: u32,
    /// Text that appears on signage identifying the trip's destination to riders
    pub stop_headsign: Option<String>,
    /// Indicates pickup method
    pub pickup_type: PickupDropOffType,
    /// Indicates drop off method
    pub drop_off_type: PickupDropOffType,
    /// Actual distance traveled along the shape from the first stop
    pub shape_dist_traveled: f32,
    /// Are the times exact (`true`) or approximate
    pub timepoint: bool,
}

/// Overrides the timetable of a [Trip] with a headway. See <https://gtfs.org/reference/static/#frequenciestxt>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency {
    /// Time at which the first vehicle departs, kept as written
    pub start_time: String,
    /// Time at which service changes or ends, kept as written
    pub end_time: String,
    /// Time, in seconds, between departures
    pub headway_secs: u32,
    /// Are the departures exactly scheduled (`true`) or frequency based
    pub exact_times: bool,
}

/// A journey of a vehicle. See <https://gtfs.org/reference/static/#tripstxt>
#[derive(Debug, Clone)]
pub struct Trip {
    /// Unique technical identifier
    pub id: String,
    /// Route of the trip
    pub route: Id<Route>,
    /// Days on which the trip runs
    pub service: Id<Service>,
    /// Path of the vehicle, if known
    pub shape: Option<Id<Shape>>,
    /// Text that appears on signage identifying the trip's destination to riders
    pub headsign: Option<String>,
    /// Public facing text used to identify the trip to riders
    pub short_name: Option<String>,
    /// Direction of travel
    pub direction: Option<DirectionType>,
    /// Block the trip belongs to
    pub block_id: Option<String>,
    /// Indicates wheelchair accessibility
    pub wheelchair_accessible: Availability,
    /// Indicates whether bikes are allowed
    pub bikes_allowed: BikesAllowedType,
    /// Stops served, sorted by [StopTime::stop_sequence] once the feed is read
    pub stop_times: Vec<StopTime>,
    /// Headway based service periods
    pub frequencies: Vec<Frequency>,
}

impl Type for Trip {
    fn object_type(&self) -> ObjectType {
        ObjectType::Trip
    }
}

impl Identifier for Trip {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.headsign {
            Some(headsign) => write!(f, "{}", headsign),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Applies a [FareAttribute] to a route or to zones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FareAttributeRule {
    /// Route the fare applies to
    pub route: Option<Id<Route>>,
    /// Origin zone, matched against [Stop::zone_id]
    pub origin_id: Option<String>,
    /// Destination zone, matched against [Stop::zone_id]
    pub destination_id: Option<String>,
    /// Zone crossed during the journey, matched against [Stop::zone_id]
    pub contains_id: Option<String>,
}

/// A fare class. See <https://gtfs.org/reference/static/#fare_attributestxt>
#[derive(Debug, Clone)]
pub struct FareAttribute {
    /// Unique technical identifier
    pub id: String,
    /// Fare price, kept as written
    pub price: String,
    /// ISO 4217 currency code
    pub currency: String,
    /// When the fare must be paid
    pub payment_method: PaymentMethod,
    /// Number of transfers permitted on this fare
    pub transfers: Transfers,
    /// Length of time in seconds before a transfer expires
    pub transfer_duration: Option<u32>,
    /// Where the fare applies, from `fare_rules.txt`
    pub rules: Vec<FareAttributeRule>,
}

impl Identifier for FareAttribute {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Type for FareAttribute {
    fn object_type(&self) -> ObjectType {
        ObjectType::Fare
    }
}

/// A connection between two stops. See <https://gtfs.org/reference/static/#transferstxt>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Stop where the connection begins
    pub from_stop: Id<Stop>,
    /// Stop where the connection ends
    pub to_stop: Id<Stop>,
    /// Type of connection
    pub transfer_type: TransferType,
    /// Amount of time, in seconds, needed to transfer
    pub min_transfer_time: Option<u32>,
}

/// Information about the feed itself. See <https://gtfs.org/reference/static/#feed_infotxt>
#[derive(Debug, Clone, Default)]
pub struct FeedInfo {
    /// Full name of the organization that publishes the dataset
    pub name: String,
    /// URL of the dataset publishing organization's website
    pub url: String,
    /// Default language used for the text in this dataset
    pub lang: String,
    /// First day covered by the dataset
    pub start_date: Option<Date>,
    /// Last day covered by the dataset
    pub end_date: Option<Date>,
    /// Version of the dataset
    pub version: Option<String>,
}

impl fmt::Display for FeedInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
