use std::fmt;
use std::ops::RangeInclusive;

/// An enumeration stored as a bounded integer code in the CSV files
///
/// The range is validated by [crate::fields::get_coded], `from_code` only maps a validated code.
pub trait Coded: Sized {
    /// Closed range of accepted codes
    const RANGE: RangeInclusive<i64>;

    /// Enum value of a code inside [Coded::RANGE]
    fn from_code(code: i64) -> Option<Self>;
}

/// All the objects type from the GTFS specification that this library reads
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum ObjectType {
    /// [Agency](crate::Agency) <https://gtfs.org/reference/static/#agencytxt>
    Agency,
    /// [Stop](crate::Stop) <https://gtfs.org/reference/static/#stopstxt>
    Stop,
    /// [Route](crate::Route) <https://gtfs.org/reference/static/#routestxt>
    Route,
    /// [Trip](crate::Trip) <https://gtfs.org/reference/static/#tripstxt>
    Trip,
    /// [Service](crate::Service) <https://gtfs.org/reference/static/#calendartxt>
    Service,
    /// [Shape](crate::Shape) <https://gtfs.org/reference/static/#shapestxt>
    Shape,
    /// [FareAttribute](crate::FareAttribute) <https://gtfs.org/reference/static/#fare_attributestxt>
    Fare,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ObjectType::Agency => "agency",
            ObjectType::Stop => "stop",
            ObjectType::Route => "route",
            ObjectType::Trip => "trip",
            ObjectType::Service => "service",
            ObjectType::Shape => "shape",
            ObjectType::Fare => "fare attribute",
        })
    }
}

/// Describes the kind of [Stop](crate::Stop). See <https://gtfs.org/reference/static/#stopstxt> `location_type`
#[derive(Derivative, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum LocationType {
    /// Stop (or Platform). A location where passengers board or disembark from a transit vehicle
    #[derivative(Default)]
    StopPoint,
    /// Station. A physical structure or area that contains one or more platform
    StopArea,
}

impl Coded for LocationType {
    const RANGE: RangeInclusive<i64> = 0..=1;

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(LocationType::StopPoint),
            1 => Some(LocationType::StopArea),
            _ => None,
        }
    }
}

/// Describes the kind of [Route](crate::Route). See <https://gtfs.org/reference/static/#routestxt> `route_type`
#[derive(Derivative, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum RouteType {
    /// Tram, Streetcar, Light rail. Any light rail or street level system within a metropolitan area
    Tramway,
    /// Subway, Metro. Any underground rail system within a metropolitan area
    Subway,
    /// Used for intercity or long-distance travel
    Rail,
    /// Used for short- and long-distance bus routes
    #[derivative(Default)]
    Bus,
    /// Used for short- and long-distance boat service
    Ferry,
    /// Used for street-level rail cars where the cable runs beneath the vehicle, e.g., cable car in San Francisco
    CableCar,
    /// Aerial lift, suspended cable car (e.g., gondola lift, aerial tramway)
    Gondola,
    /// Any rail system designed for steep inclines
    Funicular,
}

impl Coded for RouteType {
    const RANGE: RangeInclusive<i64> = 0..=7;

    fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => RouteType::Tramway,
            1 => RouteType::Subway,
            2 => RouteType::Rail,
            3 => RouteType::Bus,
            4 => RouteType::Ferry,
            5 => RouteType::CableCar,
            6 => RouteType::Gondola,
            7 => RouteType::Funicular,
            _ => return None,
        })
    }
}

/// Describes if and how a traveller can board or alight the vehicle. See <https://gtfs.org/reference/static/#stop_timestxt> `pickup_type` and `dropoff_type`
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq)]
#[derivative(Default)]
pub enum PickupDropOffType {
    /// Regularly scheduled pickup or drop off (default when empty).
    #[derivative(Default)]
    Regular,
    /// No pickup or drop off available.
    NotAvailable,
    /// Must phone agency to arrange pickup or drop off.
    ArrangeByPhone,
    /// Must coordinate with driver to arrange pickup or drop off.
    CoordinateWithDriver,
}

impl Coded for PickupDropOffType {
    const RANGE: RangeInclusive<i64> = 0..=3;

    fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => PickupDropOffType::Regular,
            1 => PickupDropOffType::NotAvailable,
            2 => PickupDropOffType::ArrangeByPhone,
            3 => PickupDropOffType::CoordinateWithDriver,
            _ => return None,
        })
    }
}

/// Generic enum to define if a service (like wheelchair boarding) is available
#[derive(Debug, Derivative, PartialEq, Eq, Hash, Clone, Copy)]
#[derivative(Default)]
pub enum Availability {
    /// No information if the service is available
    #[derivative(Default)]
    InformationNotAvailable,
    /// The service is available
    Available,
    /// The service is not available
    NotAvailable,
}

impl Coded for Availability {
    const RANGE: RangeInclusive<i64> = 0..=2;

    fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Availability::InformationNotAvailable,
            1 => Availability::Available,
            2 => Availability::NotAvailable,
            _ => return None,
        })
    }
}

/// Is the [Trip](crate::Trip) accessible with a bike. See <https://gtfs.org/reference/static/#tripstxt> `bikes_allowed`
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq)]
#[derivative(Default)]
pub enum BikesAllowedType {
    /// No bike information for the trip
    #[derivative(Default)]
    NoBikeInfo,
    /// Vehicle being used on this particular trip can accommodate at least one bicycle
    AtLeastOneBike,
    /// No bicycles are allowed on this trip
    NoBikesAllowed,
}

impl Coded for BikesAllowedType {
    const RANGE: RangeInclusive<i64> = 0..=2;

    fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => BikesAllowedType::NoBikeInfo,
            1 => BikesAllowedType::AtLeastOneBike,
            2 => BikesAllowedType::NoBikesAllowed,
            _ => return None,
        })
    }
}

/// Defines if a [ServiceException](crate::ServiceException) adds or removes a day of service
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Exception {
    /// There will be a service on that day
    Added,
    /// There won’t be a service on that day
    Deleted,
}

impl Coded for Exception {
    const RANGE: RangeInclusive<i64> = 1..=2;

    fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Exception::Added),
            2 => Some(Exception::Deleted),
            _ => None,
        }
    }
}

/// Defines the direction of a [Trip](crate::Trip), only for display, not for routing. See <https://gtfs.org/reference/static/#tripstxt> `direction_id`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectionType {
    /// Travel in one direction (e.g. outbound travel).
    Outbound,
    /// Travel in the opposite direction (e.g. inbound travel).
    Inbound,
}

impl Coded for DirectionType {
    const RANGE: RangeInclusive<i64> = 0..=1;

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(DirectionType::Outbound),
            1 => Some(DirectionType::Inbound),
            _ => None,
        }
    }
}

/// Defines where a [FareAttribute](crate::FareAttribute) can be paid
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq)]
#[derivative(Default)]
pub enum PaymentMethod {
    /// Fare is paid on board
    #[derivative(Default)]
    Aboard,
    /// Fare must be paid before boarding
    PreBoarding,
}

impl Coded for PaymentMethod {
    const RANGE: RangeInclusive<i64> = 0..=1;

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PaymentMethod::Aboard),
            1 => Some(PaymentMethod::PreBoarding),
            _ => None,
        }
    }
}

/// Defines how many transfers can be done with on [FareAttribute](crate::FareAttribute)
///
/// An empty `transfers` value means [Transfers::Unlimited].
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq)]
#[derivative(Default)]
pub enum Transfers {
    /// Unlimited transfers are permitted
    #[derivative(Default)]
    Unlimited,
    /// No transfers permitted on this fare
    NoTransfer,
    /// Riders may transfer once
    UniqueTransfer,
    ///Riders may transfer twice
    TwoTransfers,
}

impl Coded for Transfers {
    const RANGE: RangeInclusive<i64> = 0..=2;

    fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Transfers::NoTransfer,
            1 => Transfers::UniqueTransfer,
            2 => Transfers::TwoTransfers,
            _ => return None,
        })
    }
}

/// Defines the type of a [Transfer](crate::Transfer)
#[derive(Debug, Derivative, Copy, Clone, PartialEq, Eq)]
#[derivative(Default)]
pub enum TransferType {
    /// Recommended transfer point between routes
    #[derivative(Default)]
    Recommended,
    /// Departing vehicle waits for arriving one
    Timed,
    /// Transfer requires a minimum amount of time between arrival and departure to ensure a connection.
    MinTime,
    /// Transfer is not possible at this location
    Impossible,
}

impl Coded for TransferType {
    const RANGE: RangeInclusive<i64> = 0..=3;

    fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => TransferType::Recommended,
            1 => TransferType::Timed,
            2 => TransferType::MinTime,
            3 => TransferType::Impossible,
            _ => return None,
        })
    }
}
