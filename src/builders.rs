//! Construction of one entity from one [Record]
//!
//! Builders only read the tables of files loaded earlier and return finished
//! values; attaching children to their parent is left to the caller.
use crate::error::RecordError;
use crate::fields::*;
use crate::objects::*;
use crate::record_reader::Record;
use crate::table::Table;
use id_arena::Id;

fn resolve<T>(
    table: &Table<T>,
    id: &str,
    object_type: ObjectType,
) -> Result<Id<T>, RecordError> {
    table.id_of(id).ok_or_else(|| RecordError::Reference {
        object_type,
        id: id.to_owned(),
    })
}

/// A required identifier column, resolved in `table`
fn required_ref<T>(
    name: &str,
    r: &Record,
    table: &Table<T>,
    object_type: ObjectType,
) -> Result<Id<T>, RecordError> {
    let id = get_string(name, r, true)?;
    resolve(table, &id, object_type)
}

/// An optional identifier column, only resolved when not empty
fn optional_ref<T>(
    name: &str,
    r: &Record,
    table: &Table<T>,
    object_type: ObjectType,
) -> Result<Option<Id<T>>, RecordError> {
    get_optional_string(name, r)
        .map(|id| resolve(table, &id, object_type))
        .transpose()
}

/// Builds an [Agency] from a row of `agency.txt`
pub fn agency(r: &Record) -> Result<Agency, RecordError> {
    Ok(Agency {
        id: get_string("agency_id", r, false)?,
        name: get_string("agency_name", r, true)?,
        url: get_string("agency_url", r, true)?,
        timezone: get_string("agency_timezone", r, true)?,
        lang: get_optional_string("agency_lang", r),
        phone: get_optional_string("agency_phone", r),
        fare_url: get_optional_string("agency_fare_url", r),
    })
}

/// Builds a [Stop] from a row of `stops.txt`
pub fn stop(r: &Record) -> Result<Stop, RecordError> {
    Ok(Stop {
        id: get_string("stop_id", r, true)?,
        code: get_optional_string("stop_code", r),
        name: get_string("stop_name", r, true)?,
        description: get_optional_string("stop_desc", r),
        latitude: get_float("stop_lat", r, true)?,
        longitude: get_float("stop_lon", r, true)?,
        zone_id: get_optional_string("zone_id", r),
        url: get_optional_string("stop_url", r),
        location_type: get_coded_or_default("location_type", r)?,
        parent_station: get_optional_string("parent_station", r),
        timezone: get_optional_string("stop_timezone", r),
        wheelchair_boarding: get_coded_or_default("wheelchair_boarding", r)?,
    })
}

/// Builds a [Route] from a row of `routes.txt`
pub fn route(r: &Record, agencies: &Table<Agency>) -> Result<Route, RecordError> {
    Ok(Route {
        id: get_string("route_id", r, true)?,
        agency: optional_ref("agency_id", r, agencies, ObjectType::Agency)?,
        short_name: get_string("route_short_name", r, false)?,
        long_name: get_string("route_long_name", r, false)?,
        desc: get_optional_string("route_desc", r),
        route_type: get_required_coded("route_type", r)?,
        url: get_optional_string("route_url", r),
        color: get_optional_string("route_color", r),
        text_color: get_optional_string("route_text_color", r),
    })
}

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Builds a [Service] from a row of `calendar.txt`
pub fn service_from_calendar(r: &Record) -> Result<Service, RecordError> {
    let id = get_string("service_id", r, true)?;
    let mut days = [false; 7];
    for (day, name) in days.iter_mut().zip(WEEKDAYS) {
        *day = get_bool(name, r, true)?;
    }
    Ok(Service {
        id,
        days,
        start_date: get_date("start_date", r, true)?,
        end_date: get_date("end_date", r, true)?,
        exceptions: Vec::new(),
    })
}

/// What a row of `calendar_dates.txt` does to the services
#[derive(Debug)]
pub enum CalendarDate {
    /// The service is known: the exception is appended to it
    Existing(Id<Service>, ServiceException),
    /// The service is only known through its exceptions
    New(Service),
}

/// Builds the [ServiceException] of a row of `calendar_dates.txt`
pub fn calendar_date(r: &Record, services: &Table<Service>) -> Result<CalendarDate, RecordError> {
    let service_id = get_string("service_id", r, true)?;
    let exception = ServiceException {
        date: get_date("date", r, true)?,
        exception_type: get_required_coded("exception_type", r)?,
    };
    Ok(match services.id_of(&service_id) {
        Some(service) => CalendarDate::Existing(service, exception),
        None => CalendarDate::New(Service {
            id: service_id,
            exceptions: vec![exception],
            ..Service::default()
        }),
    })
}

/// Builds a [ShapePoint] from a row of `shapes.txt`, with the id of its shape
pub fn shape_point(r: &Record) -> Result<(String, ShapePoint), RecordError> {
    let shape_id = get_string("shape_id", r, true)?;
    let point = ShapePoint {
        latitude: get_float("shape_pt_lat", r, true)?,
        longitude: get_float("shape_pt_lon", r, true)?,
        sequence: get_non_negative_int("shape_pt_sequence", r, true)?,
        dist_traveled: get_float("shape_dist_traveled", r, false)?,
    };
    Ok((shape_id, point))
}

/// Builds a [Trip] from a row of `trips.txt`
///
/// `shapes` is `None` when `shapes.txt` was not read: the trip then has no shape.
pub fn trip(
    r: &Record,
    routes: &Table<Route>,
    services: &Table<Service>,
    shapes: Option<&Table<Shape>>,
) -> Result<Trip, RecordError> {
    let route = required_ref("route_id", r, routes, ObjectType::Route)?;
    let service = required_ref("service_id", r, services, ObjectType::Service)?;
    let shape = match shapes {
        Some(shapes) => optional_ref("shape_id", r, shapes, ObjectType::Shape)?,
        None => None,
    };
    Ok(Trip {
        id: get_string("trip_id", r, true)?,
        route,
        service,
        shape,
        headsign: get_optional_string("trip_headsign", r),
        short_name: get_optional_string("trip_short_name", r),
        direction: get_coded("direction_id", r, false)?,
        block_id: get_optional_string("block_id", r),
        wheelchair_accessible: get_coded_or_default("wheelchair_accessible", r)?,
        bikes_allowed: get_coded_or_default("bikes_allowed", r)?,
        stop_times: Vec::new(),
        frequencies: Vec::new(),
    })
}

/// Builds a [StopTime] from a row of `stop_times.txt`, with the trip it belongs to
pub fn stop_time(
    r: &Record,
    trips: &Table<Trip>,
    stops: &Table<Stop>,
) -> Result<(Id<Trip>, StopTime), RecordError> {
    let trip = required_ref("trip_id", r, trips, ObjectType::Trip)?;
    let stop = required_ref("stop_id", r, stops, ObjectType::Stop)?;
    let stop_time = StopTime {
        arrival_time: get_string("arrival_time", r, false)?,
        departure_time: get_string("departure_time", r, false)?,
        stop,
        stop_sequence: get_non_negative_int("stop_sequence", r, true)?,
        stop_headsign: get_optional_string("stop_headsign", r),
        pickup_type: get_coded_or_default("pickup_type", r)?,
        drop_off_type: get_coded_or_default("drop_off_type", r)?,
        shape_dist_traveled: get_float("shape_dist_traveled", r, false)?,
        timepoint: get_bool_or("timepoint", r, true)?,
    };
    Ok((trip, stop_time))
}

/// Builds a [Frequency] from a row of `frequencies.txt`, with the trip it belongs to
pub fn frequency(r: &Record, trips: &Table<Trip>) -> Result<(Id<Trip>, Frequency), RecordError> {
    let trip = required_ref("trip_id", r, trips, ObjectType::Trip)?;
    let frequency = Frequency {
        start_time: get_string("start_time", r, true)?,
        end_time: get_string("end_time", r, true)?,
        headway_secs: get_positive_int("headway_secs", r, true)?,
        exact_times: get_bool("exact_times", r, false)?,
    };
    Ok((trip, frequency))
}

/// Builds a [FareAttribute] from a row of `fare_attributes.txt`
pub fn fare_attribute(r: &Record) -> Result<FareAttribute, RecordError> {
    let transfer_duration = if is_present("transfer_duration", r) {
        Some(get_non_negative_int("transfer_duration", r, true)?)
    } else {
        None
    };
    Ok(FareAttribute {
        id: get_string("fare_id", r, true)?,
        price: get_string("price", r, true)?,
        currency: get_string("currency_type", r, true)?,
        payment_method: get_coded_or_default("payment_method", r)?,
        // an empty value means unlimited transfers
        transfers: get_coded_or_default("transfers", r)?,
        transfer_duration,
        rules: Vec::new(),
    })
}

/// Builds a [FareAttributeRule] from a row of `fare_rules.txt`, with the fare it belongs to
pub fn fare_rule(
    r: &Record,
    fares: &Table<FareAttribute>,
    routes: &Table<Route>,
) -> Result<(Id<FareAttribute>, FareAttributeRule), RecordError> {
    let fare = required_ref("fare_id", r, fares, ObjectType::Fare)?;
    let rule = FareAttributeRule {
        route: optional_ref("route_id", r, routes, ObjectType::Route)?,
        origin_id: get_optional_string("origin_id", r),
        destination_id: get_optional_string("destination_id", r),
        contains_id: get_optional_string("contains_id", r),
    };
    Ok((fare, rule))
}

/// Builds a [Transfer] from a row of `transfers.txt`
pub fn transfer(r: &Record, stops: &Table<Stop>) -> Result<Transfer, RecordError> {
    let min_transfer_time = if is_present("min_transfer_time", r) {
        Some(get_non_negative_int("min_transfer_time", r, true)?)
    } else {
        None
    };
    Ok(Transfer {
        from_stop: required_ref("from_stop_id", r, stops, ObjectType::Stop)?,
        to_stop: required_ref("to_stop_id", r, stops, ObjectType::Stop)?,
        transfer_type: get_coded_or_default("transfer_type", r)?,
        min_transfer_time,
    })
}

/// Builds a [FeedInfo] from a row of `feed_info.txt`
pub fn feed_info(r: &Record) -> Result<FeedInfo, RecordError> {
    Ok(FeedInfo {
        name: get_string("feed_publisher_name", r, true)?,
        url: get_string("feed_publisher_url", r, true)?,
        lang: get_string("feed_lang", r, true)?,
        start_date: get_optional_date("feed_start_date", r)?,
        end_date: get_optional_date("feed_end_date", r)?,
        version: get_optional_string("feed_version", r),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_reader::RecordReader;

    fn with_record<T>(data: &str, f: impl FnOnce(&Record) -> T) -> T {
        let mut reader = RecordReader::new(data.as_bytes(), "test.txt").unwrap();
        let record = reader.next_record().unwrap().unwrap();
        f(&record)
    }

    fn routes() -> Table<Route> {
        let mut routes = Table::default();
        routes.insert_if_absent(Route {
            id: "R1".to_owned(),
            ..Route::default()
        });
        routes
    }

    fn services() -> Table<Service> {
        let mut services = Table::default();
        services.insert_if_absent(Service {
            id: "S1".to_owned(),
            ..Service::default()
        });
        services
    }

    #[test]
    fn stop_with_coded_fields() {
        let s = with_record(
            "stop_id,stop_name,stop_lat,stop_lon,location_type,wheelchair_boarding\nS1,Gare,48.5,2.25,1,\n",
            |r| stop(r).unwrap(),
        );
        assert_eq!("S1", s.id);
        assert_eq!(LocationType::StopArea, s.location_type);
        assert_eq!(Availability::InformationNotAvailable, s.wheelchair_boarding);
        assert_eq!(2.25, s.longitude);
    }

    #[test]
    fn route_type_out_of_range() {
        let err = with_record("route_id,route_type\nR1,99\n", |r| {
            route(r, &Table::default()).unwrap_err()
        });
        assert_eq!(
            RecordError::ValueRange {
                field: "route_type".to_owned(),
                value: "99".to_owned(),
                bound: "0..=7".to_owned(),
            },
            err
        );
    }

    #[test]
    fn route_with_unknown_agency() {
        let err = with_record("route_id,agency_id,route_type\nR1,ghost,3\n", |r| {
            route(r, &Table::default()).unwrap_err()
        });
        assert_eq!("No agency with id ghost found", err.to_string());
    }

    #[test]
    fn calendar_weekdays_start_on_monday() {
        let s = with_record(
            "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\nS1,1,0,0,0,0,0,1,20170101,20170131\n",
            |r| service_from_calendar(r).unwrap(),
        );
        assert_eq!([true, false, false, false, false, false, true], s.days);
        assert_eq!(Date::new(2017, 1, 31), s.end_date);
    }

    #[test]
    fn calendar_date_merges_or_creates() {
        let services = services();
        let data = "service_id,date,exception_type\nS1,20170102,2\n";
        match with_record(data, |r| calendar_date(r, &services).unwrap()) {
            CalendarDate::Existing(id, exception) => {
                assert_eq!(Some(id), services.id_of("S1"));
                assert_eq!(Exception::Deleted, exception.exception_type);
            }
            CalendarDate::New(_) => panic!("S1 is known"),
        }

        let data = "service_id,date,exception_type\nS2,20170102,1\n";
        match with_record(data, |r| calendar_date(r, &services).unwrap()) {
            CalendarDate::New(service) => {
                assert_eq!("S2", service.id);
                assert_eq!([false; 7], service.days);
                assert_eq!(Date::default(), service.start_date);
                assert_eq!(1, service.exceptions.len());
            }
            CalendarDate::Existing(..) => panic!("S2 is unknown"),
        }
    }

    #[test]
    fn trip_references() {
        let data = "trip_id,route_id,service_id,shape_id,direction_id\nT1,R1,S1,A,1\n";
        let t = with_record(data, |r| trip(r, &routes(), &services(), None).unwrap());
        assert_eq!(None, t.shape);
        assert_eq!(Some(DirectionType::Inbound), t.direction);

        let err = with_record(data, |r| {
            trip(r, &routes(), &services(), Some(&Table::default())).unwrap_err()
        });
        assert_eq!(
            RecordError::Reference {
                object_type: ObjectType::Shape,
                id: "A".to_owned()
            },
            err
        );

        let data = "trip_id,route_id,service_id\nT1,R1,S2\n";
        let err = with_record(data, |r| trip(r, &routes(), &services(), None).unwrap_err());
        assert!(matches!(
            err,
            RecordError::Reference {
                object_type: ObjectType::Service,
                ..
            }
        ));
    }

    #[test]
    fn stop_time_timepoint_defaults_to_exact() {
        let mut trips = Table::default();
        let routes = routes();
        let services = services();
        let (trip_id, _) = trips.insert_if_absent(
            with_record("trip_id,route_id,service_id\nT1,R1,S1\n", |r| {
                trip(r, &routes, &services, None).unwrap()
            }),
        );
        let mut stops = Table::default();
        stops.insert_if_absent(Stop {
            id: "S".to_owned(),
            ..Stop::default()
        });

        let (t, st) = with_record(
            "trip_id,stop_id,stop_sequence,arrival_time,pickup_type\nT1,S,4,08:00:00,2\n",
            |r| stop_time(r, &trips, &stops).unwrap(),
        );
        assert_eq!(trip_id, t);
        assert_eq!(4, st.stop_sequence);
        assert_eq!("08:00:00", st.arrival_time);
        assert_eq!("", st.departure_time);
        assert_eq!(PickupDropOffType::ArrangeByPhone, st.pickup_type);
        assert!(st.timepoint);

        let err = with_record("trip_id,stop_id,stop_sequence\nT1,S,-1\n", |r| {
            stop_time(r, &trips, &stops).unwrap_err()
        });
        assert!(matches!(err, RecordError::ValueRange { .. }));
    }

    #[test]
    fn frequency_needs_positive_headway() {
        let mut trips = Table::default();
        let routes = routes();
        let services = services();
        trips.insert_if_absent(with_record(
            "trip_id,route_id,service_id\nT1,R1,S1\n",
            |r| trip(r, &routes, &services, None).unwrap(),
        ));
        let data = "trip_id,start_time,end_time,headway_secs\nT1,06:00:00,22:00:00,0\n";
        let err = with_record(data, |r| frequency(r, &trips).unwrap_err());
        assert!(matches!(err, RecordError::ValueRange { .. }));

        let data = "trip_id,start_time,end_time,headway_secs,exact_times\nT1,06:00:00,22:00:00,600,1\n";
        let (_, f) = with_record(data, |r| frequency(r, &trips).unwrap());
        assert_eq!(600, f.headway_secs);
        assert!(f.exact_times);
    }

    #[test]
    fn fare_transfers_empty_means_unlimited() {
        let data = "fare_id,price,currency_type,payment_method,transfers,transfer_duration\n50,1.50,EUR,1,,\n";
        let fare = with_record(data, |r| fare_attribute(r).unwrap());
        assert_eq!(Transfers::Unlimited, fare.transfers);
        assert_eq!(PaymentMethod::PreBoarding, fare.payment_method);
        assert_eq!(None, fare.transfer_duration);

        let data = "fare_id,price,currency_type,transfers,transfer_duration\n50,1.50,EUR,0,3600\n";
        let fare = with_record(data, |r| fare_attribute(r).unwrap());
        assert_eq!(Transfers::NoTransfer, fare.transfers);
        assert_eq!(Some(3600), fare.transfer_duration);
    }

    #[test]
    fn fare_rule_optional_route() {
        let mut fares = Table::default();
        fares.insert_if_absent(with_record(
            "fare_id,price,currency_type\n50,1.50,EUR\n",
            |r| fare_attribute(r).unwrap(),
        ));
        let routes = routes();
        let (_, rule) = with_record("fare_id,route_id,origin_id\n50,,Z1\n", |r| {
            fare_rule(r, &fares, &routes).unwrap()
        });
        assert_eq!(None, rule.route);
        assert_eq!(Some("Z1".to_owned()), rule.origin_id);

        let err = with_record("fare_id,route_id\n50,R9\n", |r| {
            fare_rule(r, &fares, &routes).unwrap_err()
        });
        assert_eq!("No route with id R9 found", err.to_string());
    }

    #[test]
    fn feed_info_dates() {
        let data = "feed_publisher_name,feed_publisher_url,feed_lang,feed_start_date,feed_version\nSNCF,http://www.sncf.com,fr,20180709,v1\n";
        let info = with_record(data, |r| feed_info(r).unwrap());
        assert_eq!("SNCF", info.name);
        assert_eq!(Some(Date::new(2018, 7, 9)), info.start_date);
        assert_eq!(None, info.end_date);
        assert_eq!(Some("v1".to_owned()), info.version);
    }
}
