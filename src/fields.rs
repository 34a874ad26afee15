//! Typed accessors over a single [Record]
//!
//! Every accessor takes the column name, the record and whether the field is required.
//! For strings a field is absent when its column is missing; for every other type it is
//! also absent when its value is empty. Absent optional fields yield the type's default
//! (`""`, `0`, `false`, [Date::default]) unless a sentinel is given.
use crate::enums::Coded;
use crate::error::RecordError;
use crate::objects::Date;
use crate::record_reader::Record;

/// Raw value of a non-empty field
fn value<'a>(name: &str, r: &Record<'a>) -> Option<&'a str> {
    r.get(name).filter(|v| !v.is_empty())
}

fn missing(name: &str) -> RecordError {
    RecordError::MissingField(name.to_owned())
}

fn out_of_range(name: &str, raw: &str, bound: String) -> RecordError {
    RecordError::ValueRange {
        field: name.to_owned(),
        value: raw.to_owned(),
        bound,
    }
}

/// True if the column exists and holds a non-empty value
pub fn is_present(name: &str, r: &Record) -> bool {
    value(name, r).is_some()
}

/// Raw text of a field
pub fn get_string(name: &str, r: &Record, required: bool) -> Result<String, RecordError> {
    match r.get(name) {
        Some(v) => Ok(v.to_owned()),
        None if required => Err(missing(name)),
        None => Ok(String::new()),
    }
}

/// Raw text of an optional field, `None` when absent or empty
pub fn get_optional_string(name: &str, r: &Record) -> Option<String> {
    value(name, r).map(str::to_owned)
}

fn parse_int(name: &str, raw: &str) -> Result<i64, RecordError> {
    raw.parse().map_err(|_| RecordError::InvalidValue {
        field: name.to_owned(),
        value: raw.to_owned(),
        expected: "integer",
    })
}

/// Integer field, without bounds
pub fn get_int(name: &str, r: &Record, required: bool) -> Result<i64, RecordError> {
    match value(name, r) {
        Some(raw) => parse_int(name, raw),
        None if required => Err(missing(name)),
        None => Ok(0),
    }
}

/// Integer field that must be strictly positive
pub fn get_positive_int(name: &str, r: &Record, required: bool) -> Result<u32, RecordError> {
    match value(name, r) {
        Some(raw) => {
            let i = parse_int(name, raw)?;
            if i <= 0 {
                return Err(out_of_range(name, raw, "> 0".to_owned()));
            }
            u32::try_from(i).map_err(|_| out_of_range(name, raw, format!("<= {}", u32::MAX)))
        }
        None if required => Err(missing(name)),
        None => Ok(0),
    }
}

/// Integer field that must not be negative
pub fn get_non_negative_int(name: &str, r: &Record, required: bool) -> Result<u32, RecordError> {
    match value(name, r) {
        Some(raw) => {
            let i = parse_int(name, raw)?;
            if i < 0 {
                return Err(out_of_range(name, raw, ">= 0".to_owned()));
            }
            u32::try_from(i).map_err(|_| out_of_range(name, raw, format!("<= {}", u32::MAX)))
        }
        None if required => Err(missing(name)),
        None => Ok(0),
    }
}

/// Integer field within `min..=max`
///
/// An absent optional field yields `0` even if `0` is outside the bounds;
/// use [get_range_int_or] to get a sentinel instead.
pub fn get_range_int(
    name: &str,
    r: &Record,
    required: bool,
    min: i64,
    max: i64,
) -> Result<i64, RecordError> {
    match value(name, r) {
        Some(raw) => check_range(name, raw, min, max),
        None if required => Err(missing(name)),
        None => Ok(0),
    }
}

/// Integer field within `min..=max`, `default` when the field is absent
///
/// An explicit value outside the bounds is still an error.
pub fn get_range_int_or(
    name: &str,
    r: &Record,
    min: i64,
    max: i64,
    default: i64,
) -> Result<i64, RecordError> {
    match value(name, r) {
        Some(raw) => check_range(name, raw, min, max),
        None => Ok(default),
    }
}

fn check_range(name: &str, raw: &str, min: i64, max: i64) -> Result<i64, RecordError> {
    let i = parse_int(name, raw)?;
    if i < min || i > max {
        Err(out_of_range(name, raw, format!("{}..={}", min, max)))
    } else {
        Ok(i)
    }
}

/// Coded enumeration, `None` when the field is absent
///
/// Fails with [RecordError::MissingField] if absent and required.
pub fn get_coded<T: Coded>(name: &str, r: &Record, required: bool) -> Result<Option<T>, RecordError> {
    const ABSENT: i64 = i64::MIN;
    let (min, max) = (*T::RANGE.start(), *T::RANGE.end());
    match get_range_int_or(name, r, min, max, ABSENT)? {
        ABSENT if required => Err(missing(name)),
        ABSENT => Ok(None),
        code => T::from_code(code)
            .map(Some)
            .ok_or_else(|| out_of_range(name, &code.to_string(), format!("{}..={}", min, max))),
    }
}

/// Coded enumeration that must be present
pub fn get_required_coded<T: Coded>(name: &str, r: &Record) -> Result<T, RecordError> {
    get_coded(name, r, true)?.ok_or_else(|| missing(name))
}

/// Coded enumeration, the type's default when the field is absent
pub fn get_coded_or_default<T: Coded + Default>(name: &str, r: &Record) -> Result<T, RecordError> {
    get_coded(name, r, false).map(Option::unwrap_or_default)
}

/// 32 bits float field
pub fn get_float(name: &str, r: &Record, required: bool) -> Result<f32, RecordError> {
    match value(name, r) {
        Some(raw) => raw.parse().map_err(|_| RecordError::InvalidValue {
            field: name.to_owned(),
            value: raw.to_owned(),
            expected: "float",
        }),
        None if required => Err(missing(name)),
        None => Ok(0.0),
    }
}

/// Boolean field, only the literal tokens `0` and `1` are accepted
pub fn get_bool(name: &str, r: &Record, required: bool) -> Result<bool, RecordError> {
    match value(name, r) {
        Some(raw) => parse_bool(name, raw),
        None if required => Err(missing(name)),
        None => Ok(false),
    }
}

/// Boolean field, `default` when the field is absent
pub fn get_bool_or(name: &str, r: &Record, default: bool) -> Result<bool, RecordError> {
    value(name, r).map_or(Ok(default), |raw| parse_bool(name, raw))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, RecordError> {
    match raw {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(RecordError::InvalidValue {
            field: name.to_owned(),
            value: raw.to_owned(),
            expected: "1 or 0",
        }),
    }
}

/// Date field in the `YYYYMMDD` format
pub fn get_date(name: &str, r: &Record, required: bool) -> Result<Date, RecordError> {
    match value(name, r) {
        Some(raw) => parse_date(name, raw),
        None if required => Err(missing(name)),
        None => Ok(Date::default()),
    }
}

/// Optional date field, `None` when absent
pub fn get_optional_date(name: &str, r: &Record) -> Result<Option<Date>, RecordError> {
    value(name, r).map(|raw| parse_date(name, raw)).transpose()
}

fn parse_date(name: &str, raw: &str) -> Result<Date, RecordError> {
    let invalid = |reason| RecordError::InvalidDate {
        field: name.to_owned(),
        value: raw.to_owned(),
        reason,
    };
    if raw.len() != 8 {
        return Err(invalid("expected 8 characters (YYYYMMDD)"));
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected only digits"));
    }
    // only ascii digits from here on, slicing is safe
    let year: u16 = raw[0..4].parse().map_err(|_| invalid("invalid year"))?;
    let month: u8 = raw[4..6].parse().map_err(|_| invalid("invalid month"))?;
    let day: u8 = raw[6..8].parse().map_err(|_| invalid("invalid day"))?;
    if !(1..=12).contains(&month) {
        return Err(out_of_range(name, raw, "month in 1..=12".to_owned()));
    }
    if !(1..=31).contains(&day) {
        return Err(out_of_range(name, raw, "day in 1..=31".to_owned()));
    }
    Ok(Date { day, month, year })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::RouteType;
    use crate::record_reader::RecordReader;

    fn with_record<T>(data: &str, f: impl FnOnce(&Record) -> T) -> T {
        let mut reader = RecordReader::new(data.as_bytes(), "test.txt").unwrap();
        let record = reader.next_record().unwrap().unwrap();
        f(&record)
    }

    #[test]
    fn strings() {
        with_record("a,b\nx,\n", |r| {
            assert_eq!("x", get_string("a", r, true).unwrap());
            assert_eq!("", get_string("b", r, true).unwrap());
            assert_eq!("", get_string("c", r, false).unwrap());
            assert_eq!(
                RecordError::MissingField("c".to_owned()),
                get_string("c", r, true).unwrap_err()
            );
            assert_eq!(None, get_optional_string("b", r));
            assert_eq!(Some("x".to_owned()), get_optional_string("a", r));
        });
    }

    #[test]
    fn integers() {
        with_record("a,b,c,d\n42,-3,abc,\n", |r| {
            assert_eq!(42, get_int("a", r, true).unwrap());
            assert_eq!(-3, get_int("b", r, true).unwrap());
            assert!(matches!(
                get_int("c", r, true),
                Err(RecordError::InvalidValue { expected: "integer", .. })
            ));
            assert_eq!(0, get_int("d", r, false).unwrap());
            assert!(matches!(
                get_int("d", r, true),
                Err(RecordError::MissingField(_))
            ));
            assert_eq!(42, get_positive_int("a", r, true).unwrap());
            assert!(matches!(
                get_positive_int("b", r, true),
                Err(RecordError::ValueRange { .. })
            ));
            assert!(matches!(
                get_non_negative_int("b", r, true),
                Err(RecordError::ValueRange { .. })
            ));
        });
    }

    #[test]
    fn zero_is_not_positive() {
        with_record("headway_secs\n0\n", |r| {
            assert_eq!(
                RecordError::ValueRange {
                    field: "headway_secs".to_owned(),
                    value: "0".to_owned(),
                    bound: "> 0".to_owned(),
                },
                get_positive_int("headway_secs", r, true).unwrap_err()
            );
            assert_eq!(0, get_non_negative_int("headway_secs", r, true).unwrap());
        });
    }

    #[test]
    fn ranges() {
        with_record("route_type,other\n99,\n", |r| {
            assert_eq!(
                RecordError::ValueRange {
                    field: "route_type".to_owned(),
                    value: "99".to_owned(),
                    bound: "0..=7".to_owned(),
                },
                get_range_int("route_type", r, true, 0, 7).unwrap_err()
            );
            assert!(get_range_int_or("route_type", r, 0, 7, -1).is_err());
            assert_eq!(-1, get_range_int_or("other", r, 0, 7, -1).unwrap());
            assert_eq!(-1, get_range_int_or("missing", r, 0, 7, -1).unwrap());
        });
    }

    #[test]
    fn coded() {
        with_record("route_type,empty\n2,\n", |r| {
            assert_eq!(
                Some(RouteType::Rail),
                get_coded::<RouteType>("route_type", r, true).unwrap()
            );
            assert_eq!(None, get_coded::<RouteType>("empty", r, false).unwrap());
            assert!(get_coded::<RouteType>("empty", r, true).is_err());
            assert_eq!(
                RouteType::Bus,
                get_coded_or_default::<RouteType>("empty", r).unwrap()
            );
        });
    }

    #[test]
    fn floats() {
        with_record("lat,bad\n48.796058,north\n", |r| {
            assert_eq!(48.796_058f32, get_float("lat", r, true).unwrap());
            assert!(matches!(
                get_float("bad", r, true),
                Err(RecordError::InvalidValue { expected: "float", .. })
            ));
            assert_eq!(0.0, get_float("none", r, false).unwrap());
        });
    }

    #[test]
    fn booleans_are_literal() {
        with_record("a,b,c,d\n1,0,true,2\n", |r| {
            assert!(get_bool("a", r, true).unwrap());
            assert!(!get_bool("b", r, true).unwrap());
            assert!(get_bool("c", r, true).is_err());
            assert!(get_bool("d", r, true).is_err());
            assert!(!get_bool("e", r, false).unwrap());
            assert!(get_bool_or("e", r, true).unwrap());
        });
    }

    #[test]
    fn dates() {
        with_record("a,b,c,d,e\n20170106,2017016,2017a106,20171306,\n", |r| {
            assert_eq!(
                Date {
                    day: 6,
                    month: 1,
                    year: 2017
                },
                get_date("a", r, true).unwrap()
            );
            assert!(matches!(
                get_date("b", r, true),
                Err(RecordError::InvalidDate { .. })
            ));
            assert!(matches!(
                get_date("c", r, true),
                Err(RecordError::InvalidDate { .. })
            ));
            assert!(matches!(
                get_date("d", r, true),
                Err(RecordError::ValueRange { .. })
            ));
            assert_eq!(Date::default(), get_date("e", r, false).unwrap());
            assert_eq!(None, get_optional_date("e", r).unwrap());
        });
    }

    #[test]
    fn error_message_names_field_and_value() {
        with_record("monday\ntrue\n", |r| {
            assert_eq!(
                "Expected 1 or 0 for field monday, found true",
                get_bool("monday", r, true).unwrap_err().to_string()
            );
        });
    }
}
