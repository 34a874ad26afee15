/*! The [General Transit Feed Specification](https://gtfs.org/) (GTFS) is a commonly used model to represent public transit data.

This crate reads a feed from a directory or a zip archive into a validated in-memory [Feed].

To get started, see [parse] and [Feed].

## What is GTFS

A Gtfs feed is a collection of CSV files (often bundled as a zip file).
Each file represents a collection of one type (stops, lines, etc.) that have relationships through unique identifiers.

This crate reads the files in a fixed order so that every identifier is resolved against
files already read, and fails on the first invalid record with its file name and line.

## Design decisions

### Handles instead of identifiers

Relationships are resolved while reading. A [Trip] does not hold a `route_id` but an [Id] in
[Feed::routes], so `feed.routes[trip.route]` cannot fail. The GTFS identifiers stay available
through [Table::get].

### All or nothing

A feed is either fully read or not at all: on error only the [Error] is returned.

### Use of Enum

Many values are integers that are actually enumerations of certain values. We always use Rust enums, like [LocationType] to represent them, and not the integer value.
A value outside of the enumeration is an error.

### Renaming

We kept some names even if they can be confusing (a [Service] is referenced by `service_id`), but we strip the object type (`route_short_name` is [Route::short_name]).
*/
#![warn(missing_docs)]

#[macro_use]
extern crate derivative;

mod builders;
mod enums;
pub mod error;
mod feed;
mod feed_reader;
pub mod fields;
pub(crate) mod objects;
mod record_reader;
mod source;
mod table;


pub use error::{Error, ErrorKind, RecordError};
pub use feed::{Feed, FeedStats};
pub use feed_reader::{parse, FeedFile, FeedReader};
pub use id_arena::Id;
pub use objects::*;
pub use record_reader::{Record, RecordReader};
pub use source::{ArchiveSource, DirectorySource, FeedSource};
pub use table::Table;
