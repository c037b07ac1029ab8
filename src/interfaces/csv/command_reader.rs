use crate::domain::command::Command;
use crate::error::{PointError, Result};
use std::io::Read;

/// Reads point commands from a CSV source with a `type, user, amount` header.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// so read commands may leave the amount column out entirely.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes commands.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PointError::from))
    }
}
