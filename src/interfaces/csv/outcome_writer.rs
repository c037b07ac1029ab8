use crate::application::scheduler::Outcome;
use crate::domain::command::{Command, CommandType};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct OutcomeRecord {
    r#type: CommandType,
    user: i64,
    amount: Option<i64>,
    status: &'static str,
    point: Option<i64>,
    entries: Option<usize>,
}

/// Writes one CSV row per executed command:
/// `type,user,amount,status,point,entries`.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_outcome(&mut self, command: &Command, result: &Result<Outcome>) -> Result<()> {
        let (status, point, entries) = match result {
            Ok(Outcome::Balance(balance)) => ("ok", Some(balance.point), None),
            Ok(Outcome::History(history)) => ("ok", None, Some(history.len())),
            Err(err) => (err.code(), None, None),
        };
        self.writer.serialize(OutcomeRecord {
            r#type: command.r#type,
            user: command.user,
            amount: command.amount,
            status,
            point,
            entries,
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
